use std::sync::Arc;

use pronto_service::LeadService;
use pronto_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LeadService>,
}
impl AppState {
	pub async fn new(config: pronto_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = LeadService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
