pub mod analytics;
pub mod calls;
pub mod leads;
pub mod webhook;

mod capture;
mod notify;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

pub use analytics::{AnalyticsSummary, LeadQualityCounts};
pub use calls::{CallDetail, CallDetailResponse, CallListRequest, CallListResponse, CallSummary};
pub use leads::{LeadView, OverrideInterestRequest};

use pronto_config::Config;
use pronto_providers::notify::{ChannelMessage, DeliveryOutcome};
use pronto_storage::db::Db;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Flag gating the whole notification pipeline. Defaults to on when the flag
/// backend has no opinion.
pub const LEAD_NOTIFICATIONS_FLAG: &str = "lead_notifications";

pub trait MessageSender
where
	Self: Send + Sync,
{
	fn send<'a>(
		&'a self,
		cfg: &'a pronto_config::Notifications,
		message: &'a ChannelMessage,
	) -> BoxFuture<'a, color_eyre::Result<DeliveryOutcome>>;
}

pub trait FlagEvaluator
where
	Self: Send + Sync,
{
	fn is_enabled<'a>(&'a self, flag: &'a str, default: bool) -> BoxFuture<'a, bool>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	NotFound { message: String },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<pronto_storage::Error> for ServiceError {
	fn from(err: pronto_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

/// Injected collaborators for the notification path: the delivery transport
/// and the feature-flag backend, both swappable with fakes in tests.
#[derive(Clone)]
pub struct Capabilities {
	pub sender: Arc<dyn MessageSender>,
	pub flags: Arc<dyn FlagEvaluator>,
}

impl Capabilities {
	pub fn new(sender: Arc<dyn MessageSender>, flags: Arc<dyn FlagEvaluator>) -> Self {
		Self { sender, flags }
	}
}

pub struct LeadService {
	pub cfg: Config,
	pub db: Db,
	pub capabilities: Capabilities,
}

impl LeadService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let flags = Arc::new(StaticFlags::from_config(&cfg));

		Self { cfg, db, capabilities: Capabilities::new(Arc::new(WebhookSender), flags) }
	}

	pub fn with_capabilities(cfg: Config, db: Db, capabilities: Capabilities) -> Self {
		Self { cfg, db, capabilities }
	}
}

struct WebhookSender;

impl MessageSender for WebhookSender {
	fn send<'a>(
		&'a self,
		cfg: &'a pronto_config::Notifications,
		message: &'a ChannelMessage,
	) -> BoxFuture<'a, color_eyre::Result<DeliveryOutcome>> {
		Box::pin(pronto_providers::notify::send(cfg, message))
	}
}

/// Config-backed flag evaluation. The hosted flag service is consumed through
/// this trait boundary; the default implementation answers from the static
/// `[flags]` table.
pub struct StaticFlags {
	defaults: HashMap<String, bool>,
}

impl StaticFlags {
	pub fn from_config(cfg: &Config) -> Self {
		Self { defaults: cfg.flags.defaults.clone() }
	}
}

impl FlagEvaluator for StaticFlags {
	fn is_enabled<'a>(&'a self, flag: &'a str, default: bool) -> BoxFuture<'a, bool> {
		let enabled = self.defaults.get(flag).copied().unwrap_or(default);

		Box::pin(async move { enabled })
	}
}
