use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use pronto_domain::scoring::LeadQuality;
use pronto_storage::{leads, models::LeadRow};

use crate::{LeadService, ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
pub struct OverrideInterestRequest {
	pub interest: String,
}

#[derive(Debug, Serialize)]
pub struct LeadView {
	pub lead_id: Uuid,
	pub call_id: Uuid,
	pub phone_number: String,
	pub score: i32,
	pub quality: String,
	pub sentiment_score: Option<f32>,
	pub topics: Value,
	pub mentioned_pricing: bool,
	pub mentioned_insurance: bool,
	pub mentioned_scheduling: bool,
	pub notes: String,
	#[serde(with = "time::serde::rfc3339")]
	pub captured_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339::option")]
	pub follow_up_at: Option<OffsetDateTime>,
}

impl From<LeadRow> for LeadView {
	fn from(row: LeadRow) -> Self {
		Self {
			lead_id: row.lead_id,
			call_id: row.call_id,
			phone_number: row.phone_number,
			score: row.score,
			quality: row.quality,
			sentiment_score: row.sentiment_score,
			topics: row.topics,
			mentioned_pricing: row.mentioned_pricing,
			mentioned_insurance: row.mentioned_insurance,
			mentioned_scheduling: row.mentioned_scheduling,
			notes: row.notes,
			captured_at: row.captured_at,
			follow_up_at: row.follow_up_at,
		}
	}
}

impl LeadService {
	/// Manual tier override from the query API. Unlike the scorer, this path
	/// may set `UNQUALIFIED`.
	pub async fn override_interest(
		&self,
		lead_id: Uuid,
		request: OverrideInterestRequest,
	) -> ServiceResult<LeadView> {
		let quality: LeadQuality =
			request.interest.parse().map_err(|_| ServiceError::InvalidRequest {
				message: "interest must be one of HOT, WARM, COLD, or UNQUALIFIED.".to_string(),
			})?;
		let Some(row) = leads::set_quality(&self.db, lead_id, quality.as_str()).await? else {
			return Err(ServiceError::NotFound { message: format!("lead {lead_id}") });
		};

		tracing::info!(%lead_id, quality = %quality, "Lead interest overridden.");

		Ok(row.into())
	}
}
