use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CallRow {
	pub call_id: Uuid,
	pub external_call_id: String,
	pub phone_number: String,
	pub direction: String,
	pub status: String,
	pub duration_secs: i32,
	pub recording_url: Option<String>,
	pub transcript_url: Option<String>,
	pub transcript_text: Option<String>,
	pub started_at: OffsetDateTime,
	pub answered_at: Option<OffsetDateTime>,
	pub ended_at: Option<OffsetDateTime>,
	pub metadata: Value,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct LeadRow {
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
	pub captured_at: OffsetDateTime,
	pub follow_up_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct NotificationLogRow {
	pub log_id: Uuid,
	pub lead_id: Uuid,
	pub channel: String,
	pub recipient: String,
	pub message: String,
	pub status: String,
	pub sent_at: OffsetDateTime,
	pub delivered_at: Option<OffsetDateTime>,
}
