use uuid::Uuid;

use crate::{Result, db::Db, models::LeadRow};

/// Most recent lead for a caller, regardless of age. The dedup window check
/// is the caller's concern; this is a plain latest-by-phone lookup.
pub async fn latest_by_phone(db: &Db, phone_number: &str) -> Result<Option<LeadRow>> {
	let row = sqlx::query_as(
		"SELECT * FROM leads WHERE phone_number = $1 ORDER BY captured_at DESC LIMIT 1",
	)
	.bind(phone_number)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn fetch(db: &Db, lead_id: Uuid) -> Result<Option<LeadRow>> {
	let row = sqlx::query_as("SELECT * FROM leads WHERE lead_id = $1")
		.bind(lead_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

pub async fn fetch_for_call(db: &Db, call_id: Uuid) -> Result<Option<LeadRow>> {
	let row = sqlx::query_as("SELECT * FROM leads WHERE call_id = $1")
		.bind(call_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

pub async fn insert(db: &Db, lead: &LeadRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO leads (
	lead_id,
	call_id,
	phone_number,
	score,
	quality,
	sentiment_score,
	topics,
	mentioned_pricing,
	mentioned_insurance,
	mentioned_scheduling,
	notes,
	captured_at,
	follow_up_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
	)
	.bind(lead.lead_id)
	.bind(lead.call_id)
	.bind(lead.phone_number.as_str())
	.bind(lead.score)
	.bind(lead.quality.as_str())
	.bind(lead.sentiment_score)
	.bind(&lead.topics)
	.bind(lead.mentioned_pricing)
	.bind(lead.mentioned_insurance)
	.bind(lead.mentioned_scheduling)
	.bind(lead.notes.as_str())
	.bind(lead.captured_at)
	.bind(lead.follow_up_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Replaces every scored field of an existing lead with the new call's
/// values. Overwrite, not merge: the previous interaction's signal is gone.
pub async fn overwrite(db: &Db, lead: &LeadRow) -> Result<()> {
	sqlx::query(
		"\
UPDATE leads
SET
	call_id = $2,
	phone_number = $3,
	score = $4,
	quality = $5,
	sentiment_score = $6,
	topics = $7,
	mentioned_pricing = $8,
	mentioned_insurance = $9,
	mentioned_scheduling = $10,
	notes = $11,
	captured_at = $12,
	follow_up_at = $13
WHERE lead_id = $1",
	)
	.bind(lead.lead_id)
	.bind(lead.call_id)
	.bind(lead.phone_number.as_str())
	.bind(lead.score)
	.bind(lead.quality.as_str())
	.bind(lead.sentiment_score)
	.bind(&lead.topics)
	.bind(lead.mentioned_pricing)
	.bind(lead.mentioned_insurance)
	.bind(lead.mentioned_scheduling)
	.bind(lead.notes.as_str())
	.bind(lead.captured_at)
	.bind(lead.follow_up_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn set_quality(db: &Db, lead_id: Uuid, quality: &str) -> Result<Option<LeadRow>> {
	let row = sqlx::query_as("UPDATE leads SET quality = $2 WHERE lead_id = $1 RETURNING *")
		.bind(lead_id)
		.bind(quality)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

pub async fn quality_breakdown(db: &Db) -> Result<Vec<(String, i64)>> {
	let rows = sqlx::query_as("SELECT quality, COUNT(*) FROM leads GROUP BY quality")
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}
