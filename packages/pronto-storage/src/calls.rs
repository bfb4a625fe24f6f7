use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, db::Db, models::CallRow};

#[derive(Clone, Debug, Default)]
pub struct CallFilter {
	pub status: Option<String>,
	pub direction: Option<String>,
	pub started_from: Option<OffsetDateTime>,
	pub started_to: Option<OffsetDateTime>,
}

/// Inserts the row for a freshly initiated call. Re-delivered initiation
/// events are ignored; the first row wins.
pub async fn insert_initiated(
	db: &Db,
	external_call_id: &str,
	phone_number: &str,
	direction: &str,
	started_at: OffsetDateTime,
	metadata: &Value,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO calls (call_id, external_call_id, phone_number, direction, status, started_at, metadata)
VALUES ($1, $2, $3, $4, 'initiated', $5, $6)
ON CONFLICT (external_call_id) DO NOTHING",
	)
	.bind(Uuid::new_v4())
	.bind(external_call_id)
	.bind(phone_number)
	.bind(direction)
	.bind(started_at)
	.bind(metadata)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch(db: &Db, call_id: Uuid) -> Result<Option<CallRow>> {
	let row = sqlx::query_as("SELECT * FROM calls WHERE call_id = $1")
		.bind(call_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

pub async fn fetch_by_external_id(db: &Db, external_call_id: &str) -> Result<Option<CallRow>> {
	let row = sqlx::query_as("SELECT * FROM calls WHERE external_call_id = $1")
		.bind(external_call_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

pub async fn mark_answered(
	db: &Db,
	external_call_id: &str,
	answered_at: OffsetDateTime,
) -> Result<bool> {
	let result = sqlx::query(
		"UPDATE calls SET status = 'answered', answered_at = $2 WHERE external_call_id = $1",
	)
	.bind(external_call_id)
	.bind(answered_at)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn mark_completed(
	db: &Db,
	external_call_id: &str,
	status: &str,
	duration_secs: i32,
	ended_at: OffsetDateTime,
) -> Result<Option<CallRow>> {
	let row = sqlx::query_as(
		"\
UPDATE calls
SET status = $2, duration_secs = $3, ended_at = $4
WHERE external_call_id = $1
RETURNING *",
	)
	.bind(external_call_id)
	.bind(status)
	.bind(duration_secs)
	.bind(ended_at)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn attach_recording(
	db: &Db,
	external_call_id: &str,
	recording_url: &str,
) -> Result<bool> {
	let result =
		sqlx::query("UPDATE calls SET recording_url = $2 WHERE external_call_id = $1")
			.bind(external_call_id)
			.bind(recording_url)
			.execute(&db.pool)
			.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn attach_transcript(
	db: &Db,
	external_call_id: &str,
	transcript_url: Option<&str>,
	transcript_text: &str,
) -> Result<bool> {
	let result = sqlx::query(
		"UPDATE calls SET transcript_url = $2, transcript_text = $3 WHERE external_call_id = $1",
	)
	.bind(external_call_id)
	.bind(transcript_url)
	.bind(transcript_text)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list(db: &Db, filter: &CallFilter, limit: i64, offset: i64) -> Result<Vec<CallRow>> {
	let mut builder = QueryBuilder::new("SELECT * FROM calls WHERE TRUE");

	push_filters(&mut builder, filter);

	builder.push(" ORDER BY started_at DESC LIMIT ");
	builder.push_bind(limit);
	builder.push(" OFFSET ");
	builder.push_bind(offset);

	let rows = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn count(db: &Db, filter: &CallFilter) -> Result<i64> {
	let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM calls WHERE TRUE");

	push_filters(&mut builder, filter);

	let total = builder.build_query_scalar().fetch_one(&db.pool).await?;

	Ok(total)
}

/// Total calls, completed calls, and average duration of completed calls.
pub async fn completion_stats(db: &Db) -> Result<(i64, i64, Option<f64>)> {
	let stats = sqlx::query_as(
		"\
SELECT
	COUNT(*),
	COUNT(*) FILTER (WHERE status = 'completed'),
	(AVG(duration_secs) FILTER (WHERE status = 'completed'))::float8
FROM calls",
	)
	.fetch_one(&db.pool)
	.await?;

	Ok(stats)
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a CallFilter) {
	if let Some(status) = &filter.status {
		builder.push(" AND status = ");
		builder.push_bind(status);
	}
	if let Some(direction) = &filter.direction {
		builder.push(" AND direction = ");
		builder.push_bind(direction);
	}
	if let Some(started_from) = filter.started_from {
		builder.push(" AND started_at >= ");
		builder.push_bind(started_from);
	}
	if let Some(started_to) = filter.started_to {
		builder.push(" AND started_at <= ");
		builder.push_bind(started_to);
	}
}
