use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, db::Db, models::NotificationLogRow};

pub async fn insert(db: &Db, log: &NotificationLogRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO notification_logs (
	log_id,
	lead_id,
	channel,
	recipient,
	message,
	status,
	sent_at,
	delivered_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(log.log_id)
	.bind(log.lead_id)
	.bind(log.channel.as_str())
	.bind(log.recipient.as_str())
	.bind(log.message.as_str())
	.bind(log.status.as_str())
	.bind(log.sent_at)
	.bind(log.delivered_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Timestamp of the most recent successfully sent notification for a lead.
/// Failed attempts do not arm the cooldown.
pub async fn latest_sent_at(db: &Db, lead_id: Uuid) -> Result<Option<OffsetDateTime>> {
	let sent_at = sqlx::query_scalar(
		"\
SELECT sent_at
FROM notification_logs
WHERE lead_id = $1 AND status = 'sent'
ORDER BY sent_at DESC
LIMIT 1",
	)
	.bind(lead_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(sent_at)
}
