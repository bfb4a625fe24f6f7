use time::{Duration, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use pronto_domain::notify_policy::{self, QuietHours};
use pronto_providers::notify::ChannelMessage;
use pronto_storage::{
	models::{LeadRow, NotificationLogRow},
	notification_logs,
};

use crate::{LEAD_NOTIFICATIONS_FLAG, LeadService, ServiceResult};

const CHANNEL: &str = "webhook";

impl LeadService {
	/// Flag, cooldown, and quiet hours in front of one delivery attempt.
	/// A suppressed notification is dropped outright; nothing is queued for
	/// later. Every actual attempt, sent or failed, lands a log row.
	pub async fn notify_lead(&self, lead: &LeadRow, now: OffsetDateTime) -> ServiceResult<()> {
		if !self.capabilities.flags.is_enabled(LEAD_NOTIFICATIONS_FLAG, true).await {
			tracing::debug!(lead_id = %lead.lead_id, "Lead notifications disabled by flag.");

			return Ok(());
		}

		let last_sent_at = notification_logs::latest_sent_at(&self.db, lead.lead_id).await?;

		if !self.gate_allows(last_sent_at, now) {
			tracing::info!(
				lead_id = %lead.lead_id,
				"Notification suppressed (cooldown or quiet hours)."
			);

			return Ok(());
		}

		let message = channel_message(lead);
		let serialized = serde_json::to_string(&message).unwrap_or_default();
		let outcome = self.capabilities.sender.send(&self.cfg.notifications, &message).await;
		let (status, delivered_at) = match outcome {
			Ok(outcome) if outcome.delivered => ("sent", Some(now)),
			Ok(outcome) => {
				tracing::error!(
					lead_id = %lead.lead_id,
					http_status = ?outcome.http_status,
					detail = ?outcome.detail,
					"Channel rejected lead notification."
				);

				("failed", None)
			},
			Err(err) => {
				tracing::error!(lead_id = %lead.lead_id, error = %err, "Lead notification delivery failed.");

				("failed", None)
			},
		};
		let log = NotificationLogRow {
			log_id: Uuid::new_v4(),
			lead_id: lead.lead_id,
			channel: CHANNEL.to_string(),
			recipient: self.cfg.notifications.recipient.clone(),
			message: serialized,
			status: status.to_string(),
			sent_at: now,
			delivered_at,
		};

		notification_logs::insert(&self.db, &log).await?;

		Ok(())
	}

	/// The two-predicate gate over the most recent `sent` timestamp. Pure
	/// given its inputs; the flag check is the caller's concern.
	pub fn gate_allows(&self, last_sent_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
		let cooldown = Duration::hours(self.cfg.notifications.cooldown_hours);

		if notify_policy::cooldown_active(last_sent_at, cooldown, now) {
			return false;
		}

		!self.quiet_hours().suppresses(now)
	}

	fn quiet_hours(&self) -> QuietHours {
		let offset = UtcOffset::from_whole_seconds(self.cfg.notifications.utc_offset_minutes * 60)
			.unwrap_or(UtcOffset::UTC);

		QuietHours {
			start_hour: self.cfg.notifications.quiet_start_hour,
			end_hour: self.cfg.notifications.quiet_end_hour,
			utc_offset: offset,
		}
	}
}

fn channel_message(lead: &LeadRow) -> ChannelMessage {
	ChannelMessage {
		lead_id: lead.lead_id.to_string(),
		call_id: lead.call_id.to_string(),
		phone_number: lead.phone_number.clone(),
		score: lead.score,
		quality: lead.quality.clone(),
		mentioned_pricing: lead.mentioned_pricing,
		mentioned_insurance: lead.mentioned_insurance,
		mentioned_scheduling: lead.mentioned_scheduling,
		notes: lead.notes.clone(),
		call_link: format!("/v1/calls/{}", lead.call_id),
	}
}
