use time::{Duration, OffsetDateTime, UtcOffset};

/// Daily suppression window on local wall-clock hours, half open: a window of
/// 22 to 8 suppresses from 22:00 up to but excluding 08:00, wrapping
/// midnight. An equal start and end never suppresses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuietHours {
	pub start_hour: u8,
	pub end_hour: u8,
	pub utc_offset: UtcOffset,
}

impl QuietHours {
	pub fn suppresses(&self, now: OffsetDateTime) -> bool {
		let hour = now.to_offset(self.utc_offset).hour();

		if self.start_hour == self.end_hour {
			return false;
		}
		if self.start_hour < self.end_hour {
			hour >= self.start_hour && hour < self.end_hour
		} else {
			hour >= self.start_hour || hour < self.end_hour
		}
	}
}

/// True while the most recent `sent` notification is younger than the
/// cooldown. No prior notification means no cooldown.
pub fn cooldown_active(
	last_sent_at: Option<OffsetDateTime>,
	cooldown: Duration,
	now: OffsetDateTime,
) -> bool {
	last_sent_at.is_some_and(|sent_at| now - sent_at < cooldown)
}

/// Inclusive trailing window for lead deduplication: a lead captured exactly
/// at the window edge still collapses with the new call.
pub fn within_dedup_window(
	captured_at: OffsetDateTime,
	window: Duration,
	now: OffsetDateTime,
) -> bool {
	now - captured_at <= window
}
