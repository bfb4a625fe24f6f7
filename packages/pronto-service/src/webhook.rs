use time::OffsetDateTime;

use pronto_domain::{
	event::{self, CallEvent, ParsedEvent},
	scoring::ScoreInput,
};
use pronto_storage::calls;

use crate::{LeadService, ServiceResult};

impl LeadService {
	/// Entry point for the deferred webhook path. The acknowledgment has
	/// already been sent, so nothing here may surface to a caller: malformed
	/// payloads, unknown event kinds, and handler failures are logged and
	/// dropped.
	pub async fn process_webhook(&self, raw: &[u8]) {
		let parsed = match event::parse_event(raw) {
			Ok(parsed) => parsed,
			Err(err) => {
				tracing::warn!(error = %err, "Dropping malformed webhook payload.");

				return;
			},
		};
		let event = match parsed {
			ParsedEvent::Event(event) => event,
			ParsedEvent::Unknown(event_type) => {
				tracing::info!(%event_type, "Ignoring unknown webhook event type.");

				return;
			},
		};
		let external_call_id = event.external_call_id().to_string();

		if let Err(err) = self.apply_event(event).await {
			tracing::error!(%external_call_id, error = %err, "Webhook event handling failed.");
		}
	}

	async fn apply_event(&self, event: CallEvent) -> ServiceResult<()> {
		let now = OffsetDateTime::now_utc();

		match event {
			CallEvent::CallInitiated {
				external_call_id,
				phone_number,
				direction,
				occurred_at,
				metadata,
			} => {
				let started_at = occurred_at.unwrap_or(now);

				calls::insert_initiated(
					&self.db,
					&external_call_id,
					&phone_number,
					direction.as_str(),
					started_at,
					&metadata,
				)
				.await?;

				// Caller ID at initiation is enough to open a lead; the
				// completion-time capture overwrites it through the dedup path.
				if !phone_number.trim().is_empty()
					&& let Some(call) = calls::fetch_by_external_id(&self.db, &external_call_id).await?
				{
					self.capture_and_score(&call, ScoreInput::default(), now).await?;
				}

				Ok(())
			},
			CallEvent::CallAnswered { external_call_id, occurred_at } => {
				let answered_at = occurred_at.unwrap_or(now);

				if !calls::mark_answered(&self.db, &external_call_id, answered_at).await? {
					tracing::warn!(%external_call_id, "Answer event for unknown call dropped.");
				}

				Ok(())
			},
			CallEvent::CallCompleted {
				external_call_id,
				outcome,
				duration_secs,
				sentiment,
				topics,
				occurred_at,
			} => {
				let ended_at = occurred_at.unwrap_or(now);
				let duration = i32::try_from(duration_secs).unwrap_or(i32::MAX);
				let Some(call) = calls::mark_completed(
					&self.db,
					&external_call_id,
					outcome.as_status(),
					duration,
					ended_at,
				)
				.await?
				else {
					tracing::warn!(%external_call_id, "Completion event for unknown call dropped.");

					return Ok(());
				};
				// Scoring reads whatever transcript has landed on the row by
				// now; a transcript.ready racing in later is not re-scored.
				let metrics = ScoreInput {
					duration_secs,
					transcript: call.transcript_text.clone(),
					sentiment,
					topics,
				};
				let lead = self.capture_and_score(&call, metrics, now).await?;

				self.notify_lead(&lead, now).await?;

				Ok(())
			},
			CallEvent::RecordingSaved { external_call_id, recording_url } => {
				if !calls::attach_recording(&self.db, &external_call_id, &recording_url).await? {
					tracing::warn!(%external_call_id, "Recording event for unknown call dropped.");
				}

				Ok(())
			},
			CallEvent::TranscriptReady { external_call_id, transcript_url, transcript_text } => {
				let attached = calls::attach_transcript(
					&self.db,
					&external_call_id,
					transcript_url.as_deref(),
					&transcript_text,
				)
				.await?;

				if !attached {
					tracing::warn!(%external_call_id, "Transcript event for unknown call dropped.");
				}

				Ok(())
			},
		}
	}
}
