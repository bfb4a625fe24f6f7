use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use pronto_domain::{
	notify_policy,
	scoring::{self, LeadQuality, ScoreInput, ScoreOutcome},
};
use pronto_storage::{
	leads,
	models::{CallRow, LeadRow},
};

use crate::{LeadService, ServiceResult};

const HOT_FOLLOW_UP_HOURS: i64 = 24;

impl LeadService {
	/// Scores the call and lands the lead: a lead for the same caller inside
	/// the dedup window is overwritten in place (last call wins, prior signal
	/// discarded); otherwise a new lead is created.
	pub(crate) async fn capture_and_score(
		&self,
		call: &CallRow,
		metrics: ScoreInput,
		now: OffsetDateTime,
	) -> ServiceResult<LeadRow> {
		let outcome = scoring::score(&metrics);
		let lead = build_lead(call, &metrics, &outcome, now);
		let window = Duration::days(self.cfg.leads.dedup_window_days);

		if !call.phone_number.trim().is_empty()
			&& let Some(existing) = leads::latest_by_phone(&self.db, &call.phone_number).await?
			&& notify_policy::within_dedup_window(existing.captured_at, window, now)
		{
			let lead = LeadRow { lead_id: existing.lead_id, ..lead };

			leads::overwrite(&self.db, &lead).await?;

			tracing::debug!(
				lead_id = %lead.lead_id,
				phone_number = %lead.phone_number,
				score = lead.score,
				"Lead overwritten within dedup window."
			);

			Ok(lead)
		} else {
			leads::insert(&self.db, &lead).await?;

			tracing::debug!(
				lead_id = %lead.lead_id,
				phone_number = %lead.phone_number,
				score = lead.score,
				"Lead captured."
			);

			Ok(lead)
		}
	}
}

fn build_lead(
	call: &CallRow,
	metrics: &ScoreInput,
	outcome: &ScoreOutcome,
	now: OffsetDateTime,
) -> LeadRow {
	LeadRow {
		lead_id: Uuid::new_v4(),
		call_id: call.call_id,
		phone_number: call.phone_number.clone(),
		score: i32::from(outcome.score),
		quality: outcome.quality.as_str().to_string(),
		sentiment_score: metrics.sentiment,
		topics: serde_json::json!(metrics.topics),
		mentioned_pricing: outcome.breakdown.pricing_interest > 0,
		mentioned_insurance: outcome.breakdown.insurance_interest > 0,
		mentioned_scheduling: outcome.breakdown.scheduling_intent > 0,
		notes: compose_notes(outcome),
		captured_at: now,
		follow_up_at: (outcome.quality == LeadQuality::Hot)
			.then(|| now + Duration::hours(HOT_FOLLOW_UP_HOURS)),
	}
}

fn compose_notes(outcome: &ScoreOutcome) -> String {
	let breakdown = &outcome.breakdown;
	let mut signals = Vec::new();

	if breakdown.pricing_interest > 0 {
		signals.push("asked about pricing");
	}
	if breakdown.insurance_interest > 0 {
		signals.push("asked about insurance");
	}
	if breakdown.scheduling_intent > 0 {
		signals.push("wants to schedule");
	}
	if breakdown.engagement > 0 {
		signals.push("highly engaged");
	}
	if breakdown.long_call > 0 {
		signals.push("long call");
	}

	let summary = format!("Scored {}/100 ({}).", outcome.score, outcome.quality);

	if signals.is_empty() { summary } else { format!("{summary} Signals: {}.", signals.join(", ")) }
}
