use time::{Duration, UtcOffset, macros::datetime};

use pronto_domain::{
	event::{self, CallDirection, CallEvent, CallOutcome, ParsedEvent},
	notify_policy::{self, QuietHours},
	scoring::{self, LeadQuality, ScoreInput},
	signature,
};

fn input(
	duration_secs: u32,
	transcript: Option<&str>,
	sentiment: Option<f32>,
	topics: &[&str],
) -> ScoreInput {
	ScoreInput {
		duration_secs,
		transcript: transcript.map(str::to_string),
		sentiment,
		topics: topics.iter().map(|topic| topic.to_string()).collect(),
	}
}

#[test]
fn empty_input_scores_zero_cold() {
	let outcome = scoring::score(&input(0, None, None, &[]));

	assert_eq!(outcome.score, 0);
	assert_eq!(outcome.quality, LeadQuality::Cold);
	assert_eq!(outcome.breakdown.total(), 0);
}

#[test]
fn loaded_call_clamps_to_one_hundred() {
	let transcript = "What is the cost of braces? Do you take insurance? \
		Can I schedule an appointment? How long does it take?";
	let outcome =
		scoring::score(&input(600, Some(transcript), Some(0.9), &[
			"pricing",
			"insurance",
			"scheduling",
		]));

	assert_eq!(outcome.breakdown.duration, 30);
	assert_eq!(outcome.breakdown.pricing_interest, 20);
	assert_eq!(outcome.breakdown.insurance_interest, 15);
	assert_eq!(outcome.breakdown.scheduling_intent, 25);
	assert_eq!(outcome.breakdown.sentiment, 18);
	assert_eq!(outcome.breakdown.engagement, 10);
	assert_eq!(outcome.breakdown.long_call, 10);
	assert_eq!(outcome.breakdown.total(), 128);
	assert_eq!(outcome.score, 100);
	assert_eq!(outcome.quality, LeadQuality::Hot);
}

#[test]
fn score_stays_in_range_for_assorted_inputs() {
	let cases = [
		input(0, None, None, &[]),
		input(10_000, None, None, &[]),
		input(45, Some("how much???"), Some(1.0), &["pricing"]),
		input(200, Some("no keywords here"), Some(0.5), &[]),
		input(600, Some("cost insurance appointment ????"), Some(1.0), &[
			"pricing",
			"insurance",
			"scheduling",
		]),
	];

	for case in &cases {
		let outcome = scoring::score(case);

		assert!(outcome.score <= 100);
		assert_eq!(outcome.quality, LeadQuality::from_score(outcome.score));
	}
}

#[test]
fn scorer_is_deterministic() {
	let case = input(240, Some("What is the price? When can I come in?"), Some(0.7), &[]);
	let first = scoring::score(&case);
	let second = scoring::score(&case);

	assert_eq!(first, second);
}

#[test]
fn quality_tier_boundaries() {
	assert_eq!(LeadQuality::from_score(100), LeadQuality::Hot);
	assert_eq!(LeadQuality::from_score(75), LeadQuality::Hot);
	assert_eq!(LeadQuality::from_score(74), LeadQuality::Warm);
	assert_eq!(LeadQuality::from_score(50), LeadQuality::Warm);
	assert_eq!(LeadQuality::from_score(49), LeadQuality::Cold);
	assert_eq!(LeadQuality::from_score(0), LeadQuality::Cold);
}

#[test]
fn missing_transcript_disables_text_rules() {
	let outcome = scoring::score(&input(300, None, Some(0.5), &[]));

	assert_eq!(outcome.breakdown.pricing_interest, 0);
	assert_eq!(outcome.breakdown.insurance_interest, 0);
	assert_eq!(outcome.breakdown.scheduling_intent, 0);
	assert_eq!(outcome.breakdown.engagement, 0);
	assert_eq!(outcome.breakdown.duration, 30);
	assert_eq!(outcome.breakdown.sentiment, 10);
	assert_eq!(outcome.breakdown.long_call, 10);
}

#[test]
fn engagement_needs_three_questions() {
	let two = scoring::score(&input(0, Some("Really? Are you sure."), None, &[]));
	let three = scoring::score(&input(0, Some("Really? Sure? Why?"), None, &[]));

	assert_eq!(two.breakdown.engagement, 0);
	assert_eq!(three.breakdown.engagement, 10);
}

#[test]
fn topics_alone_trigger_interest_rules() {
	let outcome = scoring::score(&input(0, None, None, &["pricing", "insurance", "scheduling"]));

	assert_eq!(outcome.breakdown.pricing_interest, 20);
	assert_eq!(outcome.breakdown.insurance_interest, 15);
	assert_eq!(outcome.breakdown.scheduling_intent, 25);
	assert_eq!(outcome.score, 60);
	assert_eq!(outcome.quality, LeadQuality::Warm);
}

#[test]
fn quiet_hours_suppress_late_night_and_allow_morning() {
	let quiet = QuietHours { start_hour: 22, end_hour: 8, utc_offset: UtcOffset::UTC };

	assert!(quiet.suppresses(datetime!(2025-06-02 23:00 UTC)));
	assert!(quiet.suppresses(datetime!(2025-06-02 22:00 UTC)));
	assert!(quiet.suppresses(datetime!(2025-06-03 03:30 UTC)));
	assert!(quiet.suppresses(datetime!(2025-06-03 07:59 UTC)));
	assert!(!quiet.suppresses(datetime!(2025-06-03 08:00 UTC)));
	assert!(!quiet.suppresses(datetime!(2025-06-03 09:00 UTC)));
	assert!(!quiet.suppresses(datetime!(2025-06-02 21:59 UTC)));
}

#[test]
fn quiet_hours_respect_utc_offset() {
	let offset = UtcOffset::from_hms(-5, 0, 0).expect("valid offset");
	let quiet = QuietHours { start_hour: 22, end_hour: 8, utc_offset: offset };

	// 03:00 UTC is 22:00 the previous evening at UTC-5.
	assert!(quiet.suppresses(datetime!(2025-06-03 03:00 UTC)));
	// 14:00 UTC is 09:00 at UTC-5.
	assert!(!quiet.suppresses(datetime!(2025-06-03 14:00 UTC)));
}

#[test]
fn non_wrapping_quiet_window() {
	let quiet = QuietHours { start_hour: 12, end_hour: 14, utc_offset: UtcOffset::UTC };

	assert!(!quiet.suppresses(datetime!(2025-06-03 11:59 UTC)));
	assert!(quiet.suppresses(datetime!(2025-06-03 12:00 UTC)));
	assert!(quiet.suppresses(datetime!(2025-06-03 13:59 UTC)));
	assert!(!quiet.suppresses(datetime!(2025-06-03 14:00 UTC)));
}

#[test]
fn cooldown_covers_trailing_twenty_four_hours() {
	let now = datetime!(2025-06-03 12:00 UTC);
	let cooldown = Duration::hours(24);

	assert!(!notify_policy::cooldown_active(None, cooldown, now));
	assert!(notify_policy::cooldown_active(Some(now - Duration::hours(1)), cooldown, now));
	assert!(notify_policy::cooldown_active(
		Some(now - Duration::hours(24) + Duration::seconds(1)),
		cooldown,
		now,
	));
	assert!(!notify_policy::cooldown_active(Some(now - Duration::hours(24)), cooldown, now));
	assert!(!notify_policy::cooldown_active(Some(now - Duration::hours(48)), cooldown, now));
}

#[test]
fn dedup_window_is_inclusive_at_seven_days() {
	let now = datetime!(2025-06-10 12:00 UTC);
	let window = Duration::days(7);

	assert!(notify_policy::within_dedup_window(now - Duration::days(2), window, now));
	assert!(notify_policy::within_dedup_window(now - Duration::days(7), window, now));
	assert!(!notify_policy::within_dedup_window(
		now - Duration::days(7) - Duration::seconds(1),
		window,
		now,
	));
	assert!(!notify_policy::within_dedup_window(now - Duration::days(8), window, now));
}

#[test]
fn signature_round_trip_verifies() {
	let payload = br#"{"meta":{"event_type":"call.completed"},"data":{"call_id":"c1"}}"#;
	let signed = signature::sign("secret", payload);

	assert!(signature::verify(Some("secret"), payload, Some(&signed)));
	assert!(signature::verify(
		Some("secret"),
		payload,
		Some(signed.strip_prefix("sha256=").expect("signed value must carry the prefix")),
	));
}

#[test]
fn signature_rejects_any_mutation() {
	let payload = b"{\"a\":1}";
	let signed = signature::sign("secret", payload);
	let mut tampered_payload = payload.to_vec();

	tampered_payload[3] ^= 0x01;

	assert!(!signature::verify(Some("secret"), &tampered_payload, Some(&signed)));

	let mut tampered_signature = signed.clone().into_bytes();
	let last = tampered_signature.len() - 1;

	tampered_signature[last] = if tampered_signature[last] == b'0' { b'1' } else { b'0' };

	let tampered_signature =
		String::from_utf8(tampered_signature).expect("hex signature stays ASCII");

	assert!(!signature::verify(Some("secret"), payload, Some(&tampered_signature)));
}

#[test]
fn signature_rejects_missing_or_malformed_when_secret_set() {
	let payload = b"{}";

	assert!(!signature::verify(Some("secret"), payload, None));
	assert!(!signature::verify(Some("secret"), payload, Some("not-hex")));
	assert!(!signature::verify(Some("secret"), payload, Some("")));
}

#[test]
fn signature_fails_open_without_secret() {
	let payload = b"{}";

	assert!(signature::verify(None, payload, None));
	assert!(signature::verify(None, payload, Some("sha256=deadbeef")));
	assert!(signature::verify(None, payload, Some("garbage")));
}

#[test]
fn parses_call_initiated() {
	let raw = serde_json::json!({
		"meta": { "event_type": "call.initiated" },
		"data": {
			"call_id": "v3:abc",
			"phone_number": "+15550100",
			"direction": "inbound",
			"occurred_at": "2025-06-03T12:00:00Z"
		}
	});
	let parsed = event::parse_event(raw.to_string().as_bytes()).expect("must parse");

	let ParsedEvent::Event(CallEvent::CallInitiated {
		external_call_id,
		phone_number,
		direction,
		occurred_at,
		metadata,
	}) = parsed
	else {
		panic!("expected CallInitiated, got {parsed:?}");
	};

	assert_eq!(external_call_id, "v3:abc");
	assert_eq!(phone_number, "+15550100");
	assert_eq!(direction, CallDirection::Inbound);
	assert_eq!(occurred_at, Some(datetime!(2025-06-03 12:00 UTC)));
	assert_eq!(metadata["phone_number"], "+15550100");
}

#[test]
fn parses_call_completed_with_insights() {
	let raw = serde_json::json!({
		"meta": { "event_type": "call.completed" },
		"data": {
			"call_id": "v3:abc",
			"outcome": "no_answer",
			"duration_secs": 42,
			"sentiment": 0.8,
			"topics": ["pricing"]
		}
	});
	let parsed = event::parse_event(raw.to_string().as_bytes()).expect("must parse");

	let ParsedEvent::Event(CallEvent::CallCompleted {
		external_call_id,
		outcome,
		duration_secs,
		sentiment,
		topics,
		occurred_at,
	}) = parsed
	else {
		panic!("expected CallCompleted, got {parsed:?}");
	};

	assert_eq!(external_call_id, "v3:abc");
	assert_eq!(outcome, CallOutcome::NoAnswer);
	assert_eq!(duration_secs, 42);
	assert_eq!(sentiment, Some(0.8));
	assert_eq!(topics, vec!["pricing".to_string()]);
	assert_eq!(occurred_at, None);
}

#[test]
fn parses_side_channel_events() {
	let recording = serde_json::json!({
		"meta": { "event_type": "recording.saved" },
		"data": { "call_id": "v3:abc", "recording_url": "https://cdn.example.com/rec.mp3" }
	});
	let transcript = serde_json::json!({
		"meta": { "event_type": "transcript.ready" },
		"data": {
			"call_id": "v3:abc",
			"transcript_url": "https://cdn.example.com/t.txt",
			"transcript_text": "How much does it cost?"
		}
	});

	assert_eq!(
		event::parse_event(recording.to_string().as_bytes()).expect("must parse"),
		ParsedEvent::Event(CallEvent::RecordingSaved {
			external_call_id: "v3:abc".to_string(),
			recording_url: "https://cdn.example.com/rec.mp3".to_string(),
		}),
	);
	assert_eq!(
		event::parse_event(transcript.to_string().as_bytes()).expect("must parse"),
		ParsedEvent::Event(CallEvent::TranscriptReady {
			external_call_id: "v3:abc".to_string(),
			transcript_url: Some("https://cdn.example.com/t.txt".to_string()),
			transcript_text: "How much does it cost?".to_string(),
		}),
	);
}

#[test]
fn unknown_event_type_is_preserved_not_rejected() {
	let raw = serde_json::json!({
		"meta": { "event_type": "call.machine_detection.ended" },
		"data": { "call_id": "v3:abc" }
	});
	let parsed = event::parse_event(raw.to_string().as_bytes()).expect("must parse");

	assert_eq!(parsed, ParsedEvent::Unknown("call.machine_detection.ended".to_string()));
}

#[test]
fn malformed_envelope_errors() {
	assert!(event::parse_event(b"not json").is_err());
	assert!(event::parse_event(br#"{"data":{}}"#).is_err());

	let missing_field = serde_json::json!({
		"meta": { "event_type": "recording.saved" },
		"data": { "call_id": "v3:abc" }
	});

	assert!(event::parse_event(missing_field.to_string().as_bytes()).is_err());
}

#[test]
fn event_exposes_external_call_id() {
	let event = CallEvent::CallAnswered {
		external_call_id: "v3:abc".to_string(),
		occurred_at: None,
	};

	assert_eq!(event.external_call_id(), "v3:abc");
}
