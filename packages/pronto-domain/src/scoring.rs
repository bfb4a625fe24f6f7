use std::str::FromStr;

use serde::{Deserialize, Serialize};

const PRICING_KEYWORDS: [&str; 3] = ["cost", "price", "how much"];
const INSURANCE_KEYWORDS: [&str; 2] = ["insurance", "coverage"];
const SCHEDULING_KEYWORDS: [&str; 3] = ["appointment", "schedule", "when can"];

const MAX_DURATION_POINTS: u32 = 30;
const LONG_CALL_THRESHOLD_SECS: u32 = 180;
const MIN_ENGAGEMENT_QUESTIONS: usize = 3;
const MAX_SCORE: u32 = 100;

const HOT_THRESHOLD: u8 = 75;
const WARM_THRESHOLD: u8 = 50;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadQuality {
	Hot,
	Warm,
	Cold,
	/// Manual override only; the scorer never produces this tier.
	Unqualified,
}

impl LeadQuality {
	pub fn from_score(score: u8) -> Self {
		if score >= HOT_THRESHOLD {
			Self::Hot
		} else if score >= WARM_THRESHOLD {
			Self::Warm
		} else {
			Self::Cold
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Hot => "HOT",
			Self::Warm => "WARM",
			Self::Cold => "COLD",
			Self::Unqualified => "UNQUALIFIED",
		}
	}
}

impl FromStr for LeadQuality {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"HOT" => Ok(Self::Hot),
			"WARM" => Ok(Self::Warm),
			"COLD" => Ok(Self::Cold),
			"UNQUALIFIED" => Ok(Self::Unqualified),
			_ => Err(format!("unknown lead quality: {s}")),
		}
	}
}

impl std::fmt::Display for LeadQuality {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreInput {
	pub duration_secs: u32,
	pub transcript: Option<String>,
	pub sentiment: Option<f32>,
	pub topics: Vec<String>,
}

/// Per-rule points. Serializes as a rule-name to points map.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ScoreBreakdown {
	pub duration: u8,
	pub pricing_interest: u8,
	pub insurance_interest: u8,
	pub scheduling_intent: u8,
	pub sentiment: u8,
	pub engagement: u8,
	pub long_call: u8,
}

impl ScoreBreakdown {
	pub fn total(&self) -> u32 {
		u32::from(self.duration)
			+ u32::from(self.pricing_interest)
			+ u32::from(self.insurance_interest)
			+ u32::from(self.scheduling_intent)
			+ u32::from(self.sentiment)
			+ u32::from(self.engagement)
			+ u32::from(self.long_call)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreOutcome {
	pub score: u8,
	pub quality: LeadQuality,
	pub breakdown: ScoreBreakdown,
}

/// Scores one call. Additive rules over the same input, summed and clamped to
/// [0, 100]; the raw sum can exceed 100, so the clamp is load-bearing.
pub fn score(input: &ScoreInput) -> ScoreOutcome {
	let transcript = input.transcript.as_deref().map(str::to_lowercase);
	let transcript = transcript.as_deref().unwrap_or("");
	let breakdown = ScoreBreakdown {
		duration: duration_points(input.duration_secs),
		pricing_interest: interest_points(transcript, &input.topics, &PRICING_KEYWORDS, "pricing", 20),
		insurance_interest: interest_points(
			transcript,
			&input.topics,
			&INSURANCE_KEYWORDS,
			"insurance",
			15,
		),
		scheduling_intent: interest_points(
			transcript,
			&input.topics,
			&SCHEDULING_KEYWORDS,
			"scheduling",
			25,
		),
		sentiment: sentiment_points(input.sentiment),
		engagement: engagement_points(transcript),
		long_call: if input.duration_secs > LONG_CALL_THRESHOLD_SECS { 10 } else { 0 },
	};
	let score = breakdown.total().min(MAX_SCORE) as u8;

	ScoreOutcome { score, quality: LeadQuality::from_score(score), breakdown }
}

fn duration_points(duration_secs: u32) -> u8 {
	(duration_secs / 10).min(MAX_DURATION_POINTS) as u8
}

fn interest_points(
	transcript: &str,
	topics: &[String],
	keywords: &[&str],
	topic: &str,
	points: u8,
) -> u8 {
	let in_transcript = !transcript.is_empty()
		&& keywords.iter().any(|keyword| transcript.contains(keyword));
	let in_topics = topics.iter().any(|entry| entry.eq_ignore_ascii_case(topic));

	if in_transcript || in_topics { points } else { 0 }
}

fn sentiment_points(sentiment: Option<f32>) -> u8 {
	let Some(sentiment) = sentiment else {
		return 0;
	};

	(f64::from(sentiment.clamp(0.0, 1.0)) * 20.0).round() as u8
}

fn engagement_points(transcript: &str) -> u8 {
	let questions = transcript.chars().filter(|c| *c == '?').count();

	if questions >= MIN_ENGAGEMENT_QUESTIONS { 10 } else { 0 }
}
