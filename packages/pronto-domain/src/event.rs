use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
	Inbound,
	Outbound,
}

impl CallDirection {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Inbound => "inbound",
			Self::Outbound => "outbound",
		}
	}
}

/// Terminal status carried by a completion event. Maps one-to-one onto the
/// terminal half of the call status set.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
	#[default]
	Completed,
	Failed,
	Busy,
	NoAnswer,
}

impl CallOutcome {
	pub fn as_status(&self) -> &'static str {
		match self {
			Self::Completed => "completed",
			Self::Failed => "failed",
			Self::Busy => "busy",
			Self::NoAnswer => "no_answer",
		}
	}
}

/// One variant per webhook event kind. Recording and transcript events are
/// side-channel patches with no ordering guarantee against completion.
#[derive(Clone, Debug, PartialEq)]
pub enum CallEvent {
	CallInitiated {
		external_call_id: String,
		phone_number: String,
		direction: CallDirection,
		occurred_at: Option<OffsetDateTime>,
		/// The raw `data` object, kept as the call's opaque metadata blob.
		metadata: serde_json::Value,
	},
	CallAnswered {
		external_call_id: String,
		occurred_at: Option<OffsetDateTime>,
	},
	CallCompleted {
		external_call_id: String,
		outcome: CallOutcome,
		duration_secs: u32,
		sentiment: Option<f32>,
		topics: Vec<String>,
		occurred_at: Option<OffsetDateTime>,
	},
	RecordingSaved {
		external_call_id: String,
		recording_url: String,
	},
	TranscriptReady {
		external_call_id: String,
		transcript_url: Option<String>,
		transcript_text: String,
	},
}

impl CallEvent {
	pub fn external_call_id(&self) -> &str {
		match self {
			Self::CallInitiated { external_call_id, .. }
			| Self::CallAnswered { external_call_id, .. }
			| Self::CallCompleted { external_call_id, .. }
			| Self::RecordingSaved { external_call_id, .. }
			| Self::TranscriptReady { external_call_id, .. } => external_call_id,
		}
	}
}

/// Result of envelope parsing. Unknown event kinds are surfaced with their
/// wire name so the dispatcher can log and drop them without erroring.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedEvent {
	Event(CallEvent),
	Unknown(String),
}

#[derive(Debug)]
pub enum EventError {
	Malformed { message: String },
}

impl std::fmt::Display for EventError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Malformed { message } => write!(f, "Malformed webhook payload: {message}"),
		}
	}
}

impl std::error::Error for EventError {}

#[derive(Debug, Deserialize)]
struct Envelope {
	meta: Meta,
	#[serde(default)]
	data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Meta {
	event_type: String,
}

#[derive(Debug, Deserialize)]
struct InitiatedData {
	call_id: String,
	#[serde(default)]
	phone_number: String,
	direction: CallDirection,
	#[serde(default, with = "time::serde::rfc3339::option")]
	occurred_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
struct AnsweredData {
	call_id: String,
	#[serde(default, with = "time::serde::rfc3339::option")]
	occurred_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
struct CompletedData {
	call_id: String,
	#[serde(default)]
	outcome: CallOutcome,
	#[serde(default)]
	duration_secs: u32,
	#[serde(default)]
	sentiment: Option<f32>,
	#[serde(default)]
	topics: Vec<String>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	occurred_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
struct RecordingData {
	call_id: String,
	recording_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptData {
	call_id: String,
	#[serde(default)]
	transcript_url: Option<String>,
	transcript_text: String,
}

pub fn parse_event(raw: &[u8]) -> Result<ParsedEvent, EventError> {
	let envelope: Envelope = serde_json::from_slice(raw).map_err(malformed)?;
	let event = match envelope.meta.event_type.as_str() {
		"call.initiated" => {
			let metadata = envelope.data.clone();
			let data: InitiatedData = serde_json::from_value(envelope.data).map_err(malformed)?;

			CallEvent::CallInitiated {
				external_call_id: data.call_id,
				phone_number: data.phone_number,
				direction: data.direction,
				occurred_at: data.occurred_at,
				metadata,
			}
		},
		"call.answered" => {
			let data: AnsweredData = serde_json::from_value(envelope.data).map_err(malformed)?;

			CallEvent::CallAnswered {
				external_call_id: data.call_id,
				occurred_at: data.occurred_at,
			}
		},
		"call.completed" => {
			let data: CompletedData = serde_json::from_value(envelope.data).map_err(malformed)?;

			CallEvent::CallCompleted {
				external_call_id: data.call_id,
				outcome: data.outcome,
				duration_secs: data.duration_secs,
				sentiment: data.sentiment,
				topics: data.topics,
				occurred_at: data.occurred_at,
			}
		},
		"recording.saved" => {
			let data: RecordingData = serde_json::from_value(envelope.data).map_err(malformed)?;

			CallEvent::RecordingSaved {
				external_call_id: data.call_id,
				recording_url: data.recording_url,
			}
		},
		"transcript.ready" => {
			let data: TranscriptData = serde_json::from_value(envelope.data).map_err(malformed)?;

			CallEvent::TranscriptReady {
				external_call_id: data.call_id,
				transcript_url: data.transcript_url,
				transcript_text: data.transcript_text,
			}
		},
		unknown => return Ok(ParsedEvent::Unknown(unknown.to_string())),
	};

	Ok(ParsedEvent::Event(event))
}

fn malformed(err: serde_json::Error) -> EventError {
	EventError::Malformed { message: err.to_string() }
}
