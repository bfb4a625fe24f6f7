use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use pronto_storage::{
	calls::{self, CallFilter},
	leads,
	models::CallRow,
};

use crate::{LeadService, LeadView, ServiceError, ServiceResult};

const DEFAULT_PAGE_LIMIT: i64 = 20;
const MAX_PAGE_LIMIT: i64 = 100;

const VALID_STATUSES: [&str; 7] =
	["initiated", "ringing", "answered", "completed", "failed", "busy", "no_answer"];
const VALID_DIRECTIONS: [&str; 2] = ["inbound", "outbound"];

#[derive(Debug, Deserialize)]
pub struct CallListRequest {
	pub status: Option<String>,
	pub direction: Option<String>,
	/// RFC 3339 lower bound on `started_at`, inclusive.
	pub from: Option<String>,
	/// RFC 3339 upper bound on `started_at`, inclusive.
	pub to: Option<String>,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CallSummary {
	pub call_id: Uuid,
	pub external_call_id: String,
	pub phone_number: String,
	pub direction: String,
	pub status: String,
	pub duration_secs: i32,
	#[serde(with = "time::serde::rfc3339")]
	pub started_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339::option")]
	pub answered_at: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option")]
	pub ended_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct CallDetail {
	#[serde(flatten)]
	pub summary: CallSummary,
	pub recording_url: Option<String>,
	pub transcript_url: Option<String>,
	pub transcript_text: Option<String>,
	pub metadata: Value,
}

#[derive(Debug, Serialize)]
pub struct CallListResponse {
	pub items: Vec<CallSummary>,
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct CallDetailResponse {
	pub call: CallDetail,
	pub lead: Option<LeadView>,
}

impl From<CallRow> for CallSummary {
	fn from(row: CallRow) -> Self {
		Self {
			call_id: row.call_id,
			external_call_id: row.external_call_id,
			phone_number: row.phone_number,
			direction: row.direction,
			status: row.status,
			duration_secs: row.duration_secs,
			started_at: row.started_at,
			answered_at: row.answered_at,
			ended_at: row.ended_at,
		}
	}
}

impl From<CallRow> for CallDetail {
	fn from(row: CallRow) -> Self {
		Self {
			recording_url: row.recording_url.clone(),
			transcript_url: row.transcript_url.clone(),
			transcript_text: row.transcript_text.clone(),
			metadata: row.metadata.clone(),
			summary: row.into(),
		}
	}
}

impl LeadService {
	pub async fn list_calls(&self, request: CallListRequest) -> ServiceResult<CallListResponse> {
		let limit = request.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

		if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
			return Err(invalid(format!("limit must be between 1 and {MAX_PAGE_LIMIT}.")));
		}

		let offset = request.offset.unwrap_or(0);

		if offset < 0 {
			return Err(invalid("offset must be zero or greater.".to_string()));
		}

		let status = validated(request.status, &VALID_STATUSES, "status")?;
		let direction = validated(request.direction, &VALID_DIRECTIONS, "direction")?;
		let started_from = parse_timestamp(request.from.as_deref(), "from")?;
		let started_to = parse_timestamp(request.to.as_deref(), "to")?;
		let filter = CallFilter { status, direction, started_from, started_to };
		let items = calls::list(&self.db, &filter, limit, offset).await?;
		let total = calls::count(&self.db, &filter).await?;

		Ok(CallListResponse {
			items: items.into_iter().map(CallSummary::from).collect(),
			total,
			limit,
			offset,
		})
	}

	pub async fn call_detail(&self, call_id: Uuid) -> ServiceResult<CallDetailResponse> {
		let Some(call) = calls::fetch(&self.db, call_id).await? else {
			return Err(ServiceError::NotFound { message: format!("call {call_id}") });
		};
		let lead = leads::fetch_for_call(&self.db, call_id).await?;

		Ok(CallDetailResponse { call: call.into(), lead: lead.map(LeadView::from) })
	}
}

fn validated(
	value: Option<String>,
	allowed: &[&str],
	field: &str,
) -> ServiceResult<Option<String>> {
	let Some(value) = value else {
		return Ok(None);
	};

	if allowed.contains(&value.as_str()) {
		Ok(Some(value))
	} else {
		Err(invalid(format!("{field} must be one of {}.", allowed.join(", "))))
	}
}

fn parse_timestamp(value: Option<&str>, field: &str) -> ServiceResult<Option<OffsetDateTime>> {
	let Some(value) = value else {
		return Ok(None);
	};

	OffsetDateTime::parse(value, &Rfc3339)
		.map(Some)
		.map_err(|_| invalid(format!("{field} must be an RFC 3339 date-time.")))
}

fn invalid(message: String) -> ServiceError {
	ServiceError::InvalidRequest { message }
}
