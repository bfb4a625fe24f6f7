use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use pronto_domain::signature;
use pronto_service::{
	AnalyticsSummary, CallDetailResponse, CallListRequest, CallListResponse, LeadView,
	OverrideInterestRequest, ServiceError,
};

use crate::state::AppState;

const SIGNATURE_HEADERS: [&str; 2] = ["telnyx-signature", "x-telnyx-signature"];

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/webhooks/telnyx", post(telnyx_webhook))
		.route("/v1/calls", get(list_calls))
		.route("/v1/calls/{call_id}", get(call_detail))
		.route("/v1/analytics/summary", get(analytics_summary))
		.route("/v1/leads/{lead_id}/interest", patch(override_interest))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
	pub success: bool,
	pub message: String,
}

/// Verifies the signature, acknowledges, and defers the actual event handling
/// to a background task. Whatever happens downstream, the vendor already has
/// its 200.
async fn telnyx_webhook(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> (StatusCode, Json<WebhookAck>) {
	let provided = SIGNATURE_HEADERS
		.iter()
		.find_map(|name| headers.get(*name))
		.and_then(|value| value.to_str().ok());

	if !signature::verify(
		state.service.cfg.webhook.signing_secret.as_deref(),
		&body,
		provided,
	) {
		return (
			StatusCode::UNAUTHORIZED,
			Json(WebhookAck {
				success: false,
				message: "Invalid webhook signature.".to_string(),
			}),
		);
	}

	let service = state.service.clone();

	tokio::spawn(async move {
		service.process_webhook(&body).await;
	});

	(
		StatusCode::OK,
		Json(WebhookAck { success: true, message: "Event accepted.".to_string() }),
	)
}

async fn list_calls(
	State(state): State<AppState>,
	Query(request): Query<CallListRequest>,
) -> Result<Json<CallListResponse>, ApiError> {
	let response = state.service.list_calls(request).await?;
	Ok(Json(response))
}

async fn call_detail(
	State(state): State<AppState>,
	Path(call_id): Path<Uuid>,
) -> Result<Json<CallDetailResponse>, ApiError> {
	let response = state.service.call_detail(call_id).await?;
	Ok(Json(response))
}

async fn analytics_summary(
	State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
	let response = state.service.analytics_summary().await?;
	Ok(Json(response))
}

async fn override_interest(
	State(state): State<AppState>,
	Path(lead_id): Path<Uuid>,
	Json(payload): Json<OverrideInterestRequest>,
) -> Result<Json<LeadView>, ApiError> {
	let response = state.service.override_interest(lead_id, payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Query failed against storage.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Storage operation failed.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
