use std::time::Duration;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;
use uuid::Uuid;

use pronto_api::{routes, state::AppState};
use pronto_config::{Config, Flags, Leads, Notifications, Postgres, Service, Storage, Webhook};
use pronto_domain::signature;
use pronto_testkit::TestDatabase;

const SIGNING_SECRET: &str = "test-signing-secret";

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 1 } },
		webhook: Webhook { signing_secret: Some(SIGNING_SECRET.to_string()) },
		notifications: Notifications {
			channel_url: "http://127.0.0.1:1".to_string(),
			recipient: "#sales-leads".to_string(),
			timeout_ms: 1_000,
			cooldown_hours: 24,
			quiet_start_hour: 0,
			quiet_end_hour: 0,
			utc_offset_minutes: 0,
		},
		leads: Leads { dedup_window_days: 7 },
		flags: Flags::default(),
	}
}

async fn test_state(test_db: &TestDatabase) -> AppState {
	let config = test_config(test_db.dsn().to_string());

	AppState::new(config).await.expect("Failed to initialize app state.")
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response body.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PRONTO_PG_DSN to run."]
async fn health_ok() {
	let Some(base_dsn) = pronto_testkit::env_dsn() else {
		eprintln!("Skipping health_ok; set PRONTO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = routes::router(test_state(&test_db).await);
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PRONTO_PG_DSN to run."]
async fn webhook_rejects_tampered_signature() {
	let Some(base_dsn) = pronto_testkit::env_dsn() else {
		eprintln!("Skipping webhook_rejects_tampered_signature; set PRONTO_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = routes::router(test_state(&test_db).await);
	let payload = serde_json::json!({
		"meta": { "event_type": "call.initiated" },
		"data": { "call_id": "v3:sig", "phone_number": "+15550100", "direction": "inbound" }
	})
	.to_string();

	for bad_signature in ["sha256=deadbeef", "not-hex", ""] {
		let response = app
			.clone()
			.oneshot(
				Request::builder()
					.method("POST")
					.uri("/webhooks/telnyx")
					.header("content-type", "application/json")
					.header("telnyx-signature", bad_signature)
					.body(Body::from(payload.clone()))
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call webhook.");

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

		let json = read_json(response).await;

		assert_eq!(json["success"], false);
	}

	// Missing header is also a rejection once a secret is configured.
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/webhooks/telnyx")
				.header("content-type", "application/json")
				.body(Body::from(payload))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call webhook.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PRONTO_PG_DSN to run."]
async fn webhook_acknowledges_and_processes_signed_event() {
	let Some(base_dsn) = pronto_testkit::env_dsn() else {
		eprintln!(
			"Skipping webhook_acknowledges_and_processes_signed_event; set PRONTO_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let state = test_state(&test_db).await;
	let app = routes::router(state.clone());
	let payload = serde_json::json!({
		"meta": { "event_type": "call.initiated" },
		"data": { "call_id": "v3:signed", "phone_number": "+15550100", "direction": "inbound" }
	})
	.to_string();
	let signed = signature::sign(SIGNING_SECRET, payload.as_bytes());
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/webhooks/telnyx")
				.header("content-type", "application/json")
				.header("x-telnyx-signature", signed)
				.body(Body::from(payload))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call webhook.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;

	assert_eq!(json["success"], true);

	// Processing is deferred; poll briefly for the call row.
	let mut call = None;

	for _ in 0..40 {
		call = pronto_storage::calls::fetch_by_external_id(&state.service.db, "v3:signed")
			.await
			.expect("Failed to query call.");

		if call.is_some() {
			break;
		}

		tokio::time::sleep(Duration::from_millis(50)).await;
	}

	let call = call.expect("Signed event must create a call row.");

	assert_eq!(call.status, "initiated");
	assert_eq!(call.phone_number, "+15550100");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PRONTO_PG_DSN to run."]
async fn query_api_maps_errors_conventionally() {
	let Some(base_dsn) = pronto_testkit::env_dsn() else {
		eprintln!("Skipping query_api_maps_errors_conventionally; set PRONTO_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let app = routes::router(test_state(&test_db).await);

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/v1/calls?status=bogus")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call list.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(read_json(response).await["error_code"], "invalid_request");

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri(format!("/v1/calls/{}", Uuid::new_v4()))
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call detail.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(read_json(response).await["error_code"], "not_found");

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("PATCH")
				.uri(format!("/v1/leads/{}/interest", Uuid::new_v4()))
				.header("content-type", "application/json")
				.body(Body::from(r#"{"interest":"LUKEWARM"}"#))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call override.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.oneshot(
			Request::builder()
				.method("PATCH")
				.uri(format!("/v1/leads/{}/interest", Uuid::new_v4()))
				.header("content-type", "application/json")
				.body(Body::from(r#"{"interest":"UNQUALIFIED"}"#))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call override.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = routes::router(test_state(&test_db).await)
		.oneshot(
			Request::builder()
				.uri("/v1/analytics/summary")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call analytics.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;

	assert_eq!(json["total_calls"], 0);
	assert_eq!(json["completion_rate"], 0.0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
