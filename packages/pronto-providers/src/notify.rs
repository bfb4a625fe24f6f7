use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde::Serialize;

/// Structured lead notification posted to the channel webhook URL.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelMessage {
	pub lead_id: String,
	pub call_id: String,
	pub phone_number: String,
	pub score: i32,
	pub quality: String,
	pub mentioned_pricing: bool,
	pub mentioned_insurance: bool,
	pub mentioned_scheduling: bool,
	pub notes: String,
	pub call_link: String,
}

#[derive(Clone, Debug)]
pub struct DeliveryOutcome {
	pub delivered: bool,
	pub http_status: Option<u16>,
	pub detail: Option<String>,
}

/// POSTs the message to the configured channel. A reachable endpoint that
/// answers non-2xx is a failed delivery, not an error; only transport-level
/// problems surface as `Err`.
pub async fn send(
	cfg: &pronto_config::Notifications,
	message: &ChannelMessage,
) -> Result<DeliveryOutcome> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client.post(&cfg.channel_url).json(message).send().await?;
	let status = res.status();

	if status.is_success() {
		return Ok(DeliveryOutcome { delivered: true, http_status: Some(status.as_u16()), detail: None });
	}

	let body = res.text().await.unwrap_or_default();

	Ok(DeliveryOutcome {
		delivered: false,
		http_status: Some(status.as_u16()),
		detail: Some(truncate(&body, 1_024)),
	})
}

fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}

	text.chars().take(max_chars).collect()
}
