use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub webhook: Webhook,
	pub notifications: Notifications,
	pub leads: Leads,
	#[serde(default)]
	pub flags: Flags,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Webhook {
	/// Shared secret for HMAC-SHA256 signature verification. When absent, every
	/// inbound payload is accepted regardless of signature.
	pub signing_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Notifications {
	pub channel_url: String,
	pub recipient: String,
	#[serde(default = "default_notify_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_cooldown_hours")]
	pub cooldown_hours: i64,
	#[serde(default = "default_quiet_start_hour")]
	pub quiet_start_hour: u8,
	#[serde(default = "default_quiet_end_hour")]
	pub quiet_end_hour: u8,
	/// Offset applied to UTC before the quiet-hours check. The gate works on
	/// wall-clock hours at the configured site, not on process-local time.
	#[serde(default)]
	pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct Leads {
	#[serde(default = "default_dedup_window_days")]
	pub dedup_window_days: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Flags {
	pub defaults: HashMap<String, bool>,
}

fn default_notify_timeout_ms() -> u64 {
	5_000
}

fn default_cooldown_hours() -> i64 {
	24
}

fn default_quiet_start_hour() -> u8 {
	22
}

fn default_quiet_end_hour() -> u8 {
	8
}

fn default_dedup_window_days() -> i64 {
	7
}
