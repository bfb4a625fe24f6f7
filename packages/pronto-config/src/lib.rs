mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Flags, Leads, Notifications, Postgres, Service, Storage, Webhook};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.notifications.channel_url.trim().is_empty() {
		return Err(Error::Validation {
			message: "notifications.channel_url must be non-empty.".to_string(),
		});
	}
	if !cfg.notifications.channel_url.starts_with("http://")
		&& !cfg.notifications.channel_url.starts_with("https://")
	{
		return Err(Error::Validation {
			message: "notifications.channel_url must be an http(s) URL.".to_string(),
		});
	}
	if cfg.notifications.recipient.trim().is_empty() {
		return Err(Error::Validation {
			message: "notifications.recipient must be non-empty.".to_string(),
		});
	}
	if cfg.notifications.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "notifications.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.notifications.cooldown_hours <= 0 {
		return Err(Error::Validation {
			message: "notifications.cooldown_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.notifications.quiet_start_hour > 23 {
		return Err(Error::Validation {
			message: "notifications.quiet_start_hour must be in the range 0-23.".to_string(),
		});
	}
	if cfg.notifications.quiet_end_hour > 23 {
		return Err(Error::Validation {
			message: "notifications.quiet_end_hour must be in the range 0-23.".to_string(),
		});
	}
	if cfg.notifications.utc_offset_minutes.abs() > 14 * 60 {
		return Err(Error::Validation {
			message: "notifications.utc_offset_minutes must be within +/-840.".to_string(),
		});
	}
	if cfg.leads.dedup_window_days <= 0 {
		return Err(Error::Validation {
			message: "leads.dedup_window_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.webhook
		.signing_secret
		.as_deref()
		.map(|secret| secret.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.webhook.signing_secret = None;
	}
}
