use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Runtime configuration for the rate limit service, parsed from CLI flags
/// or their `env` equivalents.
#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
	#[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8000", help = "Address the HTTP server binds to")]
	pub bind_address: String,

	#[arg(long, env = "RUST_LOG", default_value = "info", help = "tracing-subscriber EnvFilter directive")]
	pub rust_log: Option<String>,

	#[arg(long, env = "LOG_JSON", default_value = "false", help = "Emit structured JSON logs instead of pretty-printed ones")]
	pub log_json: bool,

	#[arg(
        long,
        env = "TOKEN_IDLE_TIMEOUT_SECS",
        default_value = "60",
        value_parser = parse_duration,
        help = "Seconds an acquired token may sit unresolved before it is auto-finalized"
    )]
	pub token_idle_timeout: Duration,
}

impl Config {
	#[must_use]
	pub fn new() -> Self {
		Self::parse()
	}

	#[cfg(test)]
	pub fn test() -> Self {
		Self {
			bind_address: "127.0.0.1:0".to_string(),
			rust_log: Some("debug".to_string()),
			log_json: false,
			token_idle_timeout: Duration::from_secs(1),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			bind_address: "127.0.0.1:8000".to_string(),
			rust_log: Some("info".to_string()),
			log_json: false,
			token_idle_timeout: Duration::from_secs(60),
		}
	}
}

fn parse_duration(s: &str) -> Result<Duration, std::num::ParseIntError> {
	s.parse::<u64>().map(Duration::from_secs)
}
