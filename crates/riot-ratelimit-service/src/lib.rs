//! HTTP projection of the invocation limiter: mints opaque reservation
//! tokens over `POST /acquire/:key/:region`, finalized via `/done/:token` or
//! `/cancel/:token`, so multiple independent processes can share a single
//! pool of Riot API quota.

pub mod client;
pub mod config;
pub mod http;
pub mod token_store;

pub use client::{ClientError, LimiterClient, RemoteReservation};
pub use config::Config;

/// Initializes the global tracing subscriber from `config`, honoring both
/// the `RUST_LOG`-style filter string and the pretty/JSON output toggle.
#[must_use]
pub fn init_tracing(config: &Config) -> Option<()> {
	use std::str::FromStr;
	use tracing_subscriber::filter::EnvFilter;
	use tracing_subscriber::fmt::format::JsonFields;
	use tracing_subscriber::layer::SubscriberExt;
	use tracing_subscriber::util::SubscriberInitExt;
	use tracing_subscriber::Layer;

	let filter = EnvFilter::from_str(config.rust_log.as_deref()?).unwrap();

	tracing_subscriber::registry()
		.with(if config.log_json {
			Box::new(
				tracing_subscriber::fmt::layer()
					.fmt_fields(JsonFields::default())
					.event_format(tracing_subscriber::fmt::format().json().flatten_event(true).with_span_list(false))
					.with_filter(filter),
			) as Box<dyn Layer<_> + Send + Sync>
		} else {
			Box::new(tracing_subscriber::fmt::layer().event_format(tracing_subscriber::fmt::format().pretty()).with_filter(filter))
		})
		.init();
	None
}
