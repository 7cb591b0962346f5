use serde::{Deserialize, Serialize};

/// Form fields accepted by `POST /acquire/:key/:region`, mirroring the
/// optional fields the original rate limit service accepts alongside the
/// path-encoded application key and region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcquireForm {
	/// Relative HTTP path to the Riot method. Omitted for an
	/// application-level quota request.
	#[serde(default)]
	pub method: String,

	/// Distinguishes a separate quota bucket for calls sharing a method.
	#[serde(default)]
	pub uniquifier: String,

	/// When `true`, charges only the method-level window, never the
	/// application aggregate.
	#[serde(default)]
	pub no_app_quota: bool,
}

/// Body returned by a successful acquire call: an opaque token that must be
/// resolved via `done` or `cancel`.
#[derive(Debug, Clone, Serialize)]
pub struct AcquireResponse {
	pub token: String,
}
