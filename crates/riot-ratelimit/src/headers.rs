use crate::error::RateLimitError;

/// The rate-limit-relevant headers from a single Riot API response, captured
/// as plain strings so this crate stays agnostic to any particular HTTP
/// client or server framework. Callers (the in-process HTTP caller, or the
/// limiter service's `done` handler) build this from whatever header map
/// their stack hands them.
#[derive(Debug, Default, Clone)]
pub struct ResponseHeaders {
	pub app_rate_limit: Option<String>,
	pub app_rate_limit_count: Option<String>,
	pub method_rate_limit: Option<String>,
	pub method_rate_limit_count: Option<String>,
	pub retry_after: Option<String>,
	pub rate_limit_type: Option<String>,
}

/// Parses a header of the form `"count:seconds,count:seconds,..."` (e.g.
/// `"20:1,100:120"`) into `(seconds, count)` pairs. Whitespace around either
/// field is trimmed before parsing.
pub fn parse_rate_pairs(header: &str) -> Result<Vec<(i64, i64)>, RateLimitError> {
	header
		.split(',')
		.map(|piece| {
			let piece = piece.trim();
			let (count, seconds) = piece.split_once(':').ok_or_else(|| RateLimitError::HeaderParse(format!("expected count:seconds in {piece:?}")))?;
			let count = count.trim().parse::<i64>().map_err(|_| RateLimitError::HeaderParse(format!("invalid count in {piece:?}")))?;
			let seconds = seconds.trim().parse::<i64>().map_err(|_| RateLimitError::HeaderParse(format!("invalid seconds in {piece:?}")))?;
			Ok((seconds, count))
		})
		.collect()
}

/// Parses a `Retry-After` header value as a count of whole seconds.
pub fn parse_retry_after(header: &str) -> Result<i64, RateLimitError> {
	header.trim().parse::<i64>().map_err(|_| RateLimitError::HeaderParse(format!("invalid retry-after {header:?}")))
}
