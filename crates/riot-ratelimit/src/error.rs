use thiserror::Error;

/// Errors surfaced by window accounting and the invocation limiter.
///
/// This deliberately mirrors the small, closed error taxonomy the rest of
/// the toolkit uses (compare `riot-draft-solver::error::SolverError`):
/// callers match on a handful of named kinds rather than inspecting
/// arbitrary strings.
#[derive(Error, Debug)]
pub enum RateLimitError {
	#[error("acquire was cancelled before quota became available")]
	Cancelled,

	#[error("could not parse rate limit header: {0}")]
	HeaderParse(String),
}
