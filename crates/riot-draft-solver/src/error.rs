use thiserror::Error;

/// Errors surfaced while solving a champion draft.
#[derive(Error, Debug)]
pub enum SolverError {
	#[error("no legal champion selection remains for this action")]
	PoolExhausted,

	#[error("utility function failed: {0}")]
	Utility(String),
}
