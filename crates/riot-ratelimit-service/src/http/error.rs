use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

/// Errors the HTTP layer can return to a caller of the rate limit service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("no acquisition is outstanding for this token")]
	BadToken,

	#[error("malformed rate limit header: {0}")]
	BadHeaders(#[from] riot_ratelimit::RateLimitError),

	#[error("an internal error occurred")]
	Anyhow(#[from] anyhow::Error),
}

impl Error {
	const fn status_code(&self) -> StatusCode {
		match self {
			Self::BadToken | Self::BadHeaders(_) => StatusCode::BAD_REQUEST,
			Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		if let Self::Anyhow(ref e) = self {
			tracing::error!(error = ?e, "internal error handling rate limit request");
		}

		(self.status_code(), self.to_string()).into_response()
	}
}
