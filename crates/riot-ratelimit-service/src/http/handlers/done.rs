use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use crate::http::Error;
use crate::token_store::TokenStore;
use riot_ratelimit::ResponseHeaders;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
	headers.get(name).and_then(|value| value.to_str().ok()).map(str::trim).map(str::to_string)
}

/// `POST /done/:token`
///
/// Finalizes the acquisition as successful. Any Riot rate-limit headers
/// present on the request are folded back into the invocation's windows
/// before its quota is released.
pub async fn done(Path(token): Path<String>, State(store): State<Arc<TokenStore>>, headers: HeaderMap) -> Result<StatusCode, Error> {
	let response_headers = ResponseHeaders {
		app_rate_limit: header(&headers, "x-app-rate-limit"),
		app_rate_limit_count: header(&headers, "x-app-rate-limit-count"),
		method_rate_limit: header(&headers, "x-method-rate-limit"),
		method_rate_limit_count: header(&headers, "x-method-rate-limit-count"),
		retry_after: header(&headers, "retry-after"),
		rate_limit_type: header(&headers, "x-rate-limit-type"),
	};

	if store.done(&token, &response_headers)? {
		Ok(StatusCode::OK)
	} else {
		Err(Error::BadToken)
	}
}
