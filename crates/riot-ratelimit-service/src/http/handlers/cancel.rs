use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::http::Error;
use crate::token_store::TokenStore;

/// `POST /cancel/:token`
///
/// Finalizes the acquisition as cancelled, releasing its quota immediately.
pub async fn cancel(Path(token): Path<String>, State(store): State<Arc<TokenStore>>) -> Result<StatusCode, Error> {
	if store.cancel(&token) {
		Ok(StatusCode::OK)
	} else {
		Err(Error::BadToken)
	}
}
