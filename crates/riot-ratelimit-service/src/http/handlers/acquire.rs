use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::Json;

use crate::http::schema::{AcquireForm, AcquireResponse};
use crate::http::Error;
use crate::token_store::TokenStore;
use riot_ratelimit::Invocation;

/// `POST /acquire/:key/:region`
///
/// Reserves quota for the described invocation and returns a token that must
/// be resolved via [`crate::http::handlers::done`] or
/// [`crate::http::handlers::cancel`] within the configured idle timeout.
pub async fn acquire(Path((key, region)): Path<(String, String)>, State(store): State<Arc<TokenStore>>, Form(form): Form<AcquireForm>) -> Result<Json<AcquireResponse>, Error> {
	let invocation = Invocation::new(key, region, form.method, form.uniquifier, form.no_app_quota);
	let token = store.acquire(invocation).await.map_err(anyhow::Error::from)?;
	Ok(Json(AcquireResponse { token }))
}
