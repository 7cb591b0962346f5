use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::http::handlers::{acquire, cancel, done};
use crate::token_store::TokenStore;

pub fn routes() -> Router<Arc<TokenStore>> {
	Router::new()
		.route("/acquire/:key/:region", post(acquire))
		.route("/done/:token", post(done))
		.route("/cancel/:token", post(cancel))
}
