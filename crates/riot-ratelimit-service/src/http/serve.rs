use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use prometheus::Registry;
use riot_ratelimit::Limiter;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::add_extension::AddExtensionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::http::routes;
use crate::token_store::{Metrics, TokenStore};

/// Binds and serves the rate limit service until the process is terminated.
pub async fn serve(config: Config) -> anyhow::Result<()> {
	let registry = Registry::new();
	let metrics = Metrics::new(&registry).context("registering rate limit service metrics")?;
	let idle_timeout = config.token_idle_timeout;
	let store = Arc::new(TokenStore::new(Limiter::new(), idle_timeout, metrics));

	let app = api_router(Arc::clone(&store)).layer(ServiceBuilder::new().layer(AddExtensionLayer::new(registry)).layer(TraceLayer::new_for_http()));

	let listener = TcpListener::bind(&config.bind_address).await.context("binding listener")?;
	tracing::info!(address = %config.bind_address, idle_timeout = ?idle_timeout, "listening");
	axum::serve(listener, app).await.context("serving rate limit service")?;
	Ok(())
}

fn api_router(store: Arc<TokenStore>) -> Router {
	routes::limiter::routes().with_state(store)
}
