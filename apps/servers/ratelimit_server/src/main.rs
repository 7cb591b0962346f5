use clap::Parser;
use riot_ratelimit_service::{http, init_tracing, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = Config::parse();
	init_tracing(&config);

	http::serve(config).await?;

	Ok(())
}
