use riot_ratelimit::{Invocation, ResponseHeaders};
use riot_ratelimit_service::LimiterClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let client = LimiterClient::new("http://127.0.0.1:8000/")?;
	let invocation = Invocation::new("dev-api-key", "na1", "/lol/match/v4/matches", "", false);

	let reservation = client.acquire(&invocation).await?;
	println!("acquired token for {invocation:?}");

	// ... perform the actual Riot API call here, then forward its headers ...
	reservation.done(&ResponseHeaders::default()).await?;

	Ok(())
}
