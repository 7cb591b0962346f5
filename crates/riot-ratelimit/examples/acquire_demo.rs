use riot_ratelimit::{Invocation, Limiter, ResponseHeaders};

#[tokio::main]
async fn main() {
	let limiter = Limiter::new();
	let invocation = Invocation::new("dev-api-key", "na1", "/lol/match/v4/matches", "", false);

	// Normally these come from the first real response for this invocation;
	// seeded here so the demo has quota to acquire against.
	limiter
		.observe(
			&invocation,
			&ResponseHeaders {
				app_rate_limit: Some("20:1,100:120".to_string()),
				method_rate_limit: Some("2000:10".to_string()),
				..Default::default()
			},
		)
		.expect("well-formed seed headers");

	let reservation = limiter.acquire(&invocation).await.expect("quota available");
	println!("acquired quota for {invocation:?}");

	// ... perform the actual Riot API call here ...

	reservation.done();
	println!("released quota");
}
