use std::collections::HashSet;

use riot_draft_solver::{ChampionId, Solver, SolverError};

/// Scores a champion set by the count of champions it holds, purely to give
/// this demo something deterministic to optimize for. A real caller would
/// plug in a model of team synergy, counters, or win rate here instead.
fn count_utility(champions: &HashSet<ChampionId>) -> Result<f64, SolverError> {
	Ok(champions.len() as f64)
}

fn main() {
	let pool: HashSet<ChampionId> = (1..=30).map(|id| ChampionId::new(id).expect("nonzero")).collect();
	let solver = Solver::new(pool, count_utility);

	let payoff = solver.solve().expect("a 30-champion pool is large enough to complete a draft");

	println!("blue minus red utility: {}", payoff.utility);
	println!("blue picks: {:?}", payoff.next_state.blue());
	println!("red picks: {:?}", payoff.next_state.red());
	println!("bans: {:?}", payoff.next_state.bans());
}
