use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{Cache, MapCache};
use crate::champion::ChampionId;
use crate::error::SolverError;
use crate::payoff::Payoff;
use crate::state::DraftState;

/// Scores a set of champions from the perspective of whichever side holds
/// them. Shared between Blue's and Red's evaluation, so the same function
/// must make sense applied to either side's champion set.
pub type UtilityFn = dyn Fn(&HashSet<ChampionId>) -> Result<f64, SolverError> + Send + Sync;

/// One named step of the draft, in the fixed order the real draft follows.
/// Each variant corresponds to one action (or, for the simultaneous pick
/// phases, two consecutive actions) in [`crate::state`]'s slot layout.
///
/// Passed to [`Solver::solve_from`] to query optimal play starting from any
/// partial draft, not just an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	BlueFirstBan,
	RedFirstBan,
	BlueSecondBan,
	RedSecondBan,
	BlueThirdBan,
	RedThirdBan,
	BlueFirstPick,
	RedFirstAndSecondPick,
	BlueSecondAndThirdPick,
	RedThirdPick,
	RedFourthBan,
	BlueFourthBan,
	RedFifthBan,
	BlueFifthBan,
	RedFourthPick,
	BlueFourthAndFifthPick,
	RedFifthPick,
}

/// Solves for optimal bans and picks across a fixed-order draft, given a
/// pool of viable champions and a utility function for scoring a completed
/// side's champion set.
///
/// Each [`Phase`] corresponds to one named step of the draft and recurses
/// into the next step via memoized minimax: Blue maximizes
/// `blue_minus_red_utility`, Red minimizes it.
pub struct Solver {
	champion_pool: HashSet<ChampionId>,
	utility: Arc<UtilityFn>,
	cache: Box<dyn Cache>,
}

impl Solver {
	/// Builds a solver backed by the default in-memory [`MapCache`].
	pub fn new(champion_pool: HashSet<ChampionId>, utility: impl Fn(&HashSet<ChampionId>) -> Result<f64, SolverError> + Send + Sync + 'static) -> Self {
		Self::with_cache(champion_pool, utility, Box::new(MapCache::new()))
	}

	/// Builds a solver backed by a caller-supplied cache, e.g. to share
	/// solved subtrees across solver instances.
	pub fn with_cache(champion_pool: HashSet<ChampionId>, utility: impl Fn(&HashSet<ChampionId>) -> Result<f64, SolverError> + Send + Sync + 'static, cache: Box<dyn Cache>) -> Self {
		Self {
			champion_pool,
			utility: Arc::new(utility),
			cache,
		}
	}

	/// Solves the entire draft from an empty state, starting at Blue's
	/// first ban.
	///
	/// # Errors
	///
	/// Returns [`SolverError::PoolExhausted`] if the champion pool is too
	/// small to complete the draft, or whatever error the utility function
	/// raises.
	pub fn solve(&self) -> Result<Payoff, SolverError> {
		self.solve_from(DraftState::new(), Phase::BlueFirstBan)
	}

	/// Solves optimal play starting from `state` at `phase`, so a caller
	/// holding a partial draft can query the best continuation without
	/// replaying everything that came before it.
	///
	/// `state` need not be normalized: the returned [`Payoff::next_state`]
	/// is always rebased onto the `state` passed in, regardless of what
	/// canonicalization happened internally to make the cache effective.
	///
	/// # Errors
	///
	/// Returns [`SolverError::PoolExhausted`] if the champion pool is too
	/// small to complete the draft from `phase` onward, or whatever error
	/// the utility function raises.
	pub fn solve_from(&self, state: DraftState, phase: Phase) -> Result<Payoff, SolverError> {
		match phase {
			Phase::BlueFirstBan => self.blue_first_ban(state),
			Phase::RedFirstBan => self.red_first_ban(state),
			Phase::BlueSecondBan => self.blue_second_ban(state),
			Phase::RedSecondBan => self.red_second_ban(state),
			Phase::BlueThirdBan => self.blue_third_ban(state),
			Phase::RedThirdBan => self.red_third_ban(state),
			Phase::BlueFirstPick => self.blue_first_pick(state),
			Phase::RedFirstAndSecondPick => self.red_first_and_second_pick(state),
			Phase::BlueSecondAndThirdPick => self.blue_second_and_third_pick(state),
			Phase::RedThirdPick => self.red_third_pick(state),
			Phase::RedFourthBan => self.red_fourth_ban(state),
			Phase::BlueFourthBan => self.blue_fourth_ban(state),
			Phase::RedFifthBan => self.red_fifth_ban(state),
			Phase::BlueFifthBan => self.blue_fifth_ban(state),
			Phase::RedFourthPick => self.red_fourth_pick(state),
			Phase::BlueFourthAndFifthPick => self.blue_fourth_and_fifth_pick(state),
			Phase::RedFifthPick => self.red_fifth_pick(state),
		}
	}

	fn blue_minus_red_utility(&self, state: &DraftState) -> Result<f64, SolverError> {
		let blue = (self.utility)(&state.blue())?;
		let red = (self.utility)(&state.red())?;
		Ok(blue - red)
	}

	fn one_action(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>, greater: fn(f64, f64) -> bool) -> Result<Payoff, SolverError> {
		let normalized = state.normalize();
		if let Some(cached) = self.cache.get(&normalized) {
			return Ok(Payoff {
				utility: cached.utility,
				next_state: state.merge(&cached.next_state),
			});
		}

		let mut best: Option<Payoff> = None;
		for champion in state.available1(&self.champion_pool) {
			let mut next_state = normalized;
			next_state.set_action(action, champion);

			let candidate = match next_action {
				Some(next) => next(self, next_state)?,
				None => Payoff {
					utility: self.blue_minus_red_utility(&next_state)?,
					next_state,
				},
			};

			best = Some(match best {
				Some(current) if !greater(candidate.utility, current.utility) => current,
				_ => candidate,
			});
		}

		let best = best.ok_or(SolverError::PoolExhausted)?;
		self.cache.put(normalized, best);
		Ok(Payoff {
			utility: best.utility,
			next_state: state.merge(&best.next_state),
		})
	}

	fn two_actions(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>, greater: fn(f64, f64) -> bool) -> Result<Payoff, SolverError> {
		let normalized = state.normalize();
		if let Some(cached) = self.cache.get(&normalized) {
			return Ok(Payoff {
				utility: cached.utility,
				next_state: state.merge(&cached.next_state),
			});
		}

		let mut best: Option<Payoff> = None;
		for (low, high) in state.available2(&self.champion_pool) {
			let mut next_state = normalized;
			next_state.set_action(action, low);
			next_state.set_action(action + 1, high);

			let candidate = match next_action {
				Some(next) => next(self, next_state)?,
				None => Payoff {
					utility: self.blue_minus_red_utility(&next_state)?,
					next_state,
				},
			};

			best = Some(match best {
				Some(current) if !greater(candidate.utility, current.utility) => current,
				_ => candidate,
			});
		}

		let best = best.ok_or(SolverError::PoolExhausted)?;
		self.cache.put(normalized, best);
		Ok(Payoff {
			utility: best.utility,
			next_state: state.merge(&best.next_state),
		})
	}

	fn blue_one_action(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>) -> Result<Payoff, SolverError> {
		self.one_action(state, action, next_action, |a, b| a > b)
	}

	fn red_one_action(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>) -> Result<Payoff, SolverError> {
		self.one_action(state, action, next_action, |a, b| a < b)
	}

	fn blue_two_actions(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>) -> Result<Payoff, SolverError> {
		self.two_actions(state, action, next_action, |a, b| a > b)
	}

	fn red_two_actions(&self, state: DraftState, action: usize, next_action: Option<fn(&Self, DraftState) -> Result<Payoff, SolverError>>) -> Result<Payoff, SolverError> {
		self.two_actions(state, action, next_action, |a, b| a < b)
	}

	fn blue_first_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 0, Some(Self::red_first_ban))
	}

	fn red_first_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 1, Some(Self::blue_second_ban))
	}

	fn blue_second_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 2, Some(Self::red_second_ban))
	}

	fn red_second_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 3, Some(Self::blue_third_ban))
	}

	fn blue_third_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 4, Some(Self::red_third_ban))
	}

	fn red_third_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 5, Some(Self::blue_first_pick))
	}

	fn blue_first_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 6, Some(Self::red_first_and_second_pick))
	}

	fn red_first_and_second_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_two_actions(state, 7, Some(Self::blue_second_and_third_pick))
	}

	fn blue_second_and_third_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_two_actions(state, 9, Some(Self::red_third_pick))
	}

	fn red_third_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 11, Some(Self::red_fourth_ban))
	}

	fn red_fourth_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 12, Some(Self::blue_fourth_ban))
	}

	fn blue_fourth_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 13, Some(Self::red_fifth_ban))
	}

	fn red_fifth_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 14, Some(Self::blue_fifth_ban))
	}

	fn blue_fifth_ban(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_one_action(state, 15, Some(Self::red_fourth_pick))
	}

	fn red_fourth_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 16, Some(Self::blue_fourth_and_fifth_pick))
	}

	fn blue_fourth_and_fifth_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.blue_two_actions(state, 17, Some(Self::red_fifth_pick))
	}

	fn red_fifth_pick(&self, state: DraftState) -> Result<Payoff, SolverError> {
		self.red_one_action(state, 19, None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn champ(id: u32) -> ChampionId {
		ChampionId::new(id).unwrap()
	}

	fn pool(count: u32) -> HashSet<ChampionId> {
		(1..=count).map(champ).collect()
	}

	// Utility is just the sum of champion IDs: easy to reason about by hand,
	// and large enough a pool still forces real tradeoffs between actions.
	fn sum_utility(champions: &HashSet<ChampionId>) -> Result<f64, SolverError> {
		Ok(champions.iter().map(|c| f64::from(c.get())).sum())
	}

	#[test]
	fn solve_completes_a_full_draft_with_a_minimal_pool() {
		// 20 actions need exactly 20 distinct champions.
		let solver = Solver::new(pool(20), sum_utility);
		let payoff = solver.solve().unwrap();

		let unavailable = payoff.next_state.unavailable();
		assert_eq!(unavailable.len(), 20);
		assert_eq!(payoff.next_state.blue().len(), 5);
		assert_eq!(payoff.next_state.red().len(), 5);
		assert_eq!(payoff.next_state.bans().len(), 10);
	}

	#[test]
	fn pool_too_small_to_complete_the_draft_errors() {
		let solver = Solver::new(pool(19), sum_utility);
		assert!(matches!(solver.solve(), Err(SolverError::PoolExhausted)));
	}

	#[test]
	fn utility_errors_propagate_out_of_solve() {
		let solver = Solver::new(pool(20), |_champions| Err(SolverError::Utility("boom".to_string())));
		assert!(matches!(solver.solve(), Err(SolverError::Utility(_))));
	}

	#[test]
	fn repeated_solve_reuses_the_cache() {
		let solver = Solver::new(pool(20), sum_utility);
		let first = solver.solve().unwrap();
		let second = solver.solve().unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn concrete_scenario_red_fifth_pick_takes_the_higher_remaining_champion() {
		// Pool {1..=21}, slots 0..=18 filled with 1..=19; only 20 and 21 remain
		// for the final slot. Red, minimizing blue-minus-red, takes the larger.
		let solver = Solver::new(pool(21), sum_utility);
		let mut state = DraftState::new();
		for slot in 0..19 {
			state.set_action(slot, champ((slot + 1) as u32));
		}

		let payoff = solver.solve_from(state, Phase::RedFifthPick).unwrap();
		assert_eq!(payoff.next_state.action(19), Some(champ(21)));
	}

	#[test]
	fn canonicalization_gives_the_same_utility_regardless_of_ban_order() {
		let solver = Solver::new(pool(21), sum_utility);

		let mut ordered = DraftState::new();
		ordered.set_action(0, champ(1));
		ordered.set_action(1, champ(3));
		ordered.set_action(2, champ(5));

		let mut shuffled = DraftState::new();
		shuffled.set_action(0, champ(5));
		shuffled.set_action(1, champ(1));
		shuffled.set_action(2, champ(3));

		let ordered_payoff = solver.solve_from(ordered, Phase::RedSecondBan).unwrap();
		let shuffled_payoff = solver.solve_from(shuffled, Phase::RedSecondBan).unwrap();
		assert_eq!(ordered_payoff.utility, shuffled_payoff.utility);
	}

	#[test]
	fn rebase_keeps_the_callers_input_prefix_unchanged() {
		let solver = Solver::new(pool(21), sum_utility);
		let mut state = DraftState::new();
		state.set_action(0, champ(5));
		state.set_action(1, champ(2));
		state.set_action(2, champ(9));

		let payoff = solver.solve_from(state, Phase::RedSecondBan).unwrap();
		for slot in 0..3 {
			assert_eq!(payoff.next_state.action(slot), state.action(slot));
		}
	}
}
