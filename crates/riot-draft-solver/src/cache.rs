use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::payoff::Payoff;
use crate::state::DraftState;

/// Stores payoffs already computed for a normalized starting state, so a
/// strategically equivalent history never gets re-solved.
pub trait Cache: Send + Sync {
	fn get(&self, state: &DraftState) -> Option<Payoff>;
	fn put(&self, state: DraftState, payoff: Payoff);
}

/// An in-memory `Cache` backed by a mutex-guarded map. The default cache for
/// [`crate::solver::Solver`]; swap in a different `Cache` implementation to
/// share results across solver instances or processes.
#[derive(Default)]
pub struct MapCache {
	inner: Mutex<HashMap<DraftState, Payoff>>,
}

impl MapCache {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}
}

impl Cache for MapCache {
	fn get(&self, state: &DraftState) -> Option<Payoff> {
		let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
		inner.get(state).copied()
	}

	fn put(&self, state: DraftState, payoff: Payoff) {
		let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
		inner.insert(state, payoff);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn put_then_get_round_trips() {
		let cache = MapCache::new();
		let state = DraftState::new();
		let payoff = Payoff { utility: 1.5, next_state: state };

		assert!(cache.get(&state).is_none());
		cache.put(state, payoff);
		assert_eq!(cache.get(&state), Some(payoff));
	}
}
