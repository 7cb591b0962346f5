use std::collections::HashSet;

use crate::champion::ChampionId;

/// Number of actions (bans plus picks) in a complete draft.
pub const ACTION_COUNT: usize = 20;

/// Slot indices belonging to a ban, in the chronological order they are
/// filled: three rounds of alternating bans, then a second round after the
/// first phase of picks.
const BAN_SLOTS: [usize; 10] = [0, 1, 2, 3, 4, 5, 12, 13, 14, 15];

/// Slot indices belonging to Blue's picks, in chronological fill order.
const BLUE_SLOTS: [usize; 5] = [6, 9, 10, 17, 18];

/// Slot indices belonging to Red's picks, in chronological fill order.
const RED_SLOTS: [usize; 5] = [7, 8, 11, 16, 19];

/// A serializable snapshot of every ban and pick up to some point in a
/// draft. Slots are filled strictly in ascending index order as the draft
/// proceeds, which is what lets every group-oriented method below stop at
/// the first unfilled slot instead of scanning the whole array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DraftState {
	actions: [Option<ChampionId>; ACTION_COUNT],
}

impl DraftState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn action(&self, slot: usize) -> Option<ChampionId> {
		self.actions[slot]
	}

	pub fn set_action(&mut self, slot: usize, champion: ChampionId) {
		self.actions[slot] = Some(champion);
	}

	/// Returns a state equivalent to this one from the perspective of the
	/// next action: every already-decided group (bans, Blue's picks, Red's
	/// picks) is sorted ascending by champion ID. This collapses
	/// strategically identical histories (e.g. banning champions 2 then 1
	/// versus 1 then 2) onto the same cache key.
	#[must_use]
	pub fn normalize(&self) -> Self {
		let mut normalized = *self;
		normalized.sort_group(&BAN_SLOTS);
		normalized.sort_group(&BLUE_SLOTS);
		normalized.sort_group(&RED_SLOTS);
		normalized
	}

	fn sort_group(&mut self, slots: &[usize]) {
		let mut values = Vec::with_capacity(slots.len());
		for &slot in slots {
			match self.actions[slot] {
				Some(champion) => values.push(champion),
				None => break,
			}
		}
		values.sort_unstable();
		for (&slot, value) in slots.iter().zip(values) {
			self.actions[slot] = Some(value);
		}
	}

	/// Overlays this state's filled slots onto a copy of `base`, restoring
	/// caller-specific history after a normalized state was used as a cache
	/// key. Stops at this state's first unfilled slot, since anything after
	/// it was never part of the caller's actual history.
	#[must_use]
	pub fn merge(&self, base: &Self) -> Self {
		let mut merged = *base;
		for (slot, action) in self.actions.iter().enumerate() {
			match action {
				Some(champion) => merged.actions[slot] = Some(*champion),
				None => break,
			}
		}
		merged
	}

	#[must_use]
	pub fn blue(&self) -> HashSet<ChampionId> {
		Self::collect(&self.actions, &BLUE_SLOTS)
	}

	#[must_use]
	pub fn red(&self) -> HashSet<ChampionId> {
		Self::collect(&self.actions, &RED_SLOTS)
	}

	#[must_use]
	pub fn bans(&self) -> HashSet<ChampionId> {
		Self::collect(&self.actions, &BAN_SLOTS)
	}

	fn collect(actions: &[Option<ChampionId>; ACTION_COUNT], slots: &[usize]) -> HashSet<ChampionId> {
		slots.iter().filter_map(|&slot| actions[slot]).collect()
	}

	/// Every champion picked or banned so far.
	#[must_use]
	pub fn unavailable(&self) -> HashSet<ChampionId> {
		self.actions.iter().take_while(|action| action.is_some()).filter_map(|action| *action).collect()
	}

	/// Champions from `pool` not yet picked or banned.
	#[must_use]
	pub fn available1(&self, pool: &HashSet<ChampionId>) -> Vec<ChampionId> {
		let unavailable = self.unavailable();
		pool.iter().copied().filter(|champion| !unavailable.contains(champion)).collect()
	}

	/// Every unordered pair of available champions from `pool`, each pair
	/// returned in ascending order of champion ID.
	#[must_use]
	pub fn available2(&self, pool: &HashSet<ChampionId>) -> Vec<(ChampionId, ChampionId)> {
		let mut available = self.available1(pool);
		available.sort_unstable();

		let mut pairs = Vec::new();
		for (i, &high) in available.iter().enumerate() {
			for &low in &available[..i] {
				pairs.push((low, high));
			}
		}
		pairs
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn champ(id: u32) -> ChampionId {
		ChampionId::new(id).unwrap()
	}

	fn pool(ids: &[u32]) -> HashSet<ChampionId> {
		ids.iter().map(|&id| champ(id)).collect()
	}

	#[test]
	fn normalize_sorts_each_group_independently() {
		let mut state = DraftState::new();
		state.set_action(0, champ(2));
		state.set_action(1, champ(1));
		state.set_action(6, champ(9));

		let normalized = state.normalize();
		assert_eq!(normalized.action(0), Some(champ(1)));
		assert_eq!(normalized.action(1), Some(champ(2)));
		assert_eq!(normalized.action(6), Some(champ(9)));
	}

	#[test]
	fn merge_restores_caller_history_onto_normalized_result() {
		let mut original = DraftState::new();
		original.set_action(0, champ(2));
		original.set_action(1, champ(1));

		let mut result = DraftState::new();
		result.set_action(0, champ(1));
		result.set_action(1, champ(2));
		result.set_action(2, champ(5));

		let merged = original.merge(&result);
		// original's two filled slots win; slot 2 comes from the cached result.
		assert_eq!(merged.action(0), Some(champ(2)));
		assert_eq!(merged.action(1), Some(champ(1)));
		assert_eq!(merged.action(2), Some(champ(5)));
	}

	#[test]
	fn blue_red_and_bans_partition_correctly() {
		let mut state = DraftState::new();
		state.set_action(0, champ(1)); // ban
		state.set_action(6, champ(2)); // blue pick
		state.set_action(7, champ(3)); // red pick

		assert_eq!(state.bans(), pool(&[1]));
		assert_eq!(state.blue(), pool(&[2]));
		assert_eq!(state.red(), pool(&[3]));
		assert_eq!(state.unavailable(), pool(&[1, 2, 3]));
	}

	#[test]
	fn available1_excludes_unavailable_champions() {
		let mut state = DraftState::new();
		state.set_action(0, champ(1));

		let available = state.available1(&pool(&[1, 2, 3]));
		let mut ids: Vec<u32> = available.iter().map(|c| c.get()).collect();
		ids.sort_unstable();
		assert_eq!(ids, vec![2, 3]);
	}

	#[test]
	fn available2_returns_ascending_pairs_without_repetition() {
		let state = DraftState::new();
		let pairs = state.available2(&pool(&[1, 2, 3]));
		assert_eq!(pairs.len(), 3);
		for (low, high) in &pairs {
			assert!(low < high);
		}
	}
}
