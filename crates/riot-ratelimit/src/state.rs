use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use crate::invocation::Invocation;
use crate::window::Window;

/// Shared state for the invocation limiter.
///
/// Windows are keyed by `(Invocation, interval_seconds)` so a single
/// call-site can carry several rolling windows at once (Riot typically
/// reports a short and a long window per scope). The cooldown map tracks a
/// server-imposed "do not call before" deadline per invocation, separate
/// from ordinary window exhaustion.
#[derive(Debug, Default)]
pub struct LimiterState {
	windows: RwLock<HashMap<Invocation, HashMap<i64, Window>>>,
	wake: RwLock<HashMap<Invocation, Instant>>,
}

impl LimiterState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cooldown deadline for `invocation`, if one is still in the
	/// future. A deadline in the past is treated as absent rather than being
	/// eagerly evicted here; `Limiter::acquire` is responsible for clearing
	/// stale entries once observed.
	pub fn cooldown_until(&self, invocation: &Invocation) -> Option<Instant> {
		let wake = self.wake.read().unwrap_or_else(PoisonError::into_inner);
		wake.get(invocation).copied().filter(|until| *until > Instant::now())
	}

	/// Records a server-imposed cooldown, keeping the later of any earlier
	/// deadline and `until` so a short `Retry-After` can never shorten an
	/// already-active longer cooldown.
	pub fn set_cooldown(&self, invocation: Invocation, until: Instant) {
		let mut wake = self.wake.write().unwrap_or_else(PoisonError::into_inner);
		wake.entry(invocation).and_modify(|existing| *existing = (*existing).max(until)).or_insert(until);
	}

	/// Ensures a window exists for every `(interval_seconds, capacity)` pair
	/// reported for `invocation`, creating it at full capacity on first sight
	/// and otherwise updating its capacity in place via `Window::set_capacity`.
	pub fn ensure_windows(&self, invocation: &Invocation, limits: &[(i64, i64)]) {
		let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
		let scoped = windows.entry(invocation.clone()).or_default();
		for &(interval_seconds, capacity) in limits {
			scoped.entry(interval_seconds).and_modify(|window| window.set_capacity(capacity)).or_insert_with(|| Window::new(capacity));
		}
	}

	/// Returns every `(interval_seconds, Window)` pair currently tracked for
	/// `invocation`, or an empty vector if none have been observed yet.
	pub fn windows_for(&self, invocation: &Invocation) -> Vec<(i64, Window)> {
		let windows = self.windows.read().unwrap_or_else(PoisonError::into_inner);
		windows.get(invocation).map(|scoped| scoped.iter().map(|(interval, window)| (*interval, window.clone())).collect()).unwrap_or_default()
	}

	/// Attempts to reserve one unit from every window guarding `invocation`
	/// (its own method-level windows, plus its application-level aggregate
	/// unless `no_app_quota` is set). All-or-nothing: if any window is
	/// exhausted, every unit already reserved in this call is rolled back
	/// before returning `None`.
	pub fn try_acquire_all(&self, invocation: &Invocation) -> Option<Vec<(i64, Window)>> {
		let mut scopes = self.windows_for(invocation);
		if !invocation.no_app_quota {
			scopes.extend(self.windows_for(&invocation.app()));
		}

		let mut acquired = Vec::with_capacity(scopes.len());
		for (interval, window) in scopes {
			if window.acquire() {
				acquired.push((interval, window));
			} else {
				for (_, acquired_window) in &acquired {
					acquired_window.cancel();
				}
				return None;
			}
		}
		Some(acquired)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn ensure_windows_creates_then_updates_capacity() {
		let state = LimiterState::new();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		state.ensure_windows(&invocation, &[(1, 20), (120, 100)]);
		let windows = state.windows_for(&invocation);
		assert_eq!(windows.len(), 2);

		state.ensure_windows(&invocation, &[(1, 30)]);
		let windows = state.windows_for(&invocation);
		let short = windows.iter().find(|(interval, _)| *interval == 1).unwrap();
		assert_eq!(short.1.capacity(), 30);
	}

	#[test]
	fn try_acquire_all_is_all_or_nothing_across_app_and_method() {
		let state = LimiterState::new();
		let method = Invocation::new("key", "NA1", "/m", "", false);
		state.ensure_windows(&method, &[(1, 5)]);
		state.ensure_windows(&method.app(), &[(1, 1)]);

		let first = state.try_acquire_all(&method);
		assert!(first.is_some());

		// App-level window is now exhausted; method window still has quota,
		// but the acquisition must fail and roll back the method reservation.
		let second = state.try_acquire_all(&method);
		assert!(second.is_none());

		let method_window = &state.windows_for(&method)[0].1;
		assert_eq!(method_window.quantity(), 4);
	}

	#[test]
	fn no_app_quota_skips_the_aggregate_window() {
		let state = LimiterState::new();
		let invocation = Invocation::new("key", "NA1", "/m", "", true);
		state.ensure_windows(&invocation, &[(1, 1)]);
		state.ensure_windows(&invocation.app(), &[(1, 0)]);

		assert!(state.try_acquire_all(&invocation).is_some());
	}

	#[test]
	fn cooldown_is_absent_once_expired() {
		let state = LimiterState::new();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);
		state.set_cooldown(invocation.clone(), Instant::now() - Duration::from_secs(1));
		assert!(state.cooldown_until(&invocation).is_none());

		state.set_cooldown(invocation.clone(), Instant::now() + Duration::from_secs(60));
		assert!(state.cooldown_until(&invocation).is_some());
	}

	#[test]
	fn set_cooldown_keeps_the_later_deadline() {
		let state = LimiterState::new();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		let long = Instant::now() + Duration::from_secs(60);
		state.set_cooldown(invocation.clone(), long);

		let short = Instant::now() + Duration::from_secs(1);
		state.set_cooldown(invocation.clone(), short);

		assert_eq!(state.cooldown_until(&invocation), Some(long));
	}
}
