use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A pending reconciliation: the magnitude that will be added back to
/// `quantity` once `reverse_after` elapses, tagged with a generation so a
/// superseding reconciliation can tell whether it raced the timer.
#[derive(Debug, Clone, Copy)]
struct Pending {
	generation: u64,
	magnitude: i64,
}

#[derive(Debug)]
struct Inner {
	capacity: i64,
	quantity: i64,
	pending: Option<Pending>,
	next_generation: u64,
}

/// A single rolling-window quota counter.
///
/// `Window` is a thin handle around a shared, mutex-guarded counter.
/// Cloning it is cheap and shares state — this is what lets the same window
/// be held by the acquisition path, a scheduled refund, and a scheduled
/// reconciliation reversal all at once.
#[derive(Debug, Clone)]
pub struct Window(Arc<Mutex<Inner>>);

impl Window {
	/// Creates a window at full capacity, matching the contract that a
	/// window created on first sight of a capacity header starts full.
	#[must_use]
	pub fn new(capacity: i64) -> Self {
		Self(Arc::new(Mutex::new(Inner {
			capacity,
			quantity: capacity,
			pending: None,
			next_generation: 0,
		})))
	}

	#[must_use]
	pub fn capacity(&self) -> i64 {
		self.lock().capacity
	}

	#[must_use]
	pub fn quantity(&self) -> i64 {
		self.lock().quantity
	}

	/// Attempts to reserve one unit, returning success without blocking.
	pub fn acquire(&self) -> bool {
		let mut inner = self.lock();
		if inner.quantity <= 0 {
			return false;
		}
		inner.quantity -= 1;
		true
	}

	/// Returns a previously acquired unit immediately. Clamps at capacity.
	pub fn cancel(&self) {
		let mut inner = self.lock();
		inner.quantity = (inner.quantity + 1).min(inner.capacity);
	}

	/// Schedules a delayed increment of one unit, representing a charged
	/// unit naturally aging out of the rolling window. Clamps at capacity
	/// when applied.
	pub fn refund_after(&self, duration: Duration) {
		let window = self.clone();
		tokio::spawn(async move {
			tokio::time::sleep(duration).await;
			let mut inner = window.lock();
			inner.quantity = (inner.quantity + 1).min(inner.capacity);
		});
	}

	/// Replaces capacity. Growing adds the delta to quantity; shrinking
	/// clips quantity to the new capacity.
	pub fn set_capacity(&self, capacity: i64) {
		let mut inner = self.lock();
		let old = inner.capacity;
		inner.capacity = capacity;
		if capacity > old {
			inner.quantity += capacity - old;
		}
		if inner.quantity > capacity {
			inner.quantity = capacity;
		}
	}

	/// Reconciles local accounting against the server's reported usage for
	/// this window.
	///
	/// This only ever lowers `quantity`: we never raise it on the server's
	/// say-so, since that would risk over-issuing permits. If the server's
	/// implied quantity is lower than ours, the difference is deducted now
	/// and restored after `reverse_after`, naturally catching up once the
	/// server's own window rolls. A reconciliation still pending when a new
	/// one arrives is superseded: if it had not yet fired, its effect is
	/// reversed immediately so corrections never stack; if it had already
	/// fired, there is nothing left to reverse.
	pub fn match_server_counts(&self, observed: i64, reverse_after: Duration) {
		let mut inner = self.lock();

		if let Some(pending) = inner.pending.take() {
			inner.quantity = (inner.quantity + pending.magnitude).min(inner.capacity);
		}

		let implied = inner.capacity - observed;
		if implied >= inner.quantity {
			return;
		}

		let offset = inner.quantity - implied;
		inner.quantity -= offset;

		let generation = inner.next_generation;
		inner.next_generation += 1;
		inner.pending = Some(Pending { generation, magnitude: offset });
		drop(inner);

		let window = self.clone();
		tokio::spawn(async move {
			tokio::time::sleep(reverse_after).await;
			let mut inner = window.lock();
			if let Some(pending) = inner.pending {
				if pending.generation == generation {
					inner.quantity = (inner.quantity + pending.magnitude).min(inner.capacity);
					inner.pending = None;
				}
			}
		});
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.0.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::time::{sleep, Duration as TokioDuration};

	#[test]
	fn acquire_then_cancel_is_a_no_op() {
		let window = Window::new(5);
		assert!(window.acquire());
		assert_eq!(window.quantity(), 4);
		window.cancel();
		assert_eq!(window.quantity(), 5);
	}

	#[test]
	fn acquire_fails_when_exhausted() {
		let window = Window::new(1);
		assert!(window.acquire());
		assert!(!window.acquire());
		assert_eq!(window.quantity(), 0);
	}

	#[test]
	fn cancel_clamps_at_capacity() {
		let window = Window::new(3);
		window.cancel();
		assert_eq!(window.quantity(), 3);
	}

	#[test]
	fn set_capacity_grows_and_shrinks_quantity() {
		let window = Window::new(10);
		assert!(window.acquire());
		assert_eq!(window.quantity(), 9);

		window.set_capacity(20);
		assert_eq!(window.quantity(), 19);
		assert_eq!(window.capacity(), 20);

		window.set_capacity(5);
		assert_eq!(window.quantity(), 5);
		assert_eq!(window.capacity(), 5);
	}

	#[tokio::test]
	async fn refund_after_restores_a_unit_later() {
		let window = Window::new(2);
		assert!(window.acquire());
		assert!(window.acquire());
		assert_eq!(window.quantity(), 0);

		window.refund_after(TokioDuration::from_millis(20));
		assert_eq!(window.quantity(), 0);

		sleep(TokioDuration::from_millis(80)).await;
		assert_eq!(window.quantity(), 1);
	}

	#[tokio::test]
	async fn match_server_counts_deducts_then_restores() {
		// capacity 10, quantity 10 (nothing acquired), server reports 4 in use
		// => implied quantity 6 < 10, so we deduct the offset of 4 now.
		let window = Window::new(10);
		window.match_server_counts(4, TokioDuration::from_millis(30));
		assert_eq!(window.quantity(), 6);

		sleep(TokioDuration::from_millis(90)).await;
		assert_eq!(window.quantity(), 10);
	}

	#[tokio::test]
	async fn match_server_counts_never_raises_quantity() {
		// capacity 10, quantity 2 (8 acquired), server reports 0 in use
		// => implied quantity 10 > 2, so nothing is deducted and nothing changes.
		let window = Window::new(10);
		for _ in 0..8 {
			assert!(window.acquire());
		}
		assert_eq!(window.quantity(), 2);

		window.match_server_counts(0, TokioDuration::from_millis(20));
		assert_eq!(window.quantity(), 2);

		sleep(TokioDuration::from_millis(60)).await;
		assert_eq!(window.quantity(), 2);
	}

	#[tokio::test]
	async fn superseding_reconciliation_reverses_before_reapplying() {
		let window = Window::new(10);

		// First reconciliation: implied = 10 - 4 = 6 < 10, deduct 4.
		window.match_server_counts(4, TokioDuration::from_millis(200));
		assert_eq!(window.quantity(), 6);

		// Second reconciliation arrives before the first fires: the first is
		// reversed (back to 10), then re-evaluated: implied = 10 - 7 = 3 < 10,
		// deduct 7.
		window.match_server_counts(7, TokioDuration::from_millis(200));
		assert_eq!(window.quantity(), 3);

		// Only one reversal (of 7) should ever fire; if the superseded timer
		// incorrectly also fired, quantity would overshoot capacity.
		sleep(TokioDuration::from_millis(260)).await;
		assert_eq!(window.quantity(), 10);
	}

	#[tokio::test]
	async fn reconciliation_after_firing_has_nothing_to_reverse() {
		let window = Window::new(10);
		window.match_server_counts(4, TokioDuration::from_millis(20));
		assert_eq!(window.quantity(), 6);

		sleep(TokioDuration::from_millis(80)).await;
		assert_eq!(window.quantity(), 10);

		window.match_server_counts(0, TokioDuration::from_millis(20));
		assert_eq!(window.quantity(), 10);
	}
}
