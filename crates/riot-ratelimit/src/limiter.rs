use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::RateLimitError;
use crate::headers::{parse_rate_pairs, parse_retry_after, ResponseHeaders};
use crate::invocation::Invocation;
use crate::state::LimiterState;
use crate::window::Window;

/// The invocation limiter: self-tuning quota enforcement in front of a
/// single application's calls into the Riot API.
///
/// Cloning a `Limiter` is cheap and shares the underlying state, mirroring
/// the `Window` handle it is built from.
#[derive(Debug, Clone)]
pub struct Limiter {
	state: Arc<LimiterState>,
}

impl Default for Limiter {
	fn default() -> Self {
		Self::new()
	}
}

impl Limiter {
	#[must_use]
	pub fn new() -> Self {
		Self { state: Arc::new(LimiterState::new()) }
	}

	/// Reserves quota for `invocation`, waiting out any known server-imposed
	/// cooldown first. Returns a `Reservation` that must be resolved with
	/// either `done` or `cancel` once the call it guards completes.
	///
	/// # Errors
	///
	/// Returns `RateLimitError::Cancelled` if quota never becomes available.
	/// In the current implementation this only happens if all windows for
	/// this invocation report zero capacity.
	pub async fn acquire(&self, invocation: &Invocation) -> Result<Reservation, RateLimitError> {
		self.sleep_out_cooldown(&invocation.app()).await;
		self.sleep_out_cooldown(invocation).await;

		loop {
			if let Some(windows) = self.state.try_acquire_all(invocation) {
				return Ok(Reservation { windows, resolved: false });
			}

			// No window has quota right now; back off briefly and retry. A
			// real caller typically races this against its own timeout.
			tokio::time::sleep(Duration::from_millis(25)).await;
		}
	}

	async fn sleep_out_cooldown(&self, invocation: &Invocation) {
		if let Some(until) = self.state.cooldown_until(invocation) {
			let now = Instant::now();
			if until > now {
				tokio::time::sleep(until - now).await;
			}
		}
	}

	/// Folds the rate-limit headers from a completed call back into this
	/// invocation's windows: creates or resizes windows from the advertised
	/// limits, reconciles local accounting against the server's reported
	/// counts, and records any cooldown the server imposed.
	///
	/// # Errors
	///
	/// Returns `RateLimitError::HeaderParse` if any present header is
	/// malformed. State already folded in before the malformed header was
	/// reached is left applied; nothing is rolled back.
	pub fn observe(&self, invocation: &Invocation, headers: &ResponseHeaders) -> Result<(), RateLimitError> {
		if let Some(limit) = headers.app_rate_limit.as_deref() {
			self.state.ensure_windows(&invocation.app(), &parse_rate_pairs(limit)?);
		}
		if let Some(limit) = headers.method_rate_limit.as_deref() {
			self.state.ensure_windows(invocation, &parse_rate_pairs(limit)?);
		}

		self.reconcile(&invocation.app(), headers.app_rate_limit_count.as_deref())?;
		self.reconcile(invocation, headers.method_rate_limit_count.as_deref())?;

		if let Some(retry_after) = headers.retry_after.as_deref() {
			let seconds = parse_retry_after(retry_after)?;
			let until = Instant::now() + Duration::from_secs(seconds.max(0) as u64);

			// A method-scoped cooldown only delays this invocation; any other
			// scope (including an absent or unrecognized type) is treated as
			// an application-wide cooldown, matching the server's own default.
			let sleep_key = if headers.rate_limit_type.as_deref() == Some("method") { invocation.clone() } else { invocation.app() };

			debug!(application_key = %sleep_key.application_key, region = %sleep_key.region, method = %sleep_key.method, seconds, "server imposed cooldown");
			self.state.set_cooldown(sleep_key, until);
		}

		Ok(())
	}

	fn reconcile(&self, invocation: &Invocation, counts: Option<&str>) -> Result<(), RateLimitError> {
		let Some(counts) = counts else { return Ok(()) };
		let pairs = parse_rate_pairs(counts)?;
		let windows = self.state.windows_for(invocation);
		for (interval_seconds, used) in pairs {
			if let Some((_, window)) = windows.iter().find(|(interval, _)| *interval == interval_seconds) {
				window.match_server_counts(used, Duration::from_secs(interval_seconds.max(0) as u64));
			}
		}
		Ok(())
	}
}

/// A quota unit reserved from one or more windows, returned by
/// [`Limiter::acquire`]. Must be resolved exactly once.
///
/// Dropping a `Reservation` without resolving it cancels every unit it
/// holds, so a call path that bails out early (an error before the request
/// is even sent) never leaks quota.
#[derive(Debug)]
pub struct Reservation {
	windows: Vec<(i64, Window)>,
	resolved: bool,
}

impl Reservation {
	/// Marks the guarded call as completed successfully. Each held unit is
	/// scheduled to refund itself after its window's own interval elapses.
	pub fn done(mut self) {
		self.resolved = true;
		for (interval_seconds, window) in self.windows.drain(..) {
			window.refund_after(Duration::from_secs(interval_seconds.max(0) as u64));
		}
	}

	/// Marks the guarded call as never having happened: every held unit is
	/// returned immediately rather than after the window's interval.
	pub fn cancel(mut self) {
		self.resolved = true;
		for (_, window) in self.windows.drain(..) {
			window.cancel();
		}
	}
}

impl Drop for Reservation {
	fn drop(&mut self) {
		if !self.resolved {
			for (_, window) in self.windows.drain(..) {
				window.cancel();
			}
		}
	}
}
