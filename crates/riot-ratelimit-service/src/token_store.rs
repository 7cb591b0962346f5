use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use prometheus::{Counter, Gauge, Registry};
use riot_ratelimit::{Invocation, Limiter, Reservation, ResponseHeaders};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Prometheus counters exposed by the rate limit service, registered once at
/// startup and cloned freely since `prometheus` metric handles are cheap
/// `Arc`-backed clones.
#[derive(Clone)]
pub struct Metrics {
	acquired_total: Counter,
	done_total: Counter,
	cancelled_total: Counter,
	auto_finalized_total: Counter,
	outstanding: Gauge,
}

impl Metrics {
	/// # Errors
	///
	/// Returns an error if a metric of the same name is already registered.
	pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
		let acquired_total = Counter::new("ratelimit_service_acquired_total", "Total acquire calls that returned a token")?;
		let done_total = Counter::new("ratelimit_service_done_total", "Total acquisitions finalized via /done")?;
		let cancelled_total = Counter::new("ratelimit_service_cancelled_total", "Total acquisitions finalized via /cancel")?;
		let auto_finalized_total = Counter::new("ratelimit_service_auto_finalized_total", "Total acquisitions finalized by idle timeout")?;
		let outstanding = Gauge::new("ratelimit_service_outstanding_tokens", "Tokens currently awaiting done or cancel")?;

		registry.register(Box::new(acquired_total.clone()))?;
		registry.register(Box::new(done_total.clone()))?;
		registry.register(Box::new(cancelled_total.clone()))?;
		registry.register(Box::new(auto_finalized_total.clone()))?;
		registry.register(Box::new(outstanding.clone()))?;

		Ok(Self {
			acquired_total,
			done_total,
			cancelled_total,
			auto_finalized_total,
			outstanding,
		})
	}
}

struct TokenEntry {
	invocation: Invocation,
	reservation: Reservation,
	cancel_idle: oneshot::Sender<()>,
}

/// Tracks outstanding acquisition tokens and auto-finalizes any that sit
/// unresolved past the configured idle timeout, mirroring the original
/// service's `time.AfterFunc`-based timeout.
pub struct TokenStore {
	limiter: Limiter,
	idle_timeout: Duration,
	tokens: Mutex<HashMap<String, TokenEntry>>,
	metrics: Metrics,
}

impl TokenStore {
	#[must_use]
	pub fn new(limiter: Limiter, idle_timeout: Duration, metrics: Metrics) -> Self {
		Self {
			limiter,
			idle_timeout,
			tokens: Mutex::new(HashMap::new()),
			metrics,
		}
	}

	/// Acquires quota for `invocation` and mints a fresh token for it,
	/// spawning the idle-timeout task that auto-finalizes the token as done
	/// if neither `done` nor `cancel` is called in time.
	pub async fn acquire(self: &std::sync::Arc<Self>, invocation: Invocation) -> Result<String, riot_ratelimit::RateLimitError> {
		let reservation = self.limiter.acquire(&invocation).await?;

		let (cancel_idle, idle_rx) = oneshot::channel();
		let token = loop {
			let candidate = Uuid::new_v4().to_string();
			let mut tokens = self.tokens.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
			if !tokens.contains_key(&candidate) {
				tokens.insert(
					candidate.clone(),
					TokenEntry {
						invocation: invocation.clone(),
						reservation,
						cancel_idle,
					},
				);
				break candidate;
			}
		};

		self.metrics.acquired_total.inc();
		self.metrics.outstanding.inc();

		let store = Self::clone_handle(self);
		let timeout_token = token.clone();
		let idle_timeout = self.idle_timeout;
		tokio::spawn(async move {
			tokio::select! {
				() = tokio::time::sleep(idle_timeout) => {
					store.finalize_idle(&timeout_token);
				}
				_ = idle_rx => {}
			}
		});

		Ok(token)
	}

	/// Finalizes `token` as successfully completed, folding `headers` into
	/// the owning invocation's windows before releasing its reserved quota.
	///
	/// # Errors
	///
	/// Returns `Ok(false)` if no acquisition is outstanding for `token`.
	/// Returns `Err` if `headers` contains a malformed rate limit header;
	/// the reservation's quota is still released in this case.
	pub fn done(&self, token: &str, headers: &ResponseHeaders) -> Result<bool, riot_ratelimit::RateLimitError> {
		let Some(entry) = self.take(token) else { return Ok(false) };
		let observed = self.limiter.observe(&entry.invocation, headers);
		entry.reservation.done();
		self.metrics.done_total.inc();
		self.metrics.outstanding.dec();
		observed?;
		Ok(true)
	}

	/// Finalizes `token` as cancelled, releasing its reserved quota
	/// immediately without consulting response headers.
	pub fn cancel(&self, token: &str) -> bool {
		let Some(entry) = self.take(token) else { return false };
		entry.reservation.cancel();
		self.metrics.cancelled_total.inc();
		self.metrics.outstanding.dec();
		true
	}

	fn finalize_idle(&self, token: &str) {
		if let Some(entry) = self.take(token) {
			entry.reservation.done();
			self.metrics.auto_finalized_total.inc();
			self.metrics.outstanding.dec();
		}
	}

	fn take(&self, token: &str) -> Option<TokenEntry> {
		let mut tokens = self.tokens.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		let entry = tokens.remove(token)?;
		// The sender being dropped here (rather than explicitly signalled)
		// is enough to end the idle-timeout task's `select!`, since a
		// dropped oneshot sender immediately resolves the receiver.
		drop(entry.cancel_idle);
		Some(entry)
	}

	fn clone_handle(self: &std::sync::Arc<Self>) -> std::sync::Arc<Self> {
		std::sync::Arc::clone(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::time::Duration as StdDuration;

	fn store() -> Arc<TokenStore> {
		let registry = Registry::new();
		let metrics = Metrics::new(&registry).unwrap();
		Arc::new(TokenStore::new(Limiter::new(), StdDuration::from_millis(50), metrics))
	}

	#[tokio::test]
	async fn acquire_then_done_releases_and_removes_token() {
		let store = store();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		let token = store.acquire(invocation).await.unwrap();
		assert!(store.done(&token, &ResponseHeaders::default()).unwrap());
		// Resolving twice must fail: the token is gone.
		assert!(!store.done(&token, &ResponseHeaders::default()).unwrap());
	}

	#[tokio::test]
	async fn done_with_malformed_headers_still_releases_quota_but_errors() {
		let store = store();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		let token = store.acquire(invocation).await.unwrap();
		let headers = ResponseHeaders { app_rate_limit: Some("not-a-pair".to_string()), ..Default::default() };
		assert!(store.done(&token, &headers).is_err());

		// The token was still taken and finalized; resolving it again fails.
		assert!(!store.done(&token, &ResponseHeaders::default()).unwrap());
	}

	#[tokio::test]
	async fn cancel_removes_token() {
		let store = store();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		let token = store.acquire(invocation).await.unwrap();
		assert!(store.cancel(&token));
		assert!(!store.cancel(&token));
	}

	#[tokio::test]
	async fn unresolved_token_auto_finalizes_after_idle_timeout() {
		let store = store();
		let invocation = Invocation::new("key", "NA1", "/m", "", false);

		let token = store.acquire(invocation).await.unwrap();
		tokio::time::sleep(StdDuration::from_millis(150)).await;

		// The idle task has already finalized and removed the token.
		assert!(!store.cancel(&token));
	}
}
