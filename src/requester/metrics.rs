// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters shared by every clone of a requester.
#[derive(Debug, Default)]
pub struct RequesterMetrics {
	authentications: AtomicU64,
	authentication_failures: AtomicU64,
	dispatches: AtomicU64,
	retries: AtomicU64,
	exhausted: AtomicU64,
}
impl RequesterMetrics {
	/// Returns the number of credential exchanges attempted.
	pub fn authentications(&self) -> u64 {
		self.authentications.load(Ordering::Relaxed)
	}

	/// Returns the number of credential exchanges that failed.
	pub fn authentication_failures(&self) -> u64 {
		self.authentication_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of calls handed to the transport (credential exchanges excluded).
	pub fn dispatches(&self) -> u64 {
		self.dispatches.load(Ordering::Relaxed)
	}

	/// Returns the number of re-authentications triggered by rejected credentials.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that ended with a spent retry budget.
	pub fn exhausted(&self) -> u64 {
		self.exhausted.load(Ordering::Relaxed)
	}

	pub(crate) fn record_authentication(&self) {
		self.authentications.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_authentication_failure(&self) {
		self.authentication_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_dispatch(&self) {
		self.dispatches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_exhausted(&self) {
		self.exhausted.fetch_add(1, Ordering::Relaxed);
	}
}
