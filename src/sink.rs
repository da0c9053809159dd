//! Error sinks receiving every failure the requester surfaces, tagged with the operation name.
//!
//! Sinks are fire-and-forget: the requester never inspects what they do and propagates the
//! failure to its caller regardless.

// self
use crate::_prelude::*;

/// Receives failures for observability.
pub trait ErrorSink
where
	Self: Send + Sync,
{
	/// Reports `error` raised by `operation` (`get`, `post`, `put`, `delete`, `authenticate`).
	fn report(&self, error: &Error, operation: &'static str);
}
impl<F> ErrorSink for F
where
	F: Send + Sync + Fn(&Error, &'static str),
{
	fn report(&self, error: &Error, operation: &'static str) {
		self(error, operation)
	}
}

/// Default sink: logs through `tracing` when the feature is enabled, otherwise discards.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingErrorSink;
impl ErrorSink for TracingErrorSink {
	fn report(&self, error: &Error, operation: &'static str) {
		#[cfg(feature = "tracing")]
		tracing::error!(operation, status = ?error.status(), error = %error, "Requester call failed.");

		#[cfg(not(feature = "tracing"))]
		{
			let _ = (error, operation);
		}
	}
}

/// One failure captured by [`RecordingErrorSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
	/// Operation name passed to the sink.
	pub operation: &'static str,
	/// HTTP status of the failure, if known.
	pub status: Option<u16>,
	/// Rendered error message.
	pub message: String,
}

/// Sink that keeps every report in memory, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingErrorSink(Mutex<Vec<ErrorReport>>);
impl RecordingErrorSink {
	/// Returns every report captured so far.
	pub fn reports(&self) -> Vec<ErrorReport> {
		self.0.lock().clone()
	}
}
impl ErrorSink for RecordingErrorSink {
	fn report(&self, error: &Error, operation: &'static str) {
		self.0.lock().push(ErrorReport {
			operation,
			status: error.status(),
			message: error.to_string(),
		});
	}
}
