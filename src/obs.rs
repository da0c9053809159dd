//! Optional observability helpers for requester calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `token_requester.call` with the `operation`
//!   (verb or `authenticate`) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `token_requester_call_total` counter for every
//!   attempt/success/failure/retry/exhaustion, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, http::Verb};

/// Operations observed by the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `GET` verb.
	Get,
	/// `POST` verb.
	Post,
	/// `PUT` verb.
	Put,
	/// `DELETE` verb.
	Delete,
	/// Credential exchange.
	Authenticate,
}
impl Operation {
	/// Returns a stable label suitable for span fields, metric labels, and error sinks.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Get => "get",
			Operation::Post => "post",
			Operation::Put => "put",
			Operation::Delete => "delete",
			Operation::Authenticate => "authenticate",
		}
	}
}
impl From<Verb> for Operation {
	fn from(verb: Verb) -> Self {
		match verb {
			Verb::Get => Operation::Get,
			Verb::Post => Operation::Post,
			Verb::Put => Operation::Put,
			Verb::Delete => Operation::Delete,
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each logical call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a requester operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Rejected credentials triggered a re-authentication.
	Retry,
	/// Retry budget spent; the call ended with the synthetic rejection.
	Exhausted,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Retry => "retry",
			CallOutcome::Exhausted => "exhausted",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
