// self
use crate::error::REJECTED_STATUS;

/// HTTP status servers use to refuse access regardless of credentials.
const FORBIDDEN_STATUS: u16 = 403;

/// Controls how rejected credentials are retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Maximum number of authentications one logical call may perform, including the lazy
	/// first one.
	///
	/// The lazy exchange of a call that finds no token is not subject to this bound: without a
	/// token there is nothing to dispatch. A budget of `0` therefore still authenticates once on
	/// a cold call, and the first rejection ends it with `attempts: 1`. On a warm call `0` means
	/// a rejection is never retried.
	pub max_reauthentications: u8,
	/// Treat `403 Forbidden` as a rejected credential (like `401`) instead of a plain failure.
	pub forbidden_is_rejection: bool,
}
impl RetryPolicy {
	/// Authentication budget applied when none is configured.
	pub const DEFAULT_MAX_REAUTHENTICATIONS: u8 = 2;

	/// Overrides the authentication budget.
	pub fn with_max_reauthentications(mut self, max: u8) -> Self {
		self.max_reauthentications = max;

		self
	}

	/// Overrides whether `403` counts as a rejected credential.
	pub fn with_forbidden_is_rejection(mut self, enabled: bool) -> Self {
		self.forbidden_is_rejection = enabled;

		self
	}

	/// Whether a failure with `status` means the credential was rejected.
	pub fn is_rejection(&self, status: Option<u16>) -> bool {
		match status {
			Some(REJECTED_STATUS) => true,
			Some(FORBIDDEN_STATUS) => self.forbidden_is_rejection,
			_ => false,
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_reauthentications: Self::DEFAULT_MAX_REAUTHENTICATIONS,
			forbidden_is_rejection: true,
		}
	}
}
