//! Account credentials supplied once per requester.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Account and credential endpoint used by a requester. Immutable once built.
///
/// Values are stored as given. `auth_url` is parsed when the requester authenticates, so a
/// requester that only makes unauthenticated calls never depends on it.
#[derive(Clone)]
pub struct Credentials {
	/// Account identifier sent as the Basic auth username.
	pub user_id: String,
	/// Account password sent as the Basic auth password.
	pub password: Secret,
	/// Endpoint that exchanges the Basic credentials for an `access_token`.
	pub auth_url: String,
}
impl Credentials {
	/// Builds credentials without validating any of the values.
	pub fn new(
		user_id: impl Into<String>,
		password: impl Into<String>,
		auth_url: impl Into<String>,
	) -> Self {
		Self { user_id: user_id.into(), password: Secret::new(password), auth_url: auth_url.into() }
	}

	/// Parses the credential endpoint.
	pub fn endpoint(&self) -> Result<Url, ConfigError> {
		parse_url(&self.auth_url)
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("user_id", &self.user_id)
			.field("password", &self.password)
			.field("auth_url", &self.auth_url)
			.finish()
	}
}

/// Parses `raw` into a [`Url`], keeping the input for diagnostics.
pub(crate) fn parse_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { url: raw.to_owned(), source })
}
