//! Token slot owned by each requester.
//!
//! The slot is a tagged value rather than an optional string: [`TokenState::Absent`] means no
//! authentication has been attempted yet and triggers a lazy fetch, while
//! [`TokenState::NotAuthenticated`] records that the last attempt failed. The two must never be
//! collapsed, because only `Absent` authenticates ahead of a dispatch.

// self
use crate::{_prelude::*, auth::Secret};

/// Bearer token believed valid until a server rejects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Raw bearer value.
	pub secret: Secret,
	/// Instant the credential endpoint issued the token. Informational only; validity is never
	/// predicted from it.
	pub issued_at: OffsetDateTime,
}
impl AccessToken {
	/// Wraps a freshly issued bearer value.
	pub fn new(secret: impl Into<String>) -> Self {
		Self { secret: Secret::new(secret), issued_at: OffsetDateTime::now_utc() }
	}
}

/// Current credential state of a requester.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TokenState {
	/// No authentication attempted yet.
	#[default]
	Absent,
	/// The most recent authentication attempt failed.
	NotAuthenticated,
	/// A token is held and attached to authenticated calls.
	Valid(AccessToken),
}
impl TokenState {
	/// Returns the held token, if any.
	pub fn token(&self) -> Option<&AccessToken> {
		match self {
			Self::Valid(token) => Some(token),
			Self::Absent | Self::NotAuthenticated => None,
		}
	}

	/// Secret-free summary suitable for logs and assertions.
	pub fn status(&self) -> TokenStatus {
		match self {
			Self::Absent => TokenStatus::Absent,
			Self::NotAuthenticated => TokenStatus::NotAuthenticated,
			Self::Valid(token) => TokenStatus::Valid { issued_at: token.issued_at },
		}
	}
}

/// Redacted view of [`TokenState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// No authentication attempted yet.
	Absent,
	/// The most recent authentication attempt failed.
	NotAuthenticated,
	/// A token is held.
	Valid {
		/// Instant the token was issued.
		issued_at: OffsetDateTime,
	},
}

/// Shared, lock-protected [`TokenState`].
///
/// Locks are held only for the duration of a read or a swap, never across an `.await`, so
/// concurrent calls always observe the freshest token when they build their headers.
#[derive(Clone, Debug, Default)]
pub struct TokenSlot(Arc<RwLock<TokenState>>);
impl TokenSlot {
	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> TokenState {
		self.0.read().clone()
	}

	/// Stores a freshly issued token.
	pub fn store(&self, token: AccessToken) {
		*self.0.write() = TokenState::Valid(token);
	}

	/// Marks the slot with the failed-authentication sentinel.
	pub fn mark_not_authenticated(&self) {
		*self.0.write() = TokenState::NotAuthenticated;
	}
}
