//! Authenticated requester: bearer attachment, lazy authentication, and bounded
//! re-authentication on rejected credentials.
//!
//! Every verb runs the same loop. An authenticated call authenticates first when no
//! authentication has been attempted yet, attaches the freshest token as
//! `Authorization: Bearer <token>`, and dispatches. A 401 (or 403, per [`RetryPolicy`]) on an
//! authenticated call re-authenticates and re-dispatches the same request until the call's
//! authentication budget is spent, at which point it ends with
//! [`Error::RetryBudgetExhausted`]. Any other failure is reported to the [`ErrorSink`] once and
//! returned unchanged. Unauthenticated calls never authenticate and never carry a bearer.
//!
//! Concurrent calls on one requester share the token slot but not their budgets. Two calls
//! that find the slot empty at the same time both hit the credential endpoint; the later
//! token wins and each call reads the slot again right before building its headers.

mod metrics;
mod policy;

pub use metrics::RequesterMetrics;
pub use policy::RetryPolicy;

// self
use crate::{
	_prelude::*,
	auth::{
		AccessToken, Credentials, TokenSlot, TokenState, TokenStatus,
		credentials::parse_url,
		endpoint,
	},
	error::REJECTED_STATUS,
	http::{AUTHORIZATION, HttpRequest, HttpTransport, RequestOptions, Response, Verb},
	obs::{self, CallOutcome, CallSpan, Operation},
	sink::{ErrorSink, TracingErrorSink},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Requester specialized for the crate's default reqwest transport.
pub type ReqwestRequester = Requester<ReqwestTransport>;

/// Issues HTTP calls on behalf of one account, authenticating as needed.
///
/// Cloning is cheap and every clone shares the transport, token slot, and metrics. Separate
/// [`Requester::with_transport`] calls produce independent sessions.
pub struct Requester<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for verb calls and credential exchanges alike.
	pub transport: Arc<T>,
	/// Retry policy applied to rejected credentials.
	pub policy: RetryPolicy,
	/// Counters for authentications, dispatches, and retries.
	pub metrics: Arc<RequesterMetrics>,
	credentials: Arc<Credentials>,
	sink: Arc<dyn ErrorSink>,
	tokens: TokenSlot,
}
impl<T> Requester<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a requester that reuses the caller-provided transport.
	pub fn with_transport(credentials: Credentials, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			policy: RetryPolicy::default(),
			metrics: Default::default(),
			credentials: Arc::new(credentials),
			sink: Arc::new(TracingErrorSink),
			tokens: TokenSlot::default(),
		}
	}

	/// Replaces the retry policy.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Replaces the error sink (defaults to [`TracingErrorSink`]).
	pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
		self.sink = sink;

		self
	}

	/// Credentials this requester authenticates with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Secret-free view of the token slot.
	pub fn token_status(&self) -> TokenStatus {
		self.tokens.snapshot().status()
	}

	/// `GET url`. The `authenticated` flag has no default for this verb.
	pub async fn get(
		&self,
		url: &str,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		self.request(Verb::Get, url, None, options, authenticated).await
	}

	/// `POST url` with an optional JSON payload. Pass `authenticated = false` for the usual
	/// unauthenticated call.
	pub async fn post(
		&self,
		url: &str,
		payload: Option<Value>,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		self.request(Verb::Post, url, payload, options, authenticated).await
	}

	/// `PUT url` with an optional JSON payload. Pass `authenticated = false` for the usual
	/// unauthenticated call.
	pub async fn put(
		&self,
		url: &str,
		payload: Option<Value>,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		self.request(Verb::Put, url, payload, options, authenticated).await
	}

	/// `DELETE url`. Pass `authenticated = false` for the usual unauthenticated call.
	pub async fn delete(
		&self,
		url: &str,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		self.request(Verb::Delete, url, None, options, authenticated).await
	}

	/// Runs one logical call. Payloads are dropped for verbs that do not carry a body, and the
	/// bearer header is merged into `options` without touching other headers.
	pub async fn request(
		&self,
		verb: Verb,
		url: &str,
		payload: Option<Value>,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		let operation = Operation::from(verb);
		let span = CallSpan::new(operation, "request");

		obs::record_call_outcome(operation, CallOutcome::Attempt);

		let result = span
			.instrument(
				self.dispatch_with_budget(operation, verb, url, payload, options, authenticated),
			)
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(operation, CallOutcome::Success),
			Err(err) if err.is_budget_exhausted() =>
				obs::record_call_outcome(operation, CallOutcome::Exhausted),
			Err(_) => obs::record_call_outcome(operation, CallOutcome::Failure),
		}

		result
	}

	/// Exchanges the stored credentials for a fresh token and stores it.
	///
	/// The credential endpoint is parsed here, so an unparsable `auth_url` surfaces as
	/// [`Error::Config`] through the same failure path as a rejected exchange. On failure the token slot is set to [`TokenState::NotAuthenticated`], the failure is
	/// reported to the sink under `authenticate`, and the error is returned. There is no retry
	/// here; callers decide whether to try again.
	pub async fn authenticate(&self) -> Result<OffsetDateTime> {
		const OPERATION: Operation = Operation::Authenticate;

		let span = CallSpan::new(OPERATION, "authenticate");

		obs::record_call_outcome(OPERATION, CallOutcome::Attempt);
		self.metrics.record_authentication();

		let result: Result<AccessToken> = span
			.instrument(async {
				let request = endpoint::token_request(&self.credentials)?;
				let response = self
					.transport
					.call(request)
					.await
					.map_err(|err| Error::AuthenticationFailed {
						status: err.status(),
						reason: err.to_string(),
					})?;

				endpoint::parse_token_response(&response)
			})
			.await;

		match result {
			Ok(token) => {
				let issued_at = token.issued_at;

				self.tokens.store(token);
				obs::record_call_outcome(OPERATION, CallOutcome::Success);

				Ok(issued_at)
			},
			Err(err) => {
				self.tokens.mark_not_authenticated();
				self.metrics.record_authentication_failure();
				self.sink.report(&err, OPERATION.as_str());
				obs::record_call_outcome(OPERATION, CallOutcome::Failure);

				Err(err)
			},
		}
	}

	async fn dispatch_with_budget(
		&self,
		operation: Operation,
		verb: Verb,
		url: &str,
		payload: Option<Value>,
		options: RequestOptions,
		authenticated: bool,
	) -> Result<Response> {
		let url = match parse_url(url) {
			Ok(url) => url,
			Err(err) => return Err(self.fail(operation, err.into())),
		};
		let payload = if verb.carries_body() { payload } else { None };
		let mut authentications = 0_u8;

		if authenticated && self.tokens.snapshot() == TokenState::Absent {
			authentications += 1;

			self.authenticate().await?;
		}

		loop {
			let request = HttpRequest::new(verb, url.clone())
				.with_body(payload.clone())
				.with_options(self.attempt_options(&options, authenticated));

			self.metrics.record_dispatch();

			let err = match self.transport.call(request).await {
				Ok(response) => return Ok(response),
				Err(err) => err,
			};

			if !authenticated || !self.policy.is_rejection(err.status()) {
				return Err(self.fail(operation, err.into()));
			}
			if authentications >= self.policy.max_reauthentications {
				self.metrics.record_exhausted();

				#[cfg(feature = "tracing")]
				tracing::warn!(
					operation = operation.as_str(),
					attempts = authentications,
					"Credentials still rejected; retry budget spent."
				);

				return Err(Error::RetryBudgetExhausted {
					status: REJECTED_STATUS,
					attempts: authentications,
				});
			}

			authentications += 1;
			self.metrics.record_retry();
			obs::record_call_outcome(operation, CallOutcome::Retry);

			#[cfg(feature = "tracing")]
			tracing::debug!(
				operation = operation.as_str(),
				status = ?err.status(),
				attempt = authentications,
				"Credentials rejected; re-authenticating."
			);

			self.authenticate().await?;
		}
	}

	/// Caller options plus the bearer of the token held right now, if any.
	///
	/// Always starts from the caller's headers, so a bearer from an earlier attempt never
	/// outlives the token it came from.
	fn attempt_options(&self, base: &RequestOptions, authenticated: bool) -> RequestOptions {
		let mut options = base.clone();

		if authenticated {
			let state = self.tokens.snapshot();

			if let Some(token) = state.token() {
				options.set_header(AUTHORIZATION, token.secret.bearer());
			}
		}

		options
	}

	fn fail(&self, operation: Operation, err: Error) -> Error {
		self.sink.report(&err, operation.as_str());

		err
	}
}
#[cfg(feature = "reqwest")]
impl Requester<ReqwestTransport> {
	/// Creates a requester for `user_id`/`password` against `auth_url`, backed by a default
	/// reqwest transport.
	///
	/// Nothing is validated here. A bad `auth_url` only fails the first authentication.
	pub fn new(
		user_id: impl Into<String>,
		password: impl Into<String>,
		auth_url: impl Into<String>,
	) -> Self {
		let credentials = Credentials::new(user_id, password, auth_url);

		Self::with_transport(credentials, ReqwestTransport::default())
	}
}
impl<T> Clone for Requester<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			policy: self.policy,
			metrics: self.metrics.clone(),
			credentials: self.credentials.clone(),
			sink: self.sink.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<T> Debug for Requester<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Requester")
			.field("credentials", &self.credentials)
			.field("policy", &self.policy)
			.field("token", &self.token_status())
			.finish()
	}
}
