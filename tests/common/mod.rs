//! Shared fixtures for integration tests: a scripted transport for exact call accounting and
//! reqwest-backed builders for `httpmock` runs.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use token_requester::{
	auth::Credentials,
	error::TransportError,
	http::{HttpRequest, HttpTransport, ReqwestTransport, Response, TransportFuture},
	requester::{Requester, RetryPolicy},
	reqwest::Client as ReqwestClient,
	sink::RecordingErrorSink,
};

pub const AUTH_URL: &str = "https://auth.example.com/token";
pub const API_URL: &str = "https://api.example.com/items";

/// Canned outcome served by [`ScriptedTransport`].
#[derive(Clone, Debug)]
pub enum Reply {
	/// 2xx response with a JSON body.
	Ok(u16, Value),
	/// Non-2xx response with an empty body.
	Status(u16),
	/// Connection-level failure without a status.
	Network,
	/// Credential endpoint success issuing `token-<n>`, `n` counting exchanges from 1.
	FreshToken,
}

/// In-process transport that replays scripted replies and records every request.
#[derive(Debug)]
pub struct ScriptedTransport {
	auth_script: Mutex<VecDeque<Reply>>,
	auth_fallback: Reply,
	call_script: Mutex<VecDeque<Reply>>,
	call_fallback: Reply,
	auth_requests: Mutex<Vec<HttpRequest>>,
	call_requests: Mutex<Vec<HttpRequest>>,
	yield_on_auth: AtomicBool,
}
impl ScriptedTransport {
	/// Credential endpoint always issues fresh tokens; calls always answer `call_fallback`.
	pub fn new(call_fallback: Reply) -> Self {
		Self {
			auth_script: Default::default(),
			auth_fallback: Reply::FreshToken,
			call_script: Default::default(),
			call_fallback,
			auth_requests: Default::default(),
			call_requests: Default::default(),
			yield_on_auth: AtomicBool::new(false),
		}
	}

	/// Queues replies served to verb calls before falling back.
	pub fn with_calls(self, replies: impl IntoIterator<Item = Reply>) -> Self {
		self.call_script.lock().extend(replies);

		self
	}

	/// Queues replies served to credential exchanges before falling back.
	pub fn with_auth(self, replies: impl IntoIterator<Item = Reply>) -> Self {
		self.auth_script.lock().extend(replies);

		self
	}

	/// Suspends every credential exchange once so concurrent calls interleave.
	pub fn yielding_auth(self) -> Self {
		self.yield_on_auth.store(true, Ordering::Relaxed);

		self
	}

	pub fn auth_requests(&self) -> Vec<HttpRequest> {
		self.auth_requests.lock().clone()
	}

	pub fn call_requests(&self) -> Vec<HttpRequest> {
		self.call_requests.lock().clone()
	}

	pub fn authorization_headers(&self) -> Vec<Option<String>> {
		self.call_requests()
			.iter()
			.map(|request| request.options.header("authorization").map(str::to_owned))
			.collect()
	}

	fn serve(reply: Reply, issued: usize) -> Result<Response, TransportError> {
		match reply {
			Reply::Ok(status, body) => Ok(Response::new(body, status)),
			Reply::Status(status) => Err(TransportError::status_only(status, "Scripted failure")),
			Reply::Network => Err(TransportError::network(std::io::Error::other("connection reset"))),
			Reply::FreshToken =>
				Ok(Response::new(json!({ "access_token": format!("token-{issued}") }), 200)),
		}
	}
}
impl HttpTransport for ScriptedTransport {
	fn call(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if request.url.as_str() == AUTH_URL {
				if self.yield_on_auth.load(Ordering::Relaxed) {
					tokio::task::yield_now().await;
				}

				let issued = {
					let mut requests = self.auth_requests.lock();

					requests.push(request);

					requests.len()
				};
				let reply =
					self.auth_script.lock().pop_front().unwrap_or_else(|| self.auth_fallback.clone());

				Self::serve(reply, issued)
			} else {
				self.call_requests.lock().push(request);

				let reply =
					self.call_script.lock().pop_front().unwrap_or_else(|| self.call_fallback.clone());

				Self::serve(reply, 0)
			}
		})
	}
}

pub fn credentials() -> Credentials {
	Credentials::new("svc-user", "svc-password", AUTH_URL)
}

/// Builds a requester over `transport` with a recording sink and the given policy.
pub fn scripted_requester(
	transport: &Arc<ScriptedTransport>,
	policy: RetryPolicy,
) -> (Requester<ScriptedTransport>, Arc<RecordingErrorSink>) {
	let sink = Arc::new(RecordingErrorSink::default());
	let requester = Requester::with_transport(credentials(), transport.clone())
		.with_retry_policy(policy)
		.with_error_sink(sink.clone());

	(requester, sink)
}

/// Builds a reqwest transport that accepts the self-signed certificates produced by `httpmock`.
/// Transport-level retries are disabled so call counts stay exact.
pub fn test_reqwest_transport() -> ReqwestTransport {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestTransport::with_client(client).with_network_retries(0)
}

/// Constructs a reqwest-backed requester against `auth_url` with a recording sink.
pub fn build_reqwest_test_requester(
	auth_url: &str,
	policy: RetryPolicy,
) -> (Requester<ReqwestTransport>, Arc<RecordingErrorSink>) {
	let credentials = Credentials::new("svc", "pw", auth_url);
	let sink = Arc::new(RecordingErrorSink::default());
	let requester = Requester::with_transport(credentials, test_reqwest_transport())
		.with_retry_policy(policy)
		.with_error_sink(sink.clone());

	(requester, sink)
}
