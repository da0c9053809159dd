//! Transport primitives for requester calls.
//!
//! The module exposes [`HttpTransport`], the requester's only dependency on an HTTP stack,
//! together with the request/response shapes that cross it. Implementations perform exactly
//! one logical HTTP exchange per [`HttpTransport::call`] and must surface non-2xx responses as
//! [`TransportError::Status`] so the requester can recognise rejected credentials. Any
//! lower-level retrying (connection resets, flaky upstreams) belongs inside the transport;
//! the requester layers its re-authentication retries on top.

// std
use std::time::Duration as StdDuration;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::Method;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError};

/// Header carrying the bearer or Basic credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Boxed future returned by [`HttpTransport::call`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Response, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute a single requester call.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// clone of a [`Requester`](crate::requester::Requester), and the returned future must be
/// `Send` so calls can hop executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request`, resolving to the response on a 2xx status.
	fn call(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// HTTP verbs supported by the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl Verb {
	/// Returns the upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "GET",
			Verb::Post => "POST",
			Verb::Put => "PUT",
			Verb::Delete => "DELETE",
		}
	}

	/// Whether payloads are forwarded for this verb. `GET` and `DELETE` drop them.
	pub const fn carries_body(self) -> bool {
		matches!(self, Verb::Post | Verb::Put)
	}

	/// Whether repeating the call cannot change server state beyond the first attempt.
	pub const fn is_idempotent(self) -> bool {
		!matches!(self, Verb::Post)
	}
}
impl Display for Verb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Verb> for Method {
	fn from(verb: Verb) -> Self {
		match verb {
			Verb::Get => Method::GET,
			Verb::Post => Method::POST,
			Verb::Put => Method::PUT,
			Verb::Delete => Method::DELETE,
		}
	}
}

/// Per-call options: headers, query parameters, and an optional timeout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Headers sent with the call. Names are compared case-insensitively by the helpers.
	pub headers: BTreeMap<String, String>,
	/// Query parameters appended to the URL.
	pub query: Vec<(String, String)>,
	/// Per-call timeout overriding the transport default.
	pub timeout: Option<StdDuration>,
}
impl RequestOptions {
	/// Adds or replaces a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_header(name, value);

		self
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Sets the per-call timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Inserts `name: value`, replacing any header whose name matches case-insensitively while
	/// leaving every other header untouched.
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();

		self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
		self.headers.insert(name, value.into());
	}

	/// Looks up a header case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Fully resolved call handed to an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
	/// HTTP verb.
	pub verb: Verb,
	/// Target URL.
	pub url: Url,
	/// JSON body; transports ignore it for verbs that do not carry one.
	pub body: Option<Value>,
	/// Headers, query, and timeout.
	pub options: RequestOptions,
}
impl HttpRequest {
	/// Creates a body-less request with default options.
	pub fn new(verb: Verb, url: Url) -> Self {
		Self { verb, url, body: None, options: RequestOptions::default() }
	}

	/// Attaches a JSON body.
	pub fn with_body(mut self, body: Option<Value>) -> Self {
		self.body = body;

		self
	}

	/// Replaces the options.
	pub fn with_options(mut self, options: RequestOptions) -> Self {
		self.options = options;

		self
	}
}

/// Successful call outcome, returned to callers exactly as the transport produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
	/// Decoded body: JSON when parseable, a string otherwise, `null` when empty.
	pub data: Value,
	/// HTTP status code.
	pub status: u16,
}
impl Response {
	/// Creates a response from decoded data and status.
	pub fn new(data: Value, status: u16) -> Self {
		Self { data, status }
	}

	/// Decodes [`data`](Self::data) into `T`, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(&self.data)
	}
}

/// Decodes a raw body the way callers expect to see it in [`Response::data`].
pub fn decode_body(bytes: &[u8]) -> Value {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Value::Null;
	}

	serde_json::from_slice(bytes)
		.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// [`HttpTransport`] backed by reqwest, with transport-level retries for network failures.
///
/// Network failures are retried for every verb; 5xx responses only for idempotent verbs.
/// Rejections (401/403) and other 4xx responses are returned immediately so the requester
/// can apply its own policy. Configure any custom [`ReqwestClient`] with the timeouts you
/// want, since the transport only overrides them per call via [`RequestOptions::timeout`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	network_retries: u8,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Transport-level retries applied when none are configured.
	pub const DEFAULT_NETWORK_RETRIES: u8 = 5;

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, network_retries: Self::DEFAULT_NETWORK_RETRIES }
	}

	/// Overrides the number of transport-level retries.
	pub fn with_network_retries(mut self, retries: u8) -> Self {
		self.network_retries = retries;

		self
	}

	/// Returns the configured number of transport-level retries.
	pub fn network_retries(&self) -> u8 {
		self.network_retries
	}

	async fn send_once(&self, request: &HttpRequest) -> Result<Response, TransportError> {
		let mut builder = self.client.request(request.verb.into(), request.url.clone());

		for (name, value) in &request.options.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if !request.options.query.is_empty() {
			builder = builder.query(&request.options.query);
		}
		if let Some(timeout) = request.options.timeout {
			builder = builder.timeout(timeout);
		}
		if let (true, Some(body)) = (request.verb.carries_body(), &request.body) {
			builder = builder.json(body);
		}

		let response = builder.send().await?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(|source| TransportError::Decode {
			status: Some(status.as_u16()),
			source: Box::new(source),
		})?;
		let data = decode_body(&bytes);

		if status.is_success() {
			Ok(Response::new(data, status.as_u16()))
		} else {
			Err(TransportError::Status {
				status: status.as_u16(),
				message: status.canonical_reason().unwrap_or("Unknown status").into(),
				body: data,
			})
		}
	}
}
#[cfg(feature = "reqwest")]
impl Default for ReqwestTransport {
	fn default() -> Self {
		Self::with_client(ReqwestClient::default())
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn call(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let mut retries = 0;

			loop {
				match self.send_once(&request).await {
					Ok(response) => return Ok(response),
					Err(err) if retries < self.network_retries && is_retryable(request.verb, &err) => {
						retries += 1;

						#[cfg(feature = "tracing")]
						tracing::debug!(
							verb = request.verb.as_str(),
							retries,
							status = ?err.status(),
							"Retrying call after a transport failure."
						);
					},
					Err(err) => return Err(err),
				}
			}
		})
	}
}

#[cfg(feature = "reqwest")]
fn is_retryable(verb: Verb, err: &TransportError) -> bool {
	match err {
		TransportError::Network { source } => source
			.downcast_ref::<ReqwestError>()
			.is_none_or(|inner| !inner.is_builder() && !inner.is_redirect()),
		TransportError::Status { status, .. } => *status >= 500 && verb.is_idempotent(),
		TransportError::Decode { .. } => false,
	}
}
