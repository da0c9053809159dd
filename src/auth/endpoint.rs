//! Credential endpoint wire contract: `POST auth_url` with HTTP Basic credentials and no body,
//! answered by a JSON object carrying a string `access_token`.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, Secret},
	error::ConfigError,
	http::{AUTHORIZATION, HttpRequest, RequestOptions, Response, Verb},
};

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
}

/// Formats `user_id`/`password` as an HTTP Basic `Authorization` value.
pub fn basic_authorization(user_id: &str, password: &Secret) -> String {
	let raw = format!("{user_id}:{}", password.expose());

	format!("Basic {}", STANDARD.encode(raw))
}

/// Builds the credential exchange request for `credentials`.
///
/// Fails only when `auth_url` does not parse.
pub fn token_request(credentials: &Credentials) -> Result<HttpRequest, ConfigError> {
	let url = credentials.endpoint()?;
	let options = RequestOptions::default()
		.with_header(AUTHORIZATION, basic_authorization(&credentials.user_id, &credentials.password));

	Ok(HttpRequest::new(Verb::Post, url).with_options(options))
}

/// Extracts the bearer token from a credential endpoint response.
pub fn parse_token_response(response: &Response) -> Result<AccessToken> {
	let parsed = response.json::<TokenResponse>().map_err(|source| Error::TokenResponse { source })?;

	Ok(AccessToken::new(parsed.access_token))
}
