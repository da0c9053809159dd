//! Fetches a protected resource, authenticating with Basic credentials on first use.
//!
//! ```sh
//! REQUESTER_USER=svc REQUESTER_PASSWORD=secret \
//! REQUESTER_AUTH_URL=https://auth.example.com/token \
//! REQUESTER_TARGET=https://api.example.com/items \
//! cargo run --example authenticated_get
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use token_requester::{
	error::Error,
	http::RequestOptions,
	requester::{Requester, RetryPolicy},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let user = env::var("REQUESTER_USER").wrap_err("REQUESTER_USER is not set")?;
	let password = env::var("REQUESTER_PASSWORD").wrap_err("REQUESTER_PASSWORD is not set")?;
	let auth_url = env::var("REQUESTER_AUTH_URL").wrap_err("REQUESTER_AUTH_URL is not set")?;
	let target = env::var("REQUESTER_TARGET").wrap_err("REQUESTER_TARGET is not set")?;
	let requester = Requester::new(user, password, auth_url)
		.with_retry_policy(RetryPolicy::default().with_max_reauthentications(3))
		.with_error_sink(Arc::new(|err: &Error, operation: &'static str| {
			eprintln!("{operation} failed: {err}");
		}));
	let options = RequestOptions::default().with_header("Accept", "application/json");
	let response = requester.get(&target, options, true).await?;

	println!("HTTP {}", response.status);
	println!("{}", serde_json::to_string_pretty(&response.data)?);

	Ok(())
}
