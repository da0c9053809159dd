//! Credentials, token state, and the credential-endpoint wire contract.

pub mod credentials;
pub mod endpoint;
pub mod token;

pub use credentials::*;
pub use token::{secret::*, state::*};
