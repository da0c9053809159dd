//! Bearer token secrets and the per-requester token slot.

pub mod secret;
pub mod state;
