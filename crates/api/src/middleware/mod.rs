//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in account, from a JWT Bearer token.

pub mod auth;
