//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and the password length rule.
//! - [`jwt`] -- access-token signing and refresh-token helpers.
//! - [`reset`] -- the one-shot startup password reset.

pub mod jwt;
pub mod password;
pub mod reset;
