//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with `myficdb_core`, delegate persistence to the
//! repositories in `myficdb_db` and map failures via [`AppError`](crate::error::AppError).

pub mod actors;
pub mod auth;
pub mod chapters;
pub mod search;
pub mod series;
pub mod stories;
pub mod suggest;
pub mod system;
pub mod tags;
