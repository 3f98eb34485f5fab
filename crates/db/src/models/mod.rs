//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` entity structs matching database rows
//! - `Deserialize` request DTOs and the validated field structs the
//!   repositories accept

pub mod actor;
pub mod chapter;
pub mod series;
pub mod session;
pub mod story;
pub mod tag;
pub mod user;
