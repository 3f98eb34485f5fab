//! Domain logic for the MyFicDB archive.
//!
//! Everything here is free of I/O so it can be shared by the repository
//! layer, the HTTP handlers and the background jobs alike.

pub mod actor_image;
pub mod csv_list;
pub mod error;
pub mod export;
pub mod hashing;
pub mod naming;
pub mod paths;
pub mod sanitize;
pub mod search;
pub mod story;
pub mod text;
pub mod types;
pub mod version;
