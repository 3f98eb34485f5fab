//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument. Writes spanning several
//! tables run inside one transaction.

mod named_repo;

pub mod actor_repo;
pub mod chapter_repo;
pub mod export_repo;
pub mod series_repo;
pub mod session_repo;
pub mod story_link_repo;
pub mod story_repo;
pub mod system_repo;
pub mod tag_repo;
pub mod user_repo;

pub use actor_repo::ActorRepo;
pub use chapter_repo::ChapterRepo;
pub use export_repo::ExportRepo;
pub use series_repo::SeriesRepo;
pub use session_repo::SessionRepo;
pub use story_link_repo::StoryLinkRepo;
pub use story_repo::{StoryCounter, StoryLinks, StoryRepo};
pub use system_repo::SystemRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
