//! Errors raised by repositories beyond plain driver failures.

use myficdb_core::naming::NamedKind;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("No free slug left for {} '{base}'", .kind.label())]
    SlugExhausted { kind: NamedKind, base: String },
}
