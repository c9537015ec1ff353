use std::fmt;

use shared::domain::BookId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Genres,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Books => f.write_str("books"),
            Collection::Genres => f.write_str("genres"),
        }
    }
}

/// Failures of catalog operations, one variant per operation boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch {collection}: {source}")]
    Fetch {
        collection: Collection,
        source: anyhow::Error,
    },
    #[error("image upload failed: {0}")]
    Upload(anyhow::Error),
    #[error("failed to save book: {0}")]
    Save(anyhow::Error),
    #[error("failed to delete book {id}: {source}")]
    Delete { id: BookId, source: anyhow::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("passwords do not match")]
    PasswordMismatch,
}
