//! Outcomes reported back to whatever renders the catalog.

use shared::domain::BookId;

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated(BookId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

#[derive(Debug)]
pub enum CatalogEvent {
    Loaded {
        books: usize,
        genres: usize,
        failed: bool,
    },
    FormOpened,
    FormClosed,
    Saved(SaveKind),
    Deleted(BookId),
    DeleteDeclined(BookId),
    Failed(CatalogError),
}

impl CatalogEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, CatalogEvent::Failed(_))
    }

    /// One-line status text for the view.
    pub fn describe(&self) -> String {
        match self {
            CatalogEvent::Loaded {
                books,
                genres,
                failed: false,
            } => format!("Loaded {books} books and {genres} genres"),
            CatalogEvent::Loaded { books, genres, .. } => {
                format!("Loaded {books} books and {genres} genres (some data failed to load)")
            }
            CatalogEvent::FormOpened => "Form opened".to_string(),
            CatalogEvent::FormClosed => "Form closed".to_string(),
            CatalogEvent::Saved(SaveKind::Created) => "Book created".to_string(),
            CatalogEvent::Saved(SaveKind::Updated(id)) => format!("Book {id} updated"),
            CatalogEvent::Deleted(id) => format!("Book {id} deleted"),
            CatalogEvent::DeleteDeclined(id) => format!("Kept book {id}"),
            CatalogEvent::Failed(err) => err.to_string(),
        }
    }
}
