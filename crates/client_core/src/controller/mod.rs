//! Controller layer: catalog state, commands from the view, and the events sent back.

mod catalog;
pub mod commands;
pub mod events;
mod orchestration;
pub mod state;

pub use catalog::{BookCatalogController, ConfirmPrompt};
pub use commands::{CatalogCommand, Submission};
pub use events::{CatalogEvent, DeleteOutcome, SaveKind};
pub use state::{
    genre_name, BookForm, BookRow, FetchState, FormState, LoadPhase, GENRE_PLACEHOLDER,
};

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
