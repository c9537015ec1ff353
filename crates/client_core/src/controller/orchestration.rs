//! Command dispatch from view actions to controller operations.

use tracing::debug;

use crate::controller::{
    catalog::BookCatalogController,
    commands::CatalogCommand,
    events::{CatalogEvent, DeleteOutcome},
};

impl BookCatalogController {
    pub async fn dispatch(&mut self, command: CatalogCommand) -> CatalogEvent {
        debug!(command = command.name(), "dispatching catalog command");

        match command {
            CatalogCommand::Load => {
                self.initialize().await;
                CatalogEvent::Loaded {
                    books: self.books().len(),
                    genres: self.genres().len(),
                    failed: self.books_fetch().is_failure() || self.genres_fetch().is_failure(),
                }
            }
            CatalogCommand::OpenCreate => {
                self.open_for_create();
                CatalogEvent::FormOpened
            }
            CatalogCommand::BeginEdit(book) => {
                self.begin_edit(book);
                CatalogEvent::FormOpened
            }
            CatalogCommand::CloseForm => {
                self.close_form();
                CatalogEvent::FormClosed
            }
            CatalogCommand::Submit(submission) => match self.submit(submission).await {
                Ok(kind) => CatalogEvent::Saved(kind),
                Err(err) => CatalogEvent::Failed(err),
            },
            CatalogCommand::Delete(id) => match self.delete(&id).await {
                Ok(DeleteOutcome::Deleted) => CatalogEvent::Deleted(id),
                Ok(DeleteOutcome::Declined) => CatalogEvent::DeleteDeclined(id),
                Err(err) => CatalogEvent::Failed(err),
            },
        }
    }
}
