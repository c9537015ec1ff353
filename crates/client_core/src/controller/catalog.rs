use std::{future::Future, sync::Arc};

use shared::domain::{Book, BookId, BookPayload, Genre};
use tracing::{error, info, warn};

use crate::{
    controller::{
        commands::Submission,
        events::{DeleteOutcome, SaveKind},
        state::{BookRow, FetchState, FormState, LoadPhase},
    },
    error::{CatalogError, Collection},
    CatalogApi,
};

/// Asks the user whether a book really should be deleted.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm_delete(&self, id: &BookId) -> bool;
}

/// Owns the book list and mediates every catalog mutation against the API.
///
/// Creates and updates are followed by a full `/books` read that replaces the
/// local list. Deletes are the exception: a successful delete removes the book
/// locally without re-reading.
pub struct BookCatalogController {
    api: Arc<dyn CatalogApi>,
    confirm: Arc<dyn ConfirmPrompt>,
    books: Vec<Book>,
    genres: Vec<Genre>,
    books_fetch: FetchState<()>,
    genres_fetch: FetchState<()>,
    form: FormState,
}

impl BookCatalogController {
    pub fn new(api: Arc<dyn CatalogApi>, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            api,
            confirm,
            books: Vec::new(),
            genres: Vec::new(),
            books_fetch: FetchState::Pending,
            genres_fetch: FetchState::Pending,
            form: FormState::Closed,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> LoadPhase {
        LoadPhase::joined(&self.books_fetch, &self.genres_fetch)
    }

    pub fn books_fetch(&self) -> &FetchState<()> {
        &self.books_fetch
    }

    pub fn genres_fetch(&self) -> &FetchState<()> {
        &self.genres_fetch
    }

    pub fn find_book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    pub fn rows(&self) -> Vec<BookRow> {
        self.books
            .iter()
            .map(|book| BookRow::new(book, &self.genres))
            .collect()
    }

    /// Fetches books and genres concurrently and waits for both to settle.
    /// A failed fetch is logged and leaves that collection as it was.
    pub async fn initialize(&mut self) {
        self.books_fetch = FetchState::Pending;
        self.genres_fetch = FetchState::Pending;

        let api = Arc::clone(&self.api);
        let (books, genres) = futures::join!(
            settle(Collection::Books, api.list_books()),
            settle(Collection::Genres, api.list_genres()),
        );

        self.books_fetch = books.status();
        self.genres_fetch = genres.status();
        if let Some(books) = books.into_success() {
            self.books = books;
        }
        if let Some(genres) = genres.into_success() {
            self.genres = genres;
        }

        info!(
            books = self.books.len(),
            genres = self.genres.len(),
            "catalog ready"
        );
    }

    pub fn open_for_create(&mut self) {
        self.form = FormState::OpenForCreate;
    }

    pub fn begin_edit(&mut self, book: Book) {
        self.form = FormState::OpenForEdit(book);
    }

    /// Hides the form and drops the editing reference, discarding unsaved input.
    pub fn close_form(&mut self) {
        self.form = FormState::Closed;
    }

    /// Uploads the attached image (if any), then creates or updates the book and
    /// re-reads the whole list.
    ///
    /// An upload failure aborts before anything is written. A failed write or
    /// re-read leaves the form open so the user can retry.
    pub async fn submit(&mut self, submission: Submission) -> Result<SaveKind, CatalogError> {
        let Submission { mut payload, image } = submission;

        if let Some(image) = image {
            let filename = image.filename.clone();
            match self.api.upload_image(image).await {
                Ok(url) => payload.cover_image_url = url,
                Err(source) => {
                    let err = CatalogError::Upload(source);
                    error!(%filename, error = %err, "cover upload failed; book not saved");
                    return Err(err);
                }
            }
        }

        let editing = self.form.editing().map(|book| book.id.clone());
        match self.save(editing, &payload).await {
            Ok(kind) => {
                self.close_form();
                Ok(kind)
            }
            Err(err) => {
                error!(error = %err, "save failed; form kept open");
                Err(err)
            }
        }
    }

    async fn save(
        &mut self,
        editing: Option<BookId>,
        payload: &BookPayload,
    ) -> Result<SaveKind, CatalogError> {
        let kind = match editing {
            Some(id) => {
                self.api
                    .update_book(&id, payload)
                    .await
                    .map_err(CatalogError::Save)?;
                info!(book_id = %id, "book updated");
                SaveKind::Updated(id)
            }
            None => {
                self.api
                    .create_book(payload)
                    .await
                    .map_err(CatalogError::Save)?;
                info!(title = %payload.title, "book created");
                SaveKind::Created
            }
        };

        self.books = self.api.list_books().await.map_err(CatalogError::Save)?;
        Ok(kind)
    }

    /// Deletes a book once the user confirms, then drops it from the local list.
    pub async fn delete(&mut self, id: &BookId) -> Result<DeleteOutcome, CatalogError> {
        if !self.confirm.confirm_delete(id) {
            warn!(book_id = %id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(source) = self.api.delete_book(id).await {
            let err = CatalogError::Delete {
                id: id.clone(),
                source,
            };
            error!(error = %err, "delete failed");
            return Err(err);
        }

        self.books.retain(|book| &book.id != id);
        info!(book_id = %id, "book deleted");
        Ok(DeleteOutcome::Deleted)
    }
}

async fn settle<T>(
    collection: Collection,
    fetch: impl Future<Output = anyhow::Result<Vec<T>>>,
) -> FetchState<Vec<T>> {
    match fetch.await {
        Ok(items) => FetchState::Success(items),
        Err(source) => {
            let err = CatalogError::Fetch { collection, source };
            error!(error = %err, "initial fetch failed");
            FetchState::Failure(err.to_string())
        }
    }
}
