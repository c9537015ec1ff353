//! Controller-owned state: per-fetch results, the load phase, and the form.

use shared::domain::{Book, BookId, BookPayload, Genre, GenreId};

use crate::error::FormError;

/// Shown in place of a genre name the loaded genres do not know.
pub const GENRE_PLACEHOLDER: &str = "—";

/// Outcome of one initial fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState<T> {
    #[default]
    Pending,
    Success(T),
    Failure(String),
}

impl<T> FetchState<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, FetchState::Pending)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchState::Failure(_))
    }

    /// Same state without its payload.
    pub fn status(&self) -> FetchState<()> {
        match self {
            FetchState::Pending => FetchState::Pending,
            FetchState::Success(_) => FetchState::Success(()),
            FetchState::Failure(reason) => FetchState::Failure(reason.clone()),
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            FetchState::Success(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
}

impl LoadPhase {
    /// Ready once both fetches have settled, whichever way they went.
    pub fn joined<A, B>(first: &FetchState<A>, second: &FetchState<B>) -> Self {
        if first.is_settled() && second.is_settled() {
            LoadPhase::Ready
        } else {
            LoadPhase::Loading
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(Book),
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn editing(&self) -> Option<&Book> {
        match self {
            FormState::OpenForEdit(book) => Some(book),
            _ => None,
        }
    }

    /// Initial field values for the open form.
    pub fn draft(&self) -> BookForm {
        self.editing().map(BookForm::from_book).unwrap_or_default()
    }
}

/// Editable fields of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub genre_id: String,
    pub description: String,
    pub cover_image_url: String,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre_id: book.genre_id.to_string(),
            description: book.description.clone(),
            cover_image_url: book.cover_image_url.clone(),
        }
    }

    /// Checks the fields the form marks as required and builds the request body.
    /// The cover image URL is optional and passed through as-is.
    pub fn validate(&self) -> Result<BookPayload, FormError> {
        let required = [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre_id),
            ("description", &self.description),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(FormError::MissingField(*field));
        }

        Ok(BookPayload {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre_id: GenreId::new(self.genre_id.trim()),
            description: self.description.clone(),
            cover_image_url: self.cover_image_url.clone(),
        })
    }
}

/// One rendered line of the book table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre_name: String,
    pub cover_image_url: Option<String>,
}

impl BookRow {
    pub fn new(book: &Book, genres: &[Genre]) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre_name: genre_name(genres, &book.genre_id).to_string(),
            cover_image_url: Some(book.cover_image_url.clone()).filter(|url| !url.is_empty()),
        }
    }
}

pub fn genre_name<'a>(genres: &'a [Genre], genre_id: &GenreId) -> &'a str {
    genres
        .iter()
        .find(|genre| &genre.id == genre_id)
        .map(|genre| genre.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(GENRE_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fiction() -> Vec<Genre> {
        vec![Genre {
            id: GenreId::from("g1"),
            name: "Fiction".into(),
        }]
    }

    fn book(genre: &str) -> Book {
        Book {
            id: BookId::from("b1"),
            title: "Dune".into(),
            author: "Herbert".into(),
            genre_id: GenreId::from(genre),
            description: "Spice".into(),
            cover_image_url: String::new(),
        }
    }

    #[test]
    fn unknown_genre_renders_placeholder() {
        let row = BookRow::new(&book("missing"), &fiction());
        assert_eq!(row.genre_name, GENRE_PLACEHOLDER);
        assert_eq!(genre_name(&[], &GenreId::default()), GENRE_PLACEHOLDER);
    }

    #[test]
    fn known_genre_renders_name_and_empty_cover_is_hidden() {
        let row = BookRow::new(&book("g1"), &fiction());
        assert_eq!(row.genre_name, "Fiction");
        assert_eq!(row.cover_image_url, None);
    }

    #[test]
    fn phase_waits_for_both_fetches() {
        let pending: FetchState<()> = FetchState::Pending;
        let failed: FetchState<()> = FetchState::Failure("boom".into());
        let done = FetchState::Success(3usize);

        assert_eq!(LoadPhase::joined(&pending, &done), LoadPhase::Loading);
        assert_eq!(LoadPhase::joined(&done, &pending), LoadPhase::Loading);
        assert_eq!(LoadPhase::joined(&failed, &done), LoadPhase::Ready);
        assert_eq!(LoadPhase::joined(&failed, &failed), LoadPhase::Ready);
    }

    #[test]
    fn edit_form_is_prepopulated() {
        let form = FormState::OpenForEdit(book("g1"));
        let draft = form.draft();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.genre_id, "g1");
        assert_eq!(FormState::OpenForCreate.draft(), BookForm::default());
    }

    #[test]
    fn validation_reports_first_missing_field() {
        let mut form = BookForm::from_book(&book("g1"));
        form.author = "  ".into();
        assert_eq!(form.validate(), Err(FormError::MissingField("author")));

        form.author = "Herbert".into();
        form.genre_id.clear();
        assert_eq!(form.validate(), Err(FormError::MissingField("genre")));
    }

    #[test]
    fn validation_keeps_empty_cover_url() {
        let payload = BookForm::from_book(&book("g1")).validate().expect("valid form");
        assert_eq!(payload.genre_id, GenreId::from("g1"));
        assert!(payload.cover_image_url.is_empty());
    }
}
