//! User actions dispatched to the catalog controller.

use shared::domain::{Book, BookId, BookPayload};

use crate::ImageUpload;

/// A filled-in form plus the image picked alongside it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub payload: BookPayload,
    pub image: Option<ImageUpload>,
}

impl Submission {
    pub fn new(payload: BookPayload) -> Self {
        Self {
            payload,
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Clone)]
pub enum CatalogCommand {
    Load,
    OpenCreate,
    BeginEdit(Book),
    CloseForm,
    Submit(Submission),
    Delete(BookId),
}

impl CatalogCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogCommand::Load => "load",
            CatalogCommand::OpenCreate => "open_create",
            CatalogCommand::BeginEdit(_) => "begin_edit",
            CatalogCommand::CloseForm => "close_form",
            CatalogCommand::Submit(_) => "submit",
            CatalogCommand::Delete(_) => "delete",
        }
    }
}
