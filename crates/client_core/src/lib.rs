use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::{Book, BookId, BookPayload, Genre},
    error::ApiException,
    protocol::{UploadResponse, UPLOAD_IMAGE_FIELD},
};
use tracing::debug;

pub mod config;
pub mod controller;
pub mod error;
pub mod session;

pub use controller::{
    genre_name, BookCatalogController, BookForm, BookRow, CatalogCommand, CatalogEvent,
    ConfirmPrompt, DeleteOutcome, FetchState, FormState, LoadPhase, SaveKind, Submission,
    GENRE_PLACEHOLDER,
};
pub use error::{CatalogError, Collection, FormError};
pub use session::SessionClient;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file picked by the user, ready to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image.bin")
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image file '{}'", path.display()))?;
        let mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);
        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let mime_type = self
            .mime_type
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&mime_type)
            .with_context(|| format!("invalid mime type '{mime_type}'"))
    }
}

/// Remote operations the catalog controller depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn list_genres(&self) -> Result<Vec<Genre>>;
    /// Uploads an image and returns the URL the server hosts it under.
    async fn upload_image(&self, image: ImageUpload) -> Result<String>;
    async fn create_book(&self, payload: &BookPayload) -> Result<()>;
    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> Result<()>;
    async fn delete_book(&self, id: &BookId) -> Result<()>;
}

pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().cookie_store(true);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build http client")
}

/// Turns a non-2xx response into an error carrying the server's message.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiException::from_body(status.as_u16(), &body).into())
}

pub struct HttpCatalogApi {
    http: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(build_http_client(None)?, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn book_url(&self, id: &BookId) -> String {
        format!("{}/books/{}", self.base_url, id.as_str())
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let response = self
            .http
            .get(format!("{}/books", self.base_url))
            .send()
            .await?;
        let books: Vec<Book> = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed book list")?;
        debug!(count = books.len(), "fetched books");
        Ok(books)
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let response = self
            .http
            .get(format!("{}/genres", self.base_url))
            .send()
            .await?;
        let genres: Vec<Genre> = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed genre list")?;
        debug!(count = genres.len(), "fetched genres");
        Ok(genres)
    }

    async fn upload_image(&self, image: ImageUpload) -> Result<String> {
        let filename = image.filename.clone();
        let form = Form::new().part(UPLOAD_IMAGE_FIELD, image.into_part()?);
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed upload response")?;
        debug!(%filename, url = %uploaded.url, "uploaded image");
        Ok(uploaded.url)
    }

    async fn create_book(&self, payload: &BookPayload) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/books", self.base_url))
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> Result<()> {
        let response = self.http.put(self.book_url(id)).json(payload).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_book(&self, id: &BookId) -> Result<()> {
        let response = self.http.delete(self.book_url(id)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
