use super::*;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::GenreId;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: &'static str,
    path: String,
    body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
struct UploadedField {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct ApiState {
    books: Arc<Mutex<Vec<Book>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    uploads: Arc<Mutex<Vec<UploadedField>>>,
    fail_genres: bool,
}

impl ApiState {
    fn new(books: Vec<Book>) -> Self {
        Self {
            books: Arc::new(Mutex::new(books)),
            requests: Arc::new(Mutex::new(Vec::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail_genres: false,
        }
    }

    async fn record(&self, method: &'static str, path: String, body: Option<Value>) {
        self.requests.lock().await.push(Recorded { method, path, body });
    }

    async fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

fn book(id: &str, title: &str, cover: &str) -> Book {
    Book {
        id: BookId::from(id),
        title: title.to_string(),
        author: "Herbert".to_string(),
        genre_id: GenreId::from("g1"),
        description: "Spice".to_string(),
        cover_image_url: cover.to_string(),
    }
}

async fn list_books(State(state): State<ApiState>) -> Json<Vec<Book>> {
    state.record("GET", "/books".into(), None).await;
    Json(state.books.lock().await.clone())
}

async fn list_genres(State(state): State<ApiState>) -> axum::response::Response {
    state.record("GET", "/genres".into(), None).await;
    if state.fail_genres {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "genre store offline"})),
        )
            .into_response();
    }
    Json(json!([{"_id": "g1", "name": "Fiction"}])).into_response()
}

async fn upload(State(state): State<ApiState>, mut multipart: Multipart) -> Json<Value> {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.uploads.lock().await.push(UploadedField {
            name,
            filename,
            content_type,
            bytes,
        });
    }
    state.record("POST", "/upload".into(), None).await;
    Json(json!({"url": "https://img.example.com/cover-new.png"}))
}

async fn create_book(State(state): State<ApiState>, Json(payload): Json<Value>) -> Json<Value> {
    state
        .record("POST", "/books".into(), Some(payload.clone()))
        .await;
    let mut books = state.books.lock().await;
    let created: Book = serde_json::from_value(json!({
        "_id": format!("b{}", books.len() + 1),
        "title": payload["title"],
        "author": payload["author"],
        "genre": payload["genre"],
        "description": payload["description"],
        "coverImage": payload["coverImage"],
    }))
    .expect("created book");
    books.push(created.clone());
    Json(json!({"success": true, "data": created}))
}

async fn update_book(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    state
        .record("PUT", format!("/books/{id}"), Some(payload.clone()))
        .await;
    let mut books = state.books.lock().await;
    if let Some(existing) = books.iter_mut().find(|b| b.id.as_str() == id) {
        existing.title = payload["title"].as_str().unwrap_or_default().to_string();
        existing.cover_image_url = payload["coverImage"].as_str().unwrap_or_default().to_string();
    }
    Json(json!({"success": true}))
}

async fn delete_book(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
) -> axum::response::Response {
    state.record("DELETE", format!("/books/{id}"), None).await;
    let mut books = state.books.lock().await;
    let before = books.len();
    books.retain(|b| b.id.as_str() != id);
    if books.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Book not found"})),
        )
            .into_response();
    }
    Json(json!({"success": true})).into_response()
}

async fn spawn_api_server(state: ApiState) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", put(update_book).delete(delete_book))
        .route("/genres", get(list_genres))
        .route("/upload", post(upload))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm_delete(&self, _id: &BookId) -> bool {
        true
    }
}

#[tokio::test]
async fn lists_books_and_genres_with_api_field_names() {
    let state = ApiState::new(vec![book("b1", "Dune", "")]);
    let base_url = spawn_api_server(state).await.expect("spawn server");
    let api = HttpCatalogApi::new(&base_url).expect("client");

    let books = api.list_books().await.expect("books");
    assert_eq!(books, vec![book("b1", "Dune", "")]);

    let genres = api.list_genres().await.expect("genres");
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].name, "Fiction");
}

#[tokio::test]
async fn create_posts_full_json_payload() {
    let state = ApiState::new(Vec::new());
    let base_url = spawn_api_server(state.clone()).await.expect("spawn server");
    let api = HttpCatalogApi::new(format!("{base_url}/")).expect("client");

    api.create_book(&book("ignored", "Dune", "").payload())
        .await
        .expect("create");

    let requests = state.requests.lock().await.clone();
    assert_eq!(
        requests,
        vec![Recorded {
            method: "POST",
            path: "/books".into(),
            body: Some(json!({
                "title": "Dune",
                "author": "Herbert",
                "genre": "g1",
                "description": "Spice",
                "coverImage": ""
            })),
        }]
    );
}

#[tokio::test]
async fn upload_sends_multipart_image_field() {
    let state = ApiState::new(Vec::new());
    let base_url = spawn_api_server(state.clone()).await.expect("spawn server");
    let api = HttpCatalogApi::new(&base_url).expect("client");

    let url = api
        .upload_image(ImageUpload {
            filename: "cover.png".into(),
            mime_type: Some("image/png".into()),
            bytes: b"png-bytes".to_vec(),
        })
        .await
        .expect("upload");
    assert_eq!(url, "https://img.example.com/cover-new.png");

    let uploads = state.uploads.lock().await.clone();
    assert_eq!(
        uploads,
        vec![UploadedField {
            name: "image".into(),
            filename: Some("cover.png".into()),
            content_type: Some("image/png".into()),
            bytes: b"png-bytes".to_vec(),
        }]
    );
}

#[tokio::test]
async fn update_and_delete_address_the_book_by_id() {
    let state = ApiState::new(vec![book("b1", "Dune", "")]);
    let base_url = spawn_api_server(state.clone()).await.expect("spawn server");
    let api = HttpCatalogApi::new(&base_url).expect("client");
    let id = BookId::from("b1");

    api.update_book(&id, &book("b1", "Dune Messiah", "").payload())
        .await
        .expect("update");
    api.delete_book(&id).await.expect("delete");

    assert_eq!(
        state.request_lines().await,
        vec!["PUT /books/b1", "DELETE /books/b1"]
    );
}

#[tokio::test]
async fn failed_request_carries_server_message() {
    let state = ApiState::new(Vec::new());
    let base_url = spawn_api_server(state).await.expect("spawn server");
    let api = HttpCatalogApi::new(&base_url).expect("client");

    let err = api
        .delete_book(&BookId::from("missing"))
        .await
        .expect_err("must fail");
    let api_err = err.downcast_ref::<ApiException>().expect("api exception");
    assert_eq!(api_err.status, 404);
    assert_eq!(api_err.message, "Book not found");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpCatalogApi::new(format!("http://{addr}")).expect("client");
    assert!(api.list_books().await.is_err());
}

#[tokio::test]
async fn editing_with_new_cover_uploads_then_updates_then_resyncs() {
    let state = ApiState::new(vec![book("b1", "Dune", "https://img.example.com/old.png")]);
    let base_url = spawn_api_server(state.clone()).await.expect("spawn server");
    let api = Arc::new(HttpCatalogApi::new(&base_url).expect("client"));
    let mut controller = BookCatalogController::new(api, Arc::new(AlwaysConfirm));

    controller.initialize().await;
    assert_eq!(controller.phase(), LoadPhase::Ready);

    let existing = controller
        .find_book(&BookId::from("b1"))
        .cloned()
        .expect("loaded book");
    controller.begin_edit(existing.clone());
    let mut payload = existing.payload();
    payload.title = "Dune (revised)".into();

    let kind = controller
        .submit(Submission::new(payload).with_image(ImageUpload {
            filename: "new.png".into(),
            mime_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        }))
        .await
        .expect("submit");

    assert_eq!(kind, SaveKind::Updated(BookId::from("b1")));
    let lines = state.request_lines().await;
    assert_eq!(
        &lines[2..],
        &["POST /upload", "PUT /books/b1", "GET /books"]
    );
    let update_body = state.requests.lock().await[3].body.clone().expect("body");
    assert_eq!(update_body["coverImage"], "https://img.example.com/cover-new.png");
    assert_eq!(controller.books()[0].title, "Dune (revised)");
    assert_eq!(controller.form(), &FormState::Closed);
}

#[tokio::test]
async fn genre_failure_still_loads_books_over_http() {
    let mut state = ApiState::new(vec![book("b1", "Dune", "")]);
    state.fail_genres = true;
    let base_url = spawn_api_server(state).await.expect("spawn server");
    let api = Arc::new(HttpCatalogApi::new(&base_url).expect("client"));
    let mut controller = BookCatalogController::new(api, Arc::new(AlwaysConfirm));

    controller.initialize().await;

    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(controller.books().len(), 1);
    assert!(controller.genres().is_empty());
    match controller.genres_fetch() {
        FetchState::Failure(reason) => assert!(reason.contains("genre store offline")),
        other => panic!("unexpected genre fetch state: {other:?}"),
    }
    assert_eq!(controller.rows()[0].genre_name, GENRE_PLACEHOLDER);
}
