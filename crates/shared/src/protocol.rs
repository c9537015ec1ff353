use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Multipart field that carries the image on `POST /upload`.
pub const UPLOAD_IMAGE_FIELD: &str = "image";
/// Multipart field that carries the optional profile photo on `POST /register`.
pub const REGISTER_PHOTO_FIELD: &str = "photo";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentUserResponse {
    #[serde(default)]
    pub data: Option<User>,
}
