//! Login, registration and current-user lookups against the library API.

use anyhow::{Context, Result};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::{Role, User},
    protocol::{AuthResponse, LoginRequest, PresentUserResponse, REGISTER_PHOTO_FIELD},
};
use tracing::{info, warn};

use crate::{build_http_client, ensure_success, error::FormError, ImageUpload};

pub const LOGIN_ROUTE: &str = "/login";
pub const ADMIN_LANDING_ROUTE: &str = "/dashboard";
pub const USER_LANDING_ROUTE: &str = "/my-library";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub photo: Option<ImageUpload>,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(FormError::MissingField("email"));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingField("password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace anywhere.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Where a visitor belongs once the current user is known.
pub fn landing_route(user: Option<&User>) -> &'static str {
    match user {
        None => LOGIN_ROUTE,
        Some(user) if user.role == Role::Admin => ADMIN_LANDING_ROUTE,
        Some(_) => USER_LANDING_ROUTE,
    }
}

pub fn describe_auth_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("error sending request")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Server unreachable; check the API URL and retry.".to_string()
    } else {
        format!("Authentication error: {message}")
    }
}

pub struct SessionClient {
    http: Client,
    base_url: String,
}

impl SessionClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(build_http_client(None)?, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        if email.trim().is_empty() {
            return Err(FormError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(FormError::MissingField("password").into());
        }

        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: AuthResponse = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed login response")?;
        if body.success {
            info!(%email, "logged in");
        } else {
            warn!(%email, message = %body.message, "login not accepted");
        }
        Ok(body)
    }

    pub async fn register(&self, form: RegisterForm) -> Result<AuthResponse> {
        form.validate()?;

        let RegisterForm {
            name,
            email,
            password,
            photo,
            ..
        } = form;
        let mut multipart = Form::new()
            .text("name", name)
            .text("email", email.clone())
            .text("password", password);
        if let Some(photo) = photo {
            let part: Part = photo.into_part()?;
            multipart = multipart.part(REGISTER_PHOTO_FIELD, part);
        }

        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .multipart(multipart)
            .send()
            .await?;
        let body: AuthResponse = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed register response")?;
        info!(%email, success = body.success, "registration submitted");
        Ok(body)
    }

    /// The signed-in user, or `None` when the session is anonymous.
    pub async fn present_user(&self) -> Result<Option<User>> {
        let response = self
            .http
            .get(format!("{}/present/user", self.base_url))
            .send()
            .await?;
        let body: PresentUserResponse = ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed current user response")?;
        Ok(body.data)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
