use serde::{Deserialize, Serialize};

use crate::auth::repo_types::PublicUser;
use crate::auth::session::SessionUser;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

/// Partial user update; only name and password are mutable.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    /// Plaintext temporary password, deliberately returned to the caller.
    pub temp_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}
