//! Request/response payloads for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fields are optional so missing input maps to the documented 400 rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Allowlist projection of an administrator account. The password hash is
/// deliberately not part of this type.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
}

/// Error body used by the auth endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthErrorBody {
    pub error: String,
}
