//! Administrator registration handler.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::{
    password,
    storage::{insert_user, user_exists, StoreError},
    types::{AuthErrorBody, RegisterRequest, RegisterResponse},
    valid_email,
};

fn error_body(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(AuthErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Administrator created.", body = RegisterResponse),
        (status = 400, description = "Missing fields or duplicate username/email.", body = AuthErrorBody),
        (status = 500, description = "Internal server error.", body = AuthErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return error_body(StatusCode::BAD_REQUEST, "All fields are required");
    };

    // Blank strings count as missing, matching the stored behavior.
    let (Some(username), Some(email), Some(full_name), Some(raw_password)) = (
        required(&request.username),
        required(&request.email),
        required(&request.full_name),
        required(&request.password),
    ) else {
        return error_body(StatusCode::BAD_REQUEST, "All fields are required");
    };

    if !valid_email(&email) {
        return error_body(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    // Check if user exists (by username or email)
    match user_exists(&pool, &username, &email).await {
        Ok(true) => {
            debug!("User already exists");
            return error_body(
                StatusCode::BAD_REQUEST,
                "User with this username or email already exists",
            );
        }
        Ok(false) => (),
        Err(err) => {
            error!("Error checking if user exists: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }

    let password_hash = match password::hash(&raw_password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Error hashing password: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    match insert_user(&pool, &username, &email, &full_name, &password_hash).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User registered successfully".to_string(),
                user: user.to_public(),
            }),
        )
            .into_response(),
        // A concurrent register can still trip the unique constraints after
        // the existence check passed.
        Err(StoreError::Duplicate) => error_body(
            StatusCode::BAD_REQUEST,
            "User with this username or email already exists",
        ),
        Err(StoreError::Other(err)) => {
            error!("Error inserting user: {err}");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Trims a field and treats blank values as absent.
fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some(String::new())), None);
        assert_eq!(required(&Some("   ".to_string())), None);
    }

    #[test]
    fn required_trims_value() {
        assert_eq!(
            required(&Some("  alice  ".to_string())),
            Some("alice".to_string())
        );
    }
}
