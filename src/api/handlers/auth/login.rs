//! Administrator login handler.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::{
    password,
    storage::find_user_by_email,
    token, token_cookie,
    types::{AuthErrorBody, LoginRequest, LoginResponse},
};
use crate::cli::globals::GlobalArgs;

/// Shared by the missing-user and wrong-password paths so responses do not
/// reveal whether the account exists.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

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
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets the `token` cookie.", body = LoginResponse),
        (status = 400, description = "Missing fields or invalid credentials.", body = AuthErrorBody),
        (status = 500, description = "Missing signing secret or internal error.", body = AuthErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    globals: Extension<GlobalArgs>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return error_body(StatusCode::BAD_REQUEST, "Email and password are required");
    };

    let (Some(email), Some(raw_password)) = (
        request.email.as_deref().map(str::trim).filter(|v| !v.is_empty()),
        request.password.as_deref().filter(|v| !v.trim().is_empty()),
    ) else {
        return error_body(StatusCode::BAD_REQUEST, "Email and password are required");
    };

    let user = match find_user_by_email(&pool, email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("No user found with this email");
            return error_body(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS);
        }
        Err(err) => {
            error!("Error getting user from database: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    match password::verify(raw_password, &user.password_hash) {
        Ok(true) => debug!("Password verified successfully"),
        Ok(false) => {
            debug!("Incorrect password");
            return error_body(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS);
        }
        Err(err) => {
            error!("Error verifying password: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }

    let Some(secret) = globals.jwt_secret.as_ref() else {
        error!("Missing signing secret, cannot issue session token");
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error");
    };

    let session_token = match token::issue(user.user_id, &user.email, secret.expose_secret()) {
        Ok(session_token) => session_token,
        Err(err) => {
            error!("Error signing session token: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let mut headers = HeaderMap::new();
    match token_cookie(&session_token, globals.production) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Error building session cookie: {err}");
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }

    (
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            message: "Login successful".to_string(),
        }),
    )
        .into_response()
}
