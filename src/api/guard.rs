//! Request gate for the protected admin surface.
//!
//! Paths under the protected prefixes require a valid session token: the
//! cookie must be present, its signature must check out against the
//! configured secret, and it must not be expired. Anything else is
//! redirected to the login page. All other paths pass through untouched.

use axum::{
    extract::{Extension, Request},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::{
    api::handlers::auth::{token, TOKEN_COOKIE_NAME},
    cli::globals::GlobalArgs,
};

const LOGIN_PATH: &str = "/admin-login";

const PROTECTED_PREFIXES: &[&str] = &["/admin", "/dashboard", "/protected"];

/// `/admin` and everything below it, but not `/administration`.
fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

pub async fn require_session(
    Extension(globals): Extension<GlobalArgs>,
    request: Request,
    next: Next,
) -> Response {
    if !is_protected(request.uri().path()) {
        return next.run(request).await;
    }

    let Some(session_token) = cookie_value(request.headers(), TOKEN_COOKIE_NAME) else {
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    // Without a configured secret no token can be trusted.
    let Some(secret) = globals.jwt_secret.as_ref() else {
        debug!("No signing secret configured, rejecting session token");
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    match token::verify(&session_token, secret.expose_secret()) {
        Ok(_claims) => next.run(request).await,
        Err(err) => {
            debug!("Rejected session token: {err}");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn protected_prefixes_match_subpaths() {
        assert!(is_protected("/admin"));
        assert!(is_protected("/admin/units"));
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/dashboard/reports/2026"));
        assert!(is_protected("/protected"));
    }

    #[test]
    fn other_paths_are_unguarded() {
        assert!(!is_protected("/"));
        assert!(!is_protected("/api/auth/login"));
        assert!(!is_protected("/api/institutionUnit"));
        assert!(!is_protected("/administration"));
        assert!(!is_protected("/dashboards"));
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=eo"),
        );
        assert_eq!(
            cookie_value(&headers, "token"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_none_without_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, "token"), None);
    }
}
