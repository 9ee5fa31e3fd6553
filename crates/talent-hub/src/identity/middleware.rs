use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Duration;
use tracing::debug;

use super::TokenIssuer;
use crate::talent::ServiceError;

pub const SESSION_COOKIE: &str = "token";

/// Rejects the request unless it carries a valid session token, then exposes
/// the [`super::Session`] to handlers as an extension.
pub async fn require_session(
    State(tokens): State<Arc<TokenIssuer>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = session_token(request.headers()).ok_or(ServiceError::Unauthenticated)?;
    let session = tokens.verify(&token).inspect_err(|_| {
        debug!(path = %request.uri().path(), "rejected session token");
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// The `token` cookie wins over an `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("token="))
        .find(|token| !token.is_empty())
        .map(str::to_string);

    from_cookie.or_else(|| {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
    })
}

pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        ttl.num_seconds().max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", Duration::zero(), secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_token_from_cookie_before_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=abc.def.ghi"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_attributes_follow_deployment() {
        let cookie = session_cookie("t", Duration::minutes(60), true);
        assert_eq!(cookie, "token=t; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax; Secure");
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }
}
