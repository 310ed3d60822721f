// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to protected route groups only:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/products/private", get(private_products))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         verifier.clone(),
//!         authenticate,
//!     ));
//! ```
//!
//! On success the verified [`Claims`] are inserted into the request
//! extensions, where the [`Authenticated`](super::Authenticated) extractor
//! picks them up. Extensions live and die with the request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Claims, TokenVerifier};

/// Authentication middleware function.
pub async fn authenticate(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_headers(request.headers(), &verifier) {
        Ok(claims) => {
            tracing::debug!(user_id = %claims.subject, "Request authenticated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            if let AuthError::InvalidToken(ref reason) = e {
                tracing::info!(
                    reason = reason.reason(),
                    path = %request.uri().path(),
                    "Token rejected"
                );
            }
            e.into_response()
        }
    }
}

/// Extract the bearer token from `headers` and verify it.
pub fn authenticate_headers(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<Claims, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    if header.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = bearer_token(header).ok_or(AuthError::InvalidAuthHeader)?;
    Ok(verifier.verify(token)?)
}

/// `Bearer <token>`: exactly two space-separated parts, scheme case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issuer::test_support::issuer;
    use crate::auth::{Authenticated, TokenError};
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), Some(""));
        assert_eq!(bearer_token("Bearer a b"), None);
        assert_eq!(bearer_token("Bearer  abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn header_contract() {
        let issuer = issuer();
        let verifier = issuer.verifier();

        assert!(matches!(
            authenticate_headers(&HeaderMap::new(), verifier),
            Err(AuthError::MissingAuthHeader)
        ));
        assert!(matches!(
            authenticate_headers(&headers_with("Bearer"), verifier),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            authenticate_headers(&headers_with("Token abc"), verifier),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            authenticate_headers(&headers_with("Bearer not-a-jwt"), verifier),
            Err(AuthError::InvalidToken(TokenError::Malformed))
        ));

        let token = issuer.issue("user1", &["user".to_string()]).unwrap();
        let claims = authenticate_headers(&headers_with(&format!("Bearer {token}")), verifier).unwrap();
        assert_eq!(claims.subject, "user1");
    }

    fn app() -> (Router, String) {
        let issuer = issuer();
        let token = issuer.issue("user1", &["user".to_string()]).unwrap();
        let verifier = Arc::new(issuer.verifier().clone());
        let router = Router::new()
            .route(
                "/whoami",
                get(|Authenticated(claims): Authenticated| async move { claims.subject }),
            )
            .route_layer(from_fn_with_state(verifier, authenticate));
        (router, token)
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_claims() {
        let (app, token) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"user1");
    }

    #[tokio::test]
    async fn missing_header_never_reaches_handler() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
