// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Token errors are ordinary return values of the verifier. They only become
//! HTTP responses through [`AuthError`], which maps every verification failure
//! to `401` and authorization failures to `403`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Key material could not be obtained. Fatal at startup.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Local key missing, unreadable or not a valid RSA PEM.
    #[error("failed to load key: {0}")]
    Load(String),
    /// Remote public key fetch failed (transport, status or decode).
    #[error("failed to fetch public key: {0}")]
    Fetch(String),
}

/// Token issuance failed.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Why a token was rejected by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("unsupported signing algorithm `{0}`")]
    UnsupportedAlgorithm(String),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not yet valid")]
    NotYetValid,
    #[error("token issuer is invalid")]
    InvalidIssuer,
}

impl TokenError {
    /// Short machine-readable reason for server-side logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::NotYetValid => "not_yet_valid",
            TokenError::InvalidIssuer => "invalid_issuer",
        }
    }
}

/// HTTP-facing authentication and authorization error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),
    /// The caller lacks the named role.
    #[error("Forbidden: {0} role required")]
    Forbidden(String),
    /// A handler asked for claims on a route without the authentication
    /// stage. This is a wiring mistake, never an authorization success.
    #[error("Authentication is not configured for this route")]
    NotAuthenticated,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    ///
    /// All token failures share one code so clients cannot tell which check
    /// failed; the precise reason is logged server-side.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::Forbidden(_) => "forbidden",
            AuthError::NotAuthenticated => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotAuthenticated => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::NotAuthenticated = self {
            tracing::error!("Handler requires claims but the route has no authentication layer");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Authorization header required");
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn every_token_failure_is_401_with_one_code() {
        let failures = [
            TokenError::Malformed,
            TokenError::UnsupportedAlgorithm("none".to_string()),
            TokenError::InvalidSignature,
            TokenError::Expired,
            TokenError::NotYetValid,
            TokenError::InvalidIssuer,
        ];
        for failure in failures {
            let response = AuthError::from(failure).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_json(response).await["error_code"], "invalid_token");
        }
    }

    #[tokio::test]
    async fn forbidden_names_the_role() {
        let response = AuthError::Forbidden("admin".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "Forbidden: admin role required");
    }

    #[test]
    fn missing_claims_is_a_server_error() {
        assert_eq!(
            AuthError::NotAuthenticated.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_token_message_carries_reason() {
        let err = AuthError::from(TokenError::Expired);
        assert_eq!(err.to_string(), "Invalid token: token has expired");
    }
}
