// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for verified claims.
//!
//! Use the `Authenticated` extractor in handlers behind the authentication
//! middleware:
//!
//! ```rust,ignore
//! async fn my_handler(Authenticated(claims): Authenticated) -> impl IntoResponse {
//!     // claims is the verified Claims of this request
//! }
//! ```
//!
//! The extractor never verifies anything itself. If the middleware did not
//! run for the route, extraction fails with a server error instead of
//! treating the caller as authenticated.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims};

/// Claims placed on the request by [`authenticate`](super::middleware::authenticate).
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Authenticated)
            .ok_or(AuthError::NotAuthenticated)
    }
}
