// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};

use crate::{auth::keys::PEM_CONTENT_TYPE, state::AuthState};

/// Public key distribution endpoint.
///
/// Serves the PEM the issuer loaded at startup. Verifiers fetch this once.
#[utoipa::path(
    get,
    path = "/api/public-key",
    tag = "Auth",
    responses(
        (status = 200, description = "RSA public key", content_type = "application/x-pem-file", body = String)
    )
)]
pub async fn public_key(State(state): State<AuthState>) -> impl IntoResponse {
    let pem = state.issuer.verifier().public_key().pem().to_owned();
    ([(CONTENT_TYPE, PEM_CONTENT_TYPE)], pem)
}
