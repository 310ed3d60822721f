// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{LoginRequest, LoginResponse},
    state::AuthState,
};

/// Exchange username and password for an access token.
///
/// The freshly minted token is run through the same verifier remote
/// services use before it is handed out.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Body is not a login request", body = ErrorBody),
        (status = 401, description = "Unknown user or wrong password", body = ErrorBody),
        (status = 500, description = "Token could not be issued", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::bad_request("Invalid request body")
    })?;

    let roles = state
        .users
        .authenticate(&request.username, &request.password)
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state.issuer.issue(&request.username, roles).map_err(|e| {
        tracing::error!(error = %e, user_id = %request.username, "Token issuance failed");
        ApiError::internal("Failed to generate token")
    })?;

    state.issuer.verifier().verify(&token).map_err(|e| {
        tracing::error!(error = %e, user_id = %request.username, "Issued token failed self-check");
        ApiError::internal("Failed to generate token")
    })?;

    tracing::info!(user_id = %request.username, roles = ?roles, "Issued access token");
    Ok(Json(LoginResponse {
        access_token: token,
    }))
}
