// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, TokenVerifier},
    error::ErrorBody,
    middleware::with_request_pipeline,
    models::{HealthResponse, LoginRequest, LoginResponse, MessageResponse},
    state::{AuthState, VerifierState},
};

pub mod health;
pub mod keys;
pub mod login;
pub mod products;

/// Router of the auth service (token issuer).
pub fn auth_router(state: AuthState) -> Router {
    let api = Router::new()
        .route("/api/login", post(login::login))
        .route("/api/public-key", get(keys::public_key))
        .route("/health", get(health::health))
        .with_state(state);

    with_request_pipeline(
        api.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", AuthApiDoc::openapi())),
    )
}

/// Router of the product service (token verifier).
///
/// Only the `/api/products/private` and `/api/products/{id}` group runs the
/// authentication stage; health and the public listing stay open.
pub fn product_router(state: VerifierState) -> Router {
    let verifier: Arc<TokenVerifier> = state.verifier;

    let protected = Router::new()
        .route("/api/products/private", get(products::private_products))
        .route("/api/products/{id}", delete(products::delete_product))
        .route_layer(from_fn_with_state(verifier, authenticate));

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/products/public", get(products::public_products));

    with_request_pipeline(
        public
            .merge(protected)
            .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ProductApiDoc::openapi())),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(login::login, keys::public_key, health::health),
    components(schemas(LoginRequest, LoginResponse, HealthResponse, ErrorBody)),
    tags(
        (name = "Auth", description = "Login and public key distribution"),
        (name = "Health", description = "Liveness")
    )
)]
struct AuthApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        products::public_products,
        products::private_products,
        products::delete_product,
        health::health
    ),
    components(schemas(MessageResponse, HealthResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "Products", description = "Product catalogue"),
        (name = "Health", description = "Liveness")
    )
)]
struct ProductApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
