// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product endpoints of the verifying service.
//!
//! Stand-ins for business handlers: one public, one for any authenticated
//! caller and one gated on the `admin` role.

use axum::{extract::Path, Json};

use crate::{
    auth::{require_role, roles::ADMIN_ROLE, AuthError, Authenticated},
    models::MessageResponse,
};

#[utoipa::path(
    get,
    path = "/api/products/public",
    tag = "Products",
    responses((status = 200, body = Vec<String>))
)]
pub async fn public_products() -> Json<Vec<String>> {
    Json(vec!["Book".to_string(), "Pen".to_string()])
}

#[utoipa::path(
    get,
    path = "/api/products/private",
    tag = "Products",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Vec<String>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn private_products(Authenticated(claims): Authenticated) -> Json<Vec<String>> {
    tracing::info!(user_id = %claims.subject, "Accessing private products");
    Json(vec![
        "Laptop (Private)".to_string(),
        "Monitor (Private)".to_string(),
    ])
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller lacks the admin role")
    )
)]
pub async fn delete_product(
    Authenticated(claims): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AuthError> {
    require_role(&claims, ADMIN_ROLE)?;

    tracing::info!(user_id = %claims.subject, product_id = %id, "Admin deleted a product");
    Ok(Json(MessageResponse {
        message: format!("Product {id} deleted by admin {}", claims.subject),
    }))
}
