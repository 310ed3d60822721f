// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-based authorization.
//!
//! Roles are opaque strings issued at login. A check is a plain membership
//! test on the verified claims; there is no hierarchy.

use super::{AuthError, Claims};

/// Role required by administrative endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// Role granted to every regular account.
pub const USER_ROLE: &str = "user";

/// Allow the request if `claims` carry `role`, otherwise `403`.
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AuthError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        tracing::warn!(user_id = %claims.subject, required_role = role, "Role check denied");
        Err(AuthError::Forbidden(role.to_string()))
    }
}
