// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims.

use serde::{Deserialize, Deserializer, Serialize};

/// Claims carried inside an access token.
///
/// Created once by the issuer and immutable afterwards. On the wire the
/// subject is `user_id` and the registered claims use their standard names
/// (`iss`, `iat`, `nbf`, `exp`). Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Canonical user identifier. Never empty on a verified token.
    #[serde(rename = "user_id")]
    pub subject: String,

    /// Role names in issuance order. May be empty; absent or `null` decode
    /// as no roles.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<String>,

    /// Issuing authority.
    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "iat")]
    pub issued_at: i64,

    #[serde(rename = "nbf")]
    pub not_before: i64,

    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Check whether the caller holds `role` (exact, case-sensitive match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
