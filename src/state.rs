// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::store::InMemoryUserStore;

/// Shared state of the auth service. Read-only after startup.
#[derive(Clone)]
pub struct AuthState {
    pub issuer: Arc<TokenIssuer>,
    pub users: Arc<InMemoryUserStore>,
}

impl AuthState {
    pub fn new(issuer: TokenIssuer, users: InMemoryUserStore) -> Self {
        Self {
            issuer: Arc::new(issuer),
            users: Arc::new(users),
        }
    }
}

/// Shared state of a verifying service: just the verifier.
#[derive(Clone)]
pub struct VerifierState {
    pub verifier: Arc<TokenVerifier>,
}

impl VerifierState {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}
