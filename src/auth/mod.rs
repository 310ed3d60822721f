// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Asymmetric access tokens for the auth service and its verifiers.
//!
//! ## Auth Flow
//!
//! 1. The auth service loads its RSA key pair from disk at startup
//! 2. `POST /api/login` checks credentials and issues an RS256 token carrying
//!    `user_id`, `roles`, `iss`, `iat`, `nbf` and `exp`
//! 3. Verifiers fetch `GET /api/public-key` once before accepting traffic
//! 4. Protected routes:
//!    - Read `Authorization: Bearer <token>`
//!    - Verify algorithm, signature and validity window locally
//!    - Insert the claims into request extensions
//!    - Handlers check roles with [`require_role`]
//!
//! ## Security
//!
//! - Only RS256/RS384/RS512 are accepted; `none` and HMAC are rejected before
//!   signature verification
//! - The validity window is inclusive at both ends
//! - Tokens cannot be revoked; they expire at `exp`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod keys;
pub mod middleware;
pub mod roles;
pub mod verifier;

pub use claims::Claims;
pub use error::{AuthError, IssueError, KeyError, TokenError};
pub use extractor::Authenticated;
pub use issuer::TokenIssuer;
pub use keys::{KeyPair, KeySource, PrivateKey, PublicKey};
pub use middleware::authenticate;
pub use roles::require_role;
pub use verifier::{TokenVerifier, VerifierConfig};
