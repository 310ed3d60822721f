// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token verification against a trusted public key.
//!
//! ## Order of checks
//!
//! 1. Structure: three dot-separated parts with a decodable JSON header.
//! 2. Algorithm: the header `alg` must be in the RSA PKCS#1 v1.5 family.
//!    This runs before any signature work and never lets the header pick
//!    the key type, so `none` and HMAC tokens are rejected outright.
//! 3. Signature against the trusted public key.
//! 4. Claims and the validity window `[nbf, exp]`, inclusive, widened by
//!    the configured leeway.
//!
//! The verifier only needs the public key, so the issuer's self-check and a
//! remote service run exactly the same code.

use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde::Deserialize;

use super::error::TokenError;
use super::keys::PublicKey;
use super::Claims;
use crate::config::JwtConfig;

/// The only algorithms a verifier will consider.
pub const ALLOWED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Clock skew tolerance in seconds.
    pub leeway: u64,
    /// If set, `iss` must match exactly.
    pub expected_issuer: Option<String>,
}

impl From<&JwtConfig> for VerifierConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            leeway: config.leeway,
            expected_issuer: config.expected_issuer.clone(),
        }
    }
}

/// Only the field we inspect before handing the token to `jsonwebtoken`.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Verifies tokens with a read-only public key. Cheap to clone.
#[derive(Clone, Debug)]
pub struct TokenVerifier {
    key: PublicKey,
    config: VerifierConfig,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(key: PublicKey, config: VerifierConfig) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = ALLOWED_ALGORITHMS.to_vec();
        // The validity window is checked below against an explicit clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        if let Some(issuer) = &config.expected_issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key,
            config,
            validation,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let algorithm = declared_algorithm(token)?;
        if !ALLOWED_ALGORITHMS.contains(&algorithm) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{algorithm:?}")));
        }

        let claims = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => {
                    TokenError::UnsupportedAlgorithm(format!("{algorithm:?}"))
                }
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.subject.is_empty() {
            return Err(TokenError::Malformed);
        }

        let now = now.timestamp();
        let leeway = i64::try_from(self.config.leeway).unwrap_or(i64::MAX);
        if now.saturating_add(leeway) < claims.not_before {
            return Err(TokenError::NotYetValid);
        }
        if now.saturating_sub(leeway) > claims.expires_at {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Read the `alg` a token declares without trusting anything else in it.
fn declared_algorithm(token: &str) -> Result<Algorithm, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };
    if header.is_empty() || payload.is_empty() {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let raw: RawHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    Algorithm::from_str(&raw.alg).map_err(|_| TokenError::UnsupportedAlgorithm(raw.alg))
}
