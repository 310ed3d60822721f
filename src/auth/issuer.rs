// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, Header};

use super::error::{IssueError, KeyError};
use super::keys::{KeyPair, PrivateKey};
use super::verifier::{TokenVerifier, VerifierConfig};
use super::Claims;
use crate::config::JwtConfig;

/// Signing algorithm used by every issuer instance.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Mints signed access tokens. The only writer of tokens.
///
/// Holds the private key and a verifier over the matching public key so a
/// freshly minted token can be checked with exactly the logic remote
/// verifiers use. Stateless and safe to share across requests.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    private_key: PrivateKey,
    issuer: String,
    lifetime: Duration,
    verifier: TokenVerifier,
}

impl TokenIssuer {
    /// Build an issuer and prove the key pair halves belong together.
    pub fn new(keys: KeyPair, config: &JwtConfig) -> Result<Self, KeyError> {
        let verifier = TokenVerifier::new(
            keys.public,
            VerifierConfig {
                leeway: config.leeway,
                expected_issuer: Some(config.issuer.clone()),
            },
        );
        let issuer = Self {
            private_key: keys.private,
            issuer: config.issuer.clone(),
            lifetime: config.access_token_lifetime,
            verifier,
        };

        let probe = issuer
            .issue("key-pair-probe", &[])
            .map_err(|e| KeyError::Load(e.to_string()))?;
        issuer.verifier.verify(&probe).map_err(|e| {
            KeyError::Load(format!("private and public keys do not correspond: {e}"))
        })?;

        Ok(issuer)
    }

    /// Issue a token for `subject` with `roles`, valid from now.
    pub fn issue(&self, subject: &str, roles: &[String]) -> Result<String, IssueError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        if subject.is_empty() {
            return Err(IssueError::EmptySubject);
        }

        let issued_at = now.timestamp();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            subject: subject.to_string(),
            roles: roles.to_vec(),
            issuer: self.issuer.clone(),
            issued_at,
            not_before: issued_at,
            expires_at: issued_at.saturating_add(lifetime),
        };

        encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            self.private_key.encoding_key(),
        )
        .map_err(|e| IssueError::Signing(e.to_string()))
    }

    /// Verifier over this issuer's own public key.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
