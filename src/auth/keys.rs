// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA key material for signing and verifying tokens.
//!
//! ## Sources
//!
//! - The issuer loads its private and public key from local PEM files.
//! - Verifiers fetch the public key once at startup from the issuer's
//!   `GET /api/public-key` endpoint and keep it for the process lifetime.
//!
//! There is no caching to disk, no retry and no refresh. A failure here is
//! fatal: a service must not accept traffic without trusted key material.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{DecodingKey, EncodingKey};
use url::Url;

use super::error::KeyError;

/// Content type used when serving and fetching the public key.
pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// Timeout for the one-time public key fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const PRIVATE_KEY_TAGS: &[&str] = &["RSA PRIVATE KEY", "PRIVATE KEY"];
const PUBLIC_KEY_TAGS: &[&str] = &["RSA PUBLIC KEY", "PUBLIC KEY"];

/// Where a key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    File(PathBuf),
    Remote(Url),
}

impl KeySource {
    /// `http://` and `https://` values (any case) are remote; anything else is a path.
    pub fn parse(value: &str) -> Result<Self, KeyError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(KeyError::Load("key source is empty".to_string()));
        }
        let scheme = value.split_once("://").map(|(scheme, _)| scheme);
        if scheme.is_some_and(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https")) {
            let url = Url::parse(value)
                .map_err(|e| KeyError::Load(format!("invalid key URL {value}: {e}")))?;
            Ok(KeySource::Remote(url))
        } else {
            Ok(KeySource::File(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::File(path) => write!(f, "{}", path.display()),
            KeySource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Private signing key. Only ever held by the issuer.
#[derive(Clone)]
pub struct PrivateKey {
    encoding: EncodingKey,
}

impl PrivateKey {
    pub fn from_pem(bytes: &[u8]) -> Result<Self, KeyError> {
        check_pem_tag(bytes, PRIVATE_KEY_TAGS)?;
        let encoding = EncodingKey::from_rsa_pem(bytes)
            .map_err(|e| KeyError::Load(format!("invalid RSA private key: {e}")))?;
        Ok(Self { encoding })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// Public verification key together with its PEM text.
///
/// The PEM is kept so the issuer can serve exactly what it loaded.
#[derive(Clone)]
pub struct PublicKey {
    decoding: DecodingKey,
    pem: Arc<str>,
}

impl PublicKey {
    pub fn from_pem(bytes: &[u8]) -> Result<Self, KeyError> {
        check_pem_tag(bytes, PUBLIC_KEY_TAGS)?;
        let decoding = DecodingKey::from_rsa_pem(bytes)
            .map_err(|e| KeyError::Load(format!("invalid RSA public key: {e}")))?;
        let pem = std::str::from_utf8(bytes)
            .map_err(|_| KeyError::Load("public key PEM is not valid UTF-8".to_string()))?;
        Ok(Self {
            decoding,
            pem: Arc::from(pem),
        })
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey").finish_non_exhaustive()
    }
}

/// Rejects anything that is not a PEM block with one of the expected tags.
fn check_pem_tag(bytes: &[u8], allowed: &[&str]) -> Result<(), KeyError> {
    let block = pem::parse(bytes).map_err(|e| KeyError::Load(format!("not a PEM document: {e}")))?;
    if allowed.contains(&block.tag()) {
        Ok(())
    } else {
        Err(KeyError::Load(format!(
            "unexpected PEM block `{}` (expected one of: {})",
            block.tag(),
            allowed.join(", ")
        )))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, KeyError> {
    std::fs::read(path).map_err(|e| KeyError::Load(format!("failed to read {}: {e}", path.display())))
}

/// Load the issuer's private key. Private keys never come from the network.
pub fn load_private_key(source: &KeySource) -> Result<PrivateKey, KeyError> {
    match source {
        KeySource::File(path) => {
            let key = PrivateKey::from_pem(&read_file(path)?)?;
            tracing::info!(path = %path.display(), "Loaded private signing key");
            Ok(key)
        }
        KeySource::Remote(url) => Err(KeyError::Load(format!(
            "private keys are only loaded from local storage, refusing {url}"
        ))),
    }
}

/// Load a public key from disk or fetch it from the issuer.
pub async fn load_public_key(source: &KeySource) -> Result<PublicKey, KeyError> {
    match source {
        KeySource::File(path) => {
            let key = PublicKey::from_pem(&read_file(path)?)?;
            tracing::info!(path = %path.display(), "Loaded public verification key");
            Ok(key)
        }
        KeySource::Remote(url) => fetch_public_key(url).await,
    }
}

/// Fetch the public key from a remote endpoint. Single attempt.
pub async fn fetch_public_key(url: &Url) -> Result<PublicKey, KeyError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| KeyError::Fetch(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| KeyError::Fetch(format!("request to {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(KeyError::Fetch(format!(
            "HTTP {} from public key endpoint {url}",
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if content_type.as_deref() != Some(PEM_CONTENT_TYPE) {
        tracing::warn!(%url, content_type = ?content_type, "Unexpected content type for public key");
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| KeyError::Fetch(format!("failed to read body from {url}: {e}")))?;

    let key = PublicKey::from_pem(&body).map_err(|e| KeyError::Fetch(e.to_string()))?;
    tracing::info!(%url, "Fetched and parsed public key");
    Ok(key)
}

/// The issuer's key pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl KeyPair {
    /// Load both keys from local storage.
    ///
    /// Correspondence of the two halves is checked by the issuer at
    /// construction, see `TokenIssuer::new`.
    pub fn load(private: &KeySource, public: &KeySource) -> Result<Self, KeyError> {
        let private = load_private_key(private)?;
        let public = match public {
            KeySource::File(path) => PublicKey::from_pem(&read_file(path)?)?,
            KeySource::Remote(url) => {
                return Err(KeyError::Load(format!(
                    "the issuer's public key must be local, refusing {url}"
                )))
            }
        };
        Ok(Self { private, public })
    }
}
