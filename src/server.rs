// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup sequences for both services.
//!
//! Each sequence loads key material first and only then binds the listener,
//! so no connection is accepted before the service can verify tokens.

use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::{
    api,
    auth::{keys, KeyError, KeyPair, TokenIssuer, TokenVerifier, VerifierConfig},
    config::{AppConfig, ConfigError},
    state::{AuthState, VerifierState},
    store::InMemoryUserStore,
};

/// Fatal initialization error reported by `main`.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the issuer key pair and build the auth service state.
pub fn build_auth_state(config: &AppConfig) -> Result<AuthState, StartupError> {
    let keys = KeyPair::load(&config.jwt.private_key, &config.jwt.public_key)?;
    let issuer = TokenIssuer::new(keys, &config.jwt)?;
    let users = InMemoryUserStore::with_demo_users();
    tracing::info!(
        issuer = %config.jwt.issuer,
        lifetime_secs = issuer.lifetime().as_secs(),
        users = users.len(),
        "Token issuer ready"
    );
    Ok(AuthState::new(issuer, users))
}

/// Fetch (or read) the trusted public key and build the verifier state.
pub async fn build_verifier_state(config: &AppConfig) -> Result<VerifierState, StartupError> {
    let key = keys::load_public_key(&config.jwt.public_key_url).await?;
    let verifier = TokenVerifier::new(key, VerifierConfig::from(&config.jwt));
    tracing::info!(
        source = %config.jwt.public_key_url,
        leeway_secs = config.jwt.leeway,
        "Token verifier ready"
    );
    Ok(VerifierState::new(verifier))
}

pub async fn run_auth_service(config: AppConfig) -> Result<(), StartupError> {
    let state = build_auth_state(&config)?;
    serve(api::auth_router(state), config.server.bind_addr(), "auth-service").await
}

pub async fn run_product_service(config: AppConfig) -> Result<(), StartupError> {
    let state = build_verifier_state(&config).await?;
    serve(api::product_router(state), config.server.bind_addr(), "product-service").await
}

/// Bind and serve until Ctrl-C.
pub async fn serve(app: Router, addr: SocketAddr, name: &str) -> Result<(), StartupError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(service = name, %addr, "Listening (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!(service = name, "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::fixtures;
    use crate::config::Service;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config_with(vars: Vec<(&'static str, String)>) -> AppConfig {
        AppConfig::from_lookup(Service::Auth, move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn auth_state_builds_from_key_files() {
        let private = write_temp(fixtures::PRIVATE_PEM);
        let public = write_temp(fixtures::PUBLIC_PEM);
        let config = config_with(vec![
            ("JWT_PRIVATE_KEY_FILE", private.path().display().to_string()),
            ("JWT_PUBLIC_KEY_FILE", public.path().display().to_string()),
        ]);

        let state = build_auth_state(&config).unwrap();
        let token = state.issuer.issue("admin", &[]).unwrap();
        assert!(state.issuer.verifier().verify(&token).is_ok());
    }

    #[test]
    fn mismatched_key_files_fail_startup() {
        let private = write_temp(fixtures::PRIVATE_PEM);
        let public = write_temp(fixtures::OTHER_PUBLIC_PEM);
        let config = config_with(vec![
            ("JWT_PRIVATE_KEY_FILE", private.path().display().to_string()),
            ("JWT_PUBLIC_KEY_FILE", public.path().display().to_string()),
        ]);

        assert!(matches!(
            build_auth_state(&config),
            Err(StartupError::Key(KeyError::Load(_)))
        ));
    }

    #[test]
    fn missing_key_file_fails_startup() {
        let config = config_with(vec![(
            "JWT_PRIVATE_KEY_FILE",
            "/nonexistent/private.pem".to_string(),
        )]);
        assert!(matches!(
            build_auth_state(&config),
            Err(StartupError::Key(KeyError::Load(_)))
        ));
    }

    #[tokio::test]
    async fn verifier_state_can_use_a_local_public_key() {
        let public = write_temp(fixtures::PUBLIC_PEM);
        let config = config_with(vec![(
            "JWT_AUTH_SERVICE_PUBLIC_KEY_URL",
            public.path().display().to_string(),
        )]);
        let state = build_verifier_state(&config).await.unwrap();
        assert_eq!(state.verifier.public_key().pem(), fixtures::PUBLIC_PEM);
    }

    #[tokio::test]
    async fn unreachable_key_server_fails_startup() {
        let config = config_with(vec![(
            "JWT_AUTH_SERVICE_PUBLIC_KEY_URL",
            "http://127.0.0.1:9/api/public-key".to_string(),
        )]);
        assert!(matches!(
            build_verifier_state(&config).await,
            Err(StartupError::Key(KeyError::Fetch(_)))
        ));
    }
}
