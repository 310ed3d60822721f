// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth service: issues access tokens and publishes the public key.

use std::process::ExitCode;

use relational_token_service::{
    config::{AppConfig, Service},
    server, telemetry,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env(Service::Auth) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(config.log_format);

    match server::run_auth_service(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Auth service failed to start");
            ExitCode::FAILURE
        }
    }
}
