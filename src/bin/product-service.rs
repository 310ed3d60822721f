// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product service: verifies tokens with a public key fetched at startup.

use std::process::ExitCode;

use relational_token_service::{
    config::{AppConfig, Service},
    server, telemetry,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env(Service::Product) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(config.log_format);

    match server::run_product_service(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Product service failed to start");
            ExitCode::FAILURE
        }
    }
}
