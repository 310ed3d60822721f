// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Token Service - signed identity tokens for independent services
//!
//! One service (the issuer) holds an RSA private key and mints access tokens
//! at login. Other services (verifiers) fetch the matching public key once at
//! startup and verify tokens locally, without calling back to the issuer.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router assembly (Axum)
//! - `auth` - Key material, token issuance/verification, authentication and roles
//! - `middleware` - Request pipeline: request logging and panic isolation
//! - `config` - Startup configuration from the environment
//! - `telemetry` - Tracing subscriber and panic hook

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;
