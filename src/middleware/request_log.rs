// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One structured log line per request.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

/// Message of the per-request log event.
pub const REQUEST_LOG_MESSAGE: &str = "request processed";

/// Logs method, path, caller, status and latency once the inner stack has
/// produced a response. Panics are already converted to `500` further in,
/// so every request that completes is logged exactly once.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    let response = next.run(request).await;

    let status = response.status();
    let status_code = status.as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, %path, %remote_addr, status_code, latency_ms, %request_id, "{}", REQUEST_LOG_MESSAGE);
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, %remote_addr, status_code, latency_ms, %request_id, "{}", REQUEST_LOG_MESSAGE);
    } else {
        tracing::info!(%method, %path, %remote_addr, status_code, latency_ms, %request_id, "{}", REQUEST_LOG_MESSAGE);
    }

    response
}
