// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Panic containment for request handlers.
//!
//! `tower_http::catch_panic` installs the unwind boundary; this module turns
//! the caught payload into a log record and a generic `500`. The backtrace of
//! the panic site is logged by the process panic hook (see `telemetry`).

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Body message of every contained fault. Carries no internal detail.
pub const PANIC_RESPONSE_MESSAGE: &str = "Internal Server Error";

/// `ResponseForPanic` handler for `CatchPanicLayer::custom`.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = %panic_message(payload.as_ref()), "Request handler panicked");
    ApiError::internal(PANIC_RESPONSE_MESSAGE).into_response()
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn extracts_str_and_string_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(s.as_ref()), "static message");

        let owned: Box<dyn Any + Send> = Box::new(format!("formatted {}", 42));
        assert_eq!(panic_message(owned.as_ref()), "formatted 42");

        let other: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let response = panic_response(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(PANIC_RESPONSE_MESSAGE));
        assert!(!body.contains("secret detail"));
    }
}
