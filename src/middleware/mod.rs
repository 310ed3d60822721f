// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Pipeline
//!
//! Every router is wrapped in the same ordered stack, outermost first:
//!
//! 1. request id - assign `x-request-id` and echo it on the response
//! 2. [`request_log::log_request`] - timing and outcome, one line per request
//! 3. panic isolation - `CatchPanicLayer` with [`recovery::panic_response`]
//! 4. routes; protected groups add [`crate::auth::authenticate`] as a
//!    `route_layer`
//!
//! Logging wraps panic isolation so a panicking request is still logged with
//! its `500`, and panic isolation wraps authentication so a fault on the
//! verification path cannot take down the listener.

pub mod recovery;
pub mod request_log;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

pub use recovery::panic_response;
pub use request_log::log_request;

/// Wrap `router` in the request pipeline.
pub fn with_request_pipeline(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(axum::middleware::from_fn(log_request))
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Captures JSON log output for assertions.

    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        /// Install a JSON subscriber writing into this buffer for the
        /// current thread until the guard is dropped.
        pub fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(self.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        pub fn events(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect()
        }

        /// Events whose message equals `message`.
        pub fn events_with_message(&self, message: &str) -> Vec<serde_json::Value> {
            self.events()
                .into_iter()
                .filter(|e| e["fields"]["message"] == message)
                .collect()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
