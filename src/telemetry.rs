// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber and panic hook setup.

use std::backtrace::Backtrace;

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::middleware::recovery::panic_message;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber and the panic hook. Call once from `main`.
pub fn init(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    install_panic_hook();
}

/// Route panics through `tracing` with location and a backtrace of the
/// panicking thread. Request panics are then also contained by the
/// pipeline; this hook only records them.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let backtrace = Backtrace::force_capture();

        tracing::error!(
            panic = %message,
            %location,
            backtrace = %backtrace,
            "Panic"
        );
    }));
}
