// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment in `main` and passed by
//! value into the key provider, issuer, verifier and server constructors.
//! Nothing reads the environment during request handling.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` (auth), `8081` (product) |
//! | `JWT_ISSUER` | `iss` claim written into issued tokens | `auth-service` |
//! | `JWT_ACCESS_TOKEN_MINUTES` | Access token lifetime in minutes | `15` |
//! | `JWT_LEEWAY_SECONDS` | Clock skew tolerance for verification | `0` |
//! | `JWT_EXPECTED_ISSUER` | Required `iss` claim on verified tokens | Optional |
//! | `JWT_PRIVATE_KEY_FILE` | Issuer private key (PEM) | `keys/private.pem` |
//! | `JWT_PUBLIC_KEY_FILE` | Issuer public key (PEM) | `keys/public.pem` |
//! | `JWT_AUTH_SERVICE_PUBLIC_KEY_URL` | Where verifiers fetch the public key | `http://localhost:8080/api/public-key` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! A missing variable falls back to its default. A variable that is present
//! but cannot be parsed is a startup error.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::keys::KeySource;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_ACCESS_TOKEN_MINUTES_ENV: &str = "JWT_ACCESS_TOKEN_MINUTES";
pub const JWT_LEEWAY_SECONDS_ENV: &str = "JWT_LEEWAY_SECONDS";
pub const JWT_EXPECTED_ISSUER_ENV: &str = "JWT_EXPECTED_ISSUER";
pub const JWT_PRIVATE_KEY_FILE_ENV: &str = "JWT_PRIVATE_KEY_FILE";
pub const JWT_PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";
pub const JWT_PUBLIC_KEY_URL_ENV: &str = "JWT_AUTH_SERVICE_PUBLIC_KEY_URL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_ISSUER: &str = "auth-service";
const DEFAULT_ACCESS_TOKEN_MINUTES: u64 = 15;
const DEFAULT_PRIVATE_KEY_FILE: &str = "keys/private.pem";
const DEFAULT_PUBLIC_KEY_FILE: &str = "keys/public.pem";
const DEFAULT_PUBLIC_KEY_URL: &str = "http://localhost:8080/api/public-key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which binary is being configured. Only the default port differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Product,
}

impl Service {
    fn default_port(self) -> u16 {
        match self {
            Service::Auth => 8080,
            Service::Product => 8081,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Token settings shared by the issuer and verifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub issuer: String,
    pub access_token_lifetime: Duration,
    /// Clock skew tolerance in seconds, applied to both `nbf` and `exp`.
    pub leeway: u64,
    pub expected_issuer: Option<String>,
    pub private_key: KeySource,
    pub public_key: KeySource,
    pub public_key_url: KeySource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env(service: Service) -> Result<Self, ConfigError> {
        Self::from_lookup(service, |name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(service: Service, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, HOST_ENV, || DEFAULT_HOST)?;
        let port = parse_or(&lookup, PORT_ENV, || service.default_port())?;

        let minutes: u64 = parse_or(&lookup, JWT_ACCESS_TOKEN_MINUTES_ENV, || {
            DEFAULT_ACCESS_TOKEN_MINUTES
        })?;
        if minutes == 0 {
            return Err(ConfigError::Invalid {
                name: JWT_ACCESS_TOKEN_MINUTES_ENV,
                value: minutes.to_string(),
                reason: "lifetime must be at least one minute".to_string(),
            });
        }
        let lifetime_secs = minutes.checked_mul(60).ok_or_else(|| ConfigError::Invalid {
            name: JWT_ACCESS_TOKEN_MINUTES_ENV,
            value: minutes.to_string(),
            reason: "lifetime is too large".to_string(),
        })?;

        let jwt = JwtConfig {
            issuer: non_empty(&lookup, JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            access_token_lifetime: Duration::from_secs(lifetime_secs),
            leeway: parse_or(&lookup, JWT_LEEWAY_SECONDS_ENV, || 0)?,
            expected_issuer: non_empty(&lookup, JWT_EXPECTED_ISSUER_ENV),
            private_key: key_source_or(&lookup, JWT_PRIVATE_KEY_FILE_ENV, DEFAULT_PRIVATE_KEY_FILE)?,
            public_key: key_source_or(&lookup, JWT_PUBLIC_KEY_FILE_ENV, DEFAULT_PUBLIC_KEY_FILE)?,
            public_key_url: key_source_or(&lookup, JWT_PUBLIC_KEY_URL_ENV, DEFAULT_PUBLIC_KEY_URL)?,
        };

        Ok(Self {
            server: ServerConfig { host, port },
            jwt,
            log_format: parse_or(&lookup, LOG_FORMAT_ENV, LogFormat::default)?,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T, D>(lookup: &F, name: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> T,
{
    match non_empty(lookup, name) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default()),
    }
}

fn key_source_or<F>(lookup: &F, name: &'static str, default: &str) -> Result<KeySource, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = non_empty(lookup, name).unwrap_or_else(|| default.to_string());
    KeySource::parse(&value).map_err(|e| ConfigError::Invalid {
        name,
        value,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(Service::Auth, lookup(&[])).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.jwt.issuer, "auth-service");
        assert_eq!(config.jwt.access_token_lifetime, Duration::from_secs(15 * 60));
        assert_eq!(config.jwt.leeway, 0);
        assert_eq!(config.jwt.expected_issuer, None);
        assert_eq!(
            config.jwt.private_key,
            KeySource::File(PathBuf::from("keys/private.pem"))
        );
        assert!(matches!(config.jwt.public_key_url, KeySource::Remote(_)));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn product_service_defaults_to_8081() {
        let config = AppConfig::from_lookup(Service::Product, lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(
            Service::Auth,
            lookup(&[
                ("PORT", "9000"),
                ("JWT_ISSUER", "login.example"),
                ("JWT_ACCESS_TOKEN_MINUTES", "5"),
                ("JWT_LEEWAY_SECONDS", "30"),
                ("JWT_EXPECTED_ISSUER", "login.example"),
                ("LOG_FORMAT", "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.jwt.issuer, "login.example");
        assert_eq!(config.jwt.access_token_lifetime, Duration::from_secs(300));
        assert_eq!(config.jwt.leeway, 30);
        assert_eq!(config.jwt.expected_issuer.as_deref(), Some("login.example"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn unparsable_port_is_an_error() {
        let err = AppConfig::from_lookup(Service::Auth, lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        let err = AppConfig::from_lookup(
            Service::Auth,
            lookup(&[("JWT_ACCESS_TOKEN_MINUTES", "0")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "JWT_ACCESS_TOKEN_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn overflowing_lifetime_is_rejected() {
        let minutes = u64::MAX.to_string();
        let err = AppConfig::from_lookup(
            Service::Auth,
            lookup(&[("JWT_ACCESS_TOKEN_MINUTES", minutes.as_str())]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "JWT_ACCESS_TOKEN_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(Service::Auth, lookup(&[("JWT_ISSUER", "  ")])).unwrap();
        assert_eq!(config.jwt.issuer, "auth-service");
    }
}
