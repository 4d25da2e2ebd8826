// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from them at startup. A `.env` file in the working
//! directory is honoured when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `API_SECRET` | HMAC secret used to sign and verify bearer tokens | none |
//! | `TOKEN_TTL_SECONDS` | Lifetime of an issued token (1 to 31536000) | `3600` |
//! | `BCRYPT_COST` | Work factor for password hashing | `12` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the token signing secret.
///
/// The server starts without it, but every login and every authenticated
/// request fails with 500 until it is configured.
pub const API_SECRET_ENV: &str = "API_SECRET";

pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECONDS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Tokens expire one hour after issuance unless configured otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process-wide configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_secret: Option<String>,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_secret: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup(HOST_ENV).unwrap_or(defaults.host);
        let port = parse_var(&lookup, PORT_ENV, "a port number")?.unwrap_or(defaults.port);

        // An empty secret is as good as none.
        let api_secret = lookup(API_SECRET_ENV).filter(|secret| !secret.is_empty());

        const TTL_EXPECTED: &str = "a number of seconds between 1 and 31536000";
        let token_ttl = match parse_var::<u64, _>(&lookup, TOKEN_TTL_ENV, TTL_EXPECTED)? {
            None => defaults.token_ttl,
            Some(secs) if (1..=MAX_TOKEN_TTL_SECONDS).contains(&secs) => Duration::from_secs(secs),
            Some(secs) => {
                return Err(ConfigError::InvalidValue {
                    name: TOKEN_TTL_ENV,
                    expected: TTL_EXPECTED,
                    value: secs.to_string(),
                })
            }
        };

        let bcrypt_cost = parse_var(&lookup, BCRYPT_COST_ENV, "an integer between 4 and 31")?
            .unwrap_or(defaults.bcrypt_cost);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: BCRYPT_COST_ENV,
                expected: "an integer between 4 and 31",
                value: bcrypt_cost.to_string(),
            });
        }

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None => defaults.log_format,
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(value) if value.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(value) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    expected: "`json` or `pretty`",
                    value: value.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            api_secret,
            token_ttl,
            bcrypt_cost,
            log_format,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name,
                expected,
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.api_secret.is_none());
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("API_SECRET", "s3cr3t"),
            ("TOKEN_TTL_SECONDS", "60"),
            ("BCRYPT_COST", "4"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:9000");
        assert_eq!(config.api_secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn empty_secret_counts_as_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_SECRET", "")])).unwrap();
        assert!(config.api_secret.is_none());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { name: "PORT", .. })));

        let result = AppConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "2")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { name: "BCRYPT_COST", .. })));
    }

    #[test]
    fn token_ttl_must_be_positive_and_bounded() {
        for value in ["0", "31536001", "9223372036854775807", "18446744073709551615"] {
            let result = AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_SECONDS", value)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { name: "TOKEN_TTL_SECONDS", .. })),
                "{value} should be rejected"
            );
        }

        let config =
            AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_SECONDS", "31536000")])).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(MAX_TOKEN_TTL_SECONDS));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AppConfig {
            api_secret: Some("do-not-print".to_string()),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("do-not-print"));
        assert!(rendered.contains("<redacted>"));
    }
}
