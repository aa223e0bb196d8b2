// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup. A missing
//! node URL or relayer key is fatal.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NODE_RPC_URL` | JSON-RPC endpoint (`INFURA_RPC_URL` accepted as fallback) | Required |
//! | `RELAYER_PRIVATE_KEY` | Relayer key, hex | Required unless `RELAYER_PRIVATE_KEY_PATH` |
//! | `RELAYER_PRIVATE_KEY_PATH` | Relayer key, PEM file | Optional |
//! | `ERC20_CONTRACT_ADDRESS` | Token used for `erc20` relays | Optional |
//! | `ERC721_CONTRACT_ADDRESS` | Collection used for `erc721` relays | Optional |
//! | `EXPLORER_API_URL` | Etherscan-compatible API base | `https://api-sepolia.etherscan.io/api` |
//! | `EXPLORER_API_KEY` | Explorer API key | empty |
//! | `UPSTREAM_TIMEOUT_SECS` | Timeout for node and explorer calls | `10` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS when both are set | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::blockchain::TokenContracts;

pub const NODE_RPC_URL_ENV: &str = "NODE_RPC_URL";
pub const LEGACY_NODE_RPC_URL_ENV: &str = "INFURA_RPC_URL";
pub const RELAYER_PRIVATE_KEY_ENV: &str = "RELAYER_PRIVATE_KEY";
/// Name used by earlier deployments for the relayer key.
pub const LEGACY_PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const RELAYER_PRIVATE_KEY_PATH_ENV: &str = "RELAYER_PRIVATE_KEY_PATH";
pub const ERC20_CONTRACT_ENV: &str = "ERC20_CONTRACT_ADDRESS";
pub const ERC721_CONTRACT_ENV: &str = "ERC721_CONTRACT_ADDRESS";
pub const EXPLORER_API_URL_ENV: &str = "EXPLORER_API_URL";
pub const EXPLORER_API_KEY_ENV: &str = "EXPLORER_API_KEY";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_EXPLORER_API_URL: &str = "https://api-sepolia.etherscan.io/api";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// A configuration value that must never appear in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Relayer key material as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayerKey {
    Hex(Secret),
    Pem(Secret),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Fully resolved process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub node_rpc_url: String,
    pub relayer_key: RelayerKey,
    pub tokens: TokenContracts,
    pub explorer_api_url: String,
    pub explorer_api_key: Secret,
    pub upstream_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let node_rpc_url = get(NODE_RPC_URL_ENV)
            .or_else(|| get(LEGACY_NODE_RPC_URL_ENV))
            .ok_or(ConfigError::Missing(NODE_RPC_URL_ENV))?;

        let relayer_key = if let Some(hex) =
            get(RELAYER_PRIVATE_KEY_ENV).or_else(|| get(LEGACY_PRIVATE_KEY_ENV))
        {
            RelayerKey::Hex(Secret::new(hex))
        } else if let Some(path) = get(RELAYER_PRIVATE_KEY_PATH_ENV) {
            let pem = std::fs::read_to_string(&path).map_err(|e| ConfigError::Invalid {
                var: RELAYER_PRIVATE_KEY_PATH_ENV,
                reason: format!("failed to read {path}: {e}"),
            })?;
            RelayerKey::Pem(Secret::new(pem))
        } else {
            return Err(ConfigError::Missing(RELAYER_PRIVATE_KEY_ENV));
        };

        let tokens = TokenContracts {
            erc20: parse_optional(ERC20_CONTRACT_ENV, get(ERC20_CONTRACT_ENV))?,
            erc721: parse_optional(ERC721_CONTRACT_ENV, get(ERC721_CONTRACT_ENV))?,
        };

        let timeout_secs = parse_optional::<u64>(UPSTREAM_TIMEOUT_ENV, get(UPSTREAM_TIMEOUT_ENV))?;
        let upstream_timeout = match timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    var: UPSTREAM_TIMEOUT_ENV,
                    reason: "must be at least 1 second".to_string(),
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        let port = parse_optional(PORT_ENV, get(PORT_ENV))?.unwrap_or(DEFAULT_PORT);

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            node_rpc_url,
            relayer_key,
            tokens,
            explorer_api_url: get(EXPLORER_API_URL_ENV)
                .unwrap_or_else(|| DEFAULT_EXPLORER_API_URL.to_string()),
            explorer_api_key: Secret::new(get(EXPLORER_API_KEY_ENV).unwrap_or_default()),
            upstream_timeout,
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            tls,
            log_format,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: HOST_ENV,
                reason: e.to_string(),
            })
    }
}

/// Log format requested by the environment, tolerating unset or bad values.
///
/// Used before the full configuration is loaded so that configuration
/// errors are themselves logged in the requested format.
pub fn log_format_from_env() -> LogFormat {
    match std::env::var(LOG_FORMAT_ENV).ok().as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_optional<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
    })
    .transpose()
}
