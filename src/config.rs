// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SALT` | Secret salt for credential and token digests | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the digest salt.
///
/// The salt keys every credential digest and token digest; rotating it
/// invalidates all stored passwords and all outstanding tokens.
pub const TOKEN_SALT_ENV: &str = "TOKEN_SALT";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{TOKEN_SALT_ENV} must be set to a non-empty secret")]
    MissingSalt,

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Process-wide configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root directory for the embedded database file.
    pub data_dir: PathBuf,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Secret salt for credential and token digests. Never a literal in
    /// code; sourced from the environment (or injected directly in tests).
    pub token_salt: String,
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_salt = env::var(TOKEN_SALT_ENV)
            .ok()
            .filter(|salt| !salt.is_empty())
            .ok_or(ConfigError::MissingSalt)?;

        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw))?;

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            host,
            port,
            token_salt,
        })
    }

    /// Path of the embedded database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("ledger.redb")
    }
}
