//! HTTP server settings loaded from the environment.

use std::net::SocketAddr;

use crate::errors::{Error, Result};

/// Bind settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address and port the server listens on.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Reads `BIND_ADDR` (default `0.0.0.0:8000`).
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = raw.parse().map_err(|_| Error::Config {
            message: format!("BIND_ADDR is not a valid socket address: '{raw}'"),
        })?;
        Ok(Self { bind_addr })
    }
}
