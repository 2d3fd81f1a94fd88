use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub port: u16,

    // Storage; in-memory when unset
    pub database_url: Option<String>,

    // Source catalog
    pub catalog_url: String,
    pub catalog_timeout: Duration,
    pub source_link_base: String,

    // Templates
    pub templates_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            bind_address: or("BIND_ADDRESS", "0.0.0.0"),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),

            catalog_url: or("CATALOG_URL", "https://kabbalahmedia.info/backend/sqdata"),
            catalog_timeout: Duration::from_secs(
                lookup("CATALOG_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
            ),
            source_link_base: or("SOURCE_LINK_BASE", "https://kabbalahmedia.info/sources"),

            templates_path: or("TEMPLATES_PATH", "./templates.json"),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_address, self.port);
        addr.parse()
            .with_context(|| format!("Invalid bind address {}", addr))
    }
}
