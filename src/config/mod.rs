//! Application configuration management

use std::env;
use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

/// Port the server listens on when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// Bind address used when `HOST` is unset
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// SQLite database file used when `DATABASE_PATH` is unset
pub const DEFAULT_DATABASE_PATH: &str = "./mami_cafe.db";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Path to the SQLite database file (created if missing)
    pub database_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST")
                .unwrap_or_else(|_| DEFAULT_BIND_HOST.to_string())
                .parse()
                .context("Invalid HOST")?,

            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("Invalid PORT")?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
        })
    }

    /// Socket address for the HTTP listener
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
