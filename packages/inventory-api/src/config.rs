//! Server configuration (CLI flags with environment fallbacks)

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use inventory_storage::{Result, StorageConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-api", version, about = "Serve asset inventory queries over HTTP")]
pub struct ServerConfig {
    /// Existing SQLite inventory database
    #[arg(long, env = "INVENTORY_DATABASE", default_value = "assets.db")]
    pub database: PathBuf,

    #[arg(long, env = "INVENTORY_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// YAML file with connection pragmas and signature scheme
    #[arg(long, env = "INVENTORY_STORAGE_CONFIG")]
    pub storage_config: Option<PathBuf>,

    /// Storage calls running past this are cancelled
    #[arg(long, env = "INVENTORY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// CORS origins; any origin when none are given
    #[arg(
        long = "allowed-origin",
        env = "INVENTORY_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn storage(&self) -> Result<StorageConfig> {
        match &self.storage_config {
            Some(path) => StorageConfig::from_yaml(path),
            None => Ok(StorageConfig::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
