use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::store::ShiftStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Location of the flat data file. Explicit configuration rather than a path
/// derived from the executable, so tests can point the store at a temp dir.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
    pub data_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    pub show_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Config {
    /// Load configuration from the default "config" file (if present),
    /// environment and built-in defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SHIFTD").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.data_file", "shifts.csv")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // Bare PORT wins over everything, for parity with older deployments
        if let Ok(port) = std::env::var("PORT") {
            cfg.server.port = port
                .parse()
                .map_err(|e| config::ConfigError::Message(format!("Invalid PORT value: {e}")))?;
        }

        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Full path to the shift data file
    pub fn data_file_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.data_file)
    }
}

/// Shared application state handed to every request handler
pub struct AppState {
    pub config: Config,
    pub store: ShiftStore,
    /// Serializes every read-mutate-write sequence; without it two
    /// concurrent writers race and the second overwrite loses the first.
    pub store_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: ShiftStore::new(config.data_file_path()),
            config: config.clone(),
            store_lock: Mutex::new(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_file_path_joins_dir_and_file() {
        let cfg = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                workers: None,
            },
            storage: StorageConfig {
                data_dir: "data".to_string(),
                data_file: "shifts.csv".to_string(),
            },
            logging: LoggingConfig {
                access_log: false,
                show_headers: false,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
        };

        assert_eq!(cfg.data_file_path(), Path::new("data").join("shifts.csv"));
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3001);
    }
}
