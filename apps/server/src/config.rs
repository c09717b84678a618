//! Server configuration.

use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// JSON task document path, used when the database is unreachable.
    pub tasks_file: PathBuf,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, with defaults for
    /// every setting.
    pub fn from_env() -> Self {
        Self {
            host: env::var("TASKTRACK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TASKTRACK_PORT")
                .unwrap_or_else(|_| "8321".to_string())
                .parse()
                .unwrap_or(8321),
            db_path: env::var("TASKTRACK_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/tasktrack.db")),
            tasks_file: env::var("TASKTRACK_TASKS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/tasks.json")),
            log_level: env::var("TASKTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
