use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

/// Where purchase-request attachments live and how they are addressed.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding attachment objects.
    pub root: PathBuf,
    /// URL prefix under which `root` is served; stored in `file_url`.
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `3000`                         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `STORAGE_ROOT`         | `storage/attachments`          |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000/files`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let root = std::env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storage/attachments"));
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".into());
        Self {
            root,
            public_base_url,
        }
    }
}
