use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_DATABASE_URL, DEFAULT_DB_BUSY_TIMEOUT_MS,
    DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_HOST, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    DEFAULT_TOKEN_TTL_SECS, MAX_PAGE_SIZE, MIN_JWT_SECRET_LEN,
};
use crate::domain::search::PageLimits;

// =============================================================================
// Log Format Enum
// =============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON shape, every field optional)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub busy_timeout_ms: Option<u64>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub jwt_secret: Option<String>,
    pub admin_jwt_secret: Option<String>,
    pub token_ttl_secs: Option<u64>,
}

/// Search configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchFileConfig {
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub search: Option<SearchFileConfig>,
    pub log_format: Option<LogFormat>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// SQLite configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

/// Token verification configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub admin_jwt_secret: Option<String>,
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    /// Secret for admin tokens, falling back to the user secret
    pub fn admin_secret(&self) -> Option<&str> {
        self.admin_jwt_secret
            .as_deref()
            .or(self.jwt_secret.as_deref())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .field(
                "admin_jwt_secret",
                &self.admin_jwt_secret.as_ref().map(|_| "***"),
            )
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Pagination configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl SearchConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub search: SearchConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        let config = Self::layer(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            database = %config.database.url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(cli: &CliConfig, file: FileConfig) -> Self {
        let file_server = file.server.unwrap_or_default();
        let file_database = file.database.unwrap_or_default();
        let file_auth = file.auth.unwrap_or_default();
        let file_search = file.search.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            url: cli
                .database_url
                .clone()
                .or(file_database.url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: file_database
                .max_connections
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            busy_timeout_ms: file_database
                .busy_timeout_ms
                .unwrap_or(DEFAULT_DB_BUSY_TIMEOUT_MS),
        };

        let auth = AuthConfig {
            jwt_secret: cli.jwt_secret.clone().or(file_auth.jwt_secret),
            admin_jwt_secret: cli.admin_jwt_secret.clone().or(file_auth.admin_jwt_secret),
            token_ttl_secs: file_auth.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        };

        let search = SearchConfig {
            default_page_size: file_search.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: file_search.max_page_size.unwrap_or(MAX_PAGE_SIZE),
        };

        Self {
            server,
            database,
            auth,
            search,
            log_format: cli.log_format.or(file.log_format).unwrap_or_default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Configuration error: database.url must not be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }

        for (name, secret) in [
            ("auth.jwt_secret", &self.auth.jwt_secret),
            ("auth.admin_jwt_secret", &self.auth.admin_jwt_secret),
        ] {
            if let Some(secret) = secret
                && secret.len() < MIN_JWT_SECRET_LEN
            {
                anyhow::bail!(
                    "Configuration error: {} must be at least {} characters",
                    name,
                    MIN_JWT_SECRET_LEN
                );
            }
        }

        if self.auth.jwt_secret.is_none() {
            tracing::warn!("auth.jwt_secret is not set, authenticated routes will be unavailable");
        }

        if self.search.default_page_size == 0 || self.search.max_page_size == 0 {
            anyhow::bail!("Configuration error: search page sizes must be greater than 0");
        }

        if self.search.max_page_size > MAX_PAGE_SIZE {
            tracing::warn!(
                max_page_size = self.search.max_page_size,
                cap = MAX_PAGE_SIZE,
                "search.max_page_size exceeds the hard cap and will be lowered"
            );
        }

        Ok(())
    }
}
