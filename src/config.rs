//! Configuration management for the HEASARC query client
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, the `HEASARC_SERVER` environment variable and command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use humantime_serde::re::humantime::format_duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::{parse_server_url, ClientConfig};
use crate::constants::{config as paths, env, heasarc, http, limits, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
///
/// Durations are written in human-readable form, e.g. `"30s"` or `"1m 30s"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// W3Browse batch endpoint
    pub server: String,
    /// Whole-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connection establishment timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// TCP keep-alive interval (absent = disabled)
    #[serde(with = "humantime_serde")]
    pub tcp_keepalive: Option<Duration>,
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout (absent = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_per_host: usize,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            server: heasarc::DEFAULT_SERVER.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            tcp_keepalive: Some(http::TCP_KEEPALIVE),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unusable server URL or a
    /// zero rate limit
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        let server = parse_server_url(&self.server).map_err(|e| ConfigError::InvalidValue {
            field: "client.server".to_string(),
            value: self.server.clone(),
            reason: e.to_string(),
        })?;

        if self.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be at least 1 request per second".to_string(),
            });
        }

        Ok(ClientConfig {
            server,
            tcp_keepalive: self.tcp_keepalive,
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            rate_limit_rps: self.rate_limit_rps,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, `HEASARC_CONFIG`, or a standard location)
    /// 3. `HEASARC_SERVER` environment variable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicitly named file is missing
    /// and `ConfigError::InvalidFormat` if the file is not valid TOML
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit =
            config_file_override.or_else(|| std::env::var_os(env::CONFIG).map(PathBuf::from));

        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.apply_server_override(std::env::var(env::SERVER).ok());
        Ok(config)
    }

    /// Replaces the server when an override is present and non-blank
    pub fn apply_server_override(&mut self, server: Option<String>) {
        if let Some(server) = server.filter(|s| !s.trim().is_empty()) {
            debug!("Server overridden: {}", server);
            self.client.server = server.trim().to_string();
        }
    }

    /// Runtime client configuration
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        self.client.to_runtime_config()
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(paths::LOCAL_FILE_NAME)];
        if let Some(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// The per-user config file path, if the platform has a config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::APP_DIR).join(paths::FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Writes a commented default configuration file
    ///
    /// Existing files are left alone unless `force` is set. Returns whether
    /// a file was written.
    pub async fn write_default(path: &Path, force: bool) -> ConfigResult<bool> {
        if path.exists() && !force {
            debug!("Config file already exists: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, Self::generate_default_config_content()).await?;

        info!("Wrote default configuration to {}", path.display());
        Ok(true)
    }

    /// The configuration rendered as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# HEASARC query configuration

[client]
# W3Browse batch endpoint. The ISDC mirror is
# {isdc}
server = "{server}"

# Timeouts accept human-readable durations ("30s", "1m 30s")
request_timeout = "{request_timeout}"
connect_timeout = "{connect_timeout}"
tcp_keepalive = "{keepalive}"
pool_idle_timeout = "{pool_idle}"
tcp_nodelay = true
pool_max_per_host = {pool_max}

# Requests per second sent to the server
rate_limit_rps = {rps}

[logging]
# error, warn, info, debug or trace
level = "{level}"
"#,
            isdc = heasarc::ISDC_SERVER,
            server = heasarc::DEFAULT_SERVER,
            request_timeout = format_duration(http::DEFAULT_TIMEOUT),
            connect_timeout = format_duration(http::CONNECT_TIMEOUT),
            keepalive = format_duration(http::TCP_KEEPALIVE),
            pool_idle = format_duration(http::POOL_IDLE_TIMEOUT),
            pool_max = http::POOL_MAX_PER_HOST,
            rps = limits::DEFAULT_RATE_LIMIT_RPS,
            level = logging::DEFAULT_LOG_LEVEL,
        )
    }
}
