//! 服务运行配置加载。
//!
//! 先读 JSON 文件（`PLCGW_CONFIG_PATH`，默认 `config/appsettings.json`），
//! 再用 `PLCGW_*` 环境变量覆盖，最后统一校验。

use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/appsettings.json";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 单个 PLC 端点配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlcConfig {
    pub id: u32,
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// 单个持久化目的地配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub connection_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatabasesConfig {
    #[serde(default)]
    pub local: DatabaseConfig,
    #[serde(default)]
    pub cloud: DatabaseConfig,
}

/// 服务运行配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_read_interval")]
    pub read_interval_seconds: u64,
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_seconds: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub plcs: Vec<PlcConfig>,
    #[serde(default)]
    pub databases: DatabasesConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_read_interval() -> u64 {
    5
}

fn default_reconnect_interval() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

impl ServiceConfig {
    /// 从配置文件与环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("PLCGW_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::parse_file(Path::new(&path))?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 只读配置文件，不应用环境变量。
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.read_interval_seconds =
            read_u64_with_default("PLCGW_READ_INTERVAL_SECONDS", self.read_interval_seconds)?;
        self.reconnect_interval_seconds = read_u64_with_default(
            "PLCGW_RECONNECT_INTERVAL_SECONDS",
            self.reconnect_interval_seconds,
        )?;
        self.read_timeout_seconds =
            read_u64_with_default("PLCGW_READ_TIMEOUT_SECONDS", self.read_timeout_seconds)?;
        self.max_retries = read_u32_with_default("PLCGW_MAX_RETRIES", self.max_retries)?;
        if let Some(url) = read_optional("PLCGW_LOCAL_DATABASE_URL") {
            self.databases.local.connection_string = url;
        }
        if let Some(url) = read_optional("PLCGW_CLOUD_DATABASE_URL") {
            self.databases.cloud.connection_string = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("read_interval_seconds", self.read_interval_seconds)?;
        ensure_positive("reconnect_interval_seconds", self.reconnect_interval_seconds)?;
        ensure_positive("read_timeout_seconds", self.read_timeout_seconds)?;
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "max_retries".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        if self.plcs.is_empty() {
            return Err(ConfigError::Missing("plcs".to_string()));
        }
        if self.enabled_plcs().next().is_none() {
            return Err(ConfigError::Invalid(
                "plcs".to_string(),
                "no PLC is enabled".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for plc in &self.plcs {
            if !ids.insert(plc.id) {
                return Err(ConfigError::Invalid(
                    "plcs".to_string(),
                    format!("duplicate PLC id {}", plc.id),
                ));
            }
            if plc.host.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    format!("plcs[{}].host", plc.id),
                    "must not be empty".to_string(),
                ));
            }
        }

        for (name, database) in [("local", &self.databases.local), ("cloud", &self.databases.cloud)] {
            if database.enabled && database.connection_string.trim().is_empty() {
                return Err(ConfigError::Missing(format!(
                    "databases.{name}.connection_string"
                )));
            }
        }
        Ok(())
    }

    pub fn enabled_plcs(&self) -> impl Iterator<Item = &PlcConfig> {
        self.plcs.iter().filter(|plc| plc.enabled)
    }

    pub fn read_interval(&self) -> Duration {
        Duration::from_secs(self.read_interval_seconds)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }
}

fn ensure_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(
            key.to_string(),
            "must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
