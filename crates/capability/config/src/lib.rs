//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub snmp_community: String,
    pub snmp_port: u16,
    pub snmp_timeout_ms: u64,
    pub heartbeat_ms: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("NMS_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("NMS_DATABASE_URL".to_string()))?;
        let jwt_secret = env::var("NMS_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("NMS_JWT_SECRET".to_string()))?;
        let http_addr = env::var("NMS_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let snmp_community =
            env::var("NMS_SNMP_COMMUNITY").unwrap_or_else(|_| "NetManageSys".to_string());
        let snmp_port = read_u16_with_default("NMS_SNMP_PORT", 161)?;
        let snmp_timeout_ms = read_u64_with_default("NMS_SNMP_TIMEOUT_MS", 3000)?;
        let heartbeat_ms = read_u64_with_default("NMS_HEARTBEAT_MS", 5000)?;

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            snmp_community,
            snmp_port,
            snmp_timeout_ms,
            heartbeat_ms,
        })
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
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
