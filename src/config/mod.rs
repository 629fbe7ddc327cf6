#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::export::DEFAULT_FILENAME_PREFIX;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_filename_component, validate_non_empty_string, validate_origin,
    validate_positive_number, validate_range, Validate,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
/// 10MB 圖片轉成 data URL 後約 13.4MB
pub const DEFAULT_MAX_BODY_BYTES: usize = 15 * 1024 * 1024;
pub const DEFAULT_PLAYBACK_INTERVAL_MS: u64 = 100;

/// 合併 CLI、TOML 與預設值後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub allow_origin: Option<String>,
    pub export_filename_prefix: String,
    pub playback_interval_ms: u64,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_origin: None,
            export_filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            playback_interval_ms: DEFAULT_PLAYBACK_INTERVAL_MS,
            log_level: None,
            json_logs: false,
        }
    }
}

impl ConfigProvider for ServerConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    fn allow_origin(&self) -> Option<&str> {
        self.allow_origin.as_deref()
    }

    fn export_filename_prefix(&self) -> &str {
        &self.export_filename_prefix
    }

    fn playback_interval_ms(&self) -> u64 {
        self.playback_interval_ms
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_positive_number("server.max_body_bytes", self.max_body_bytes, 1024)?;
        if let Some(origin) = &self.allow_origin {
            validate_origin("server.allow_origin", origin)?;
        }
        validate_filename_component("export.filename_prefix", &self.export_filename_prefix)?;
        validate_range("playback.interval_ms", self.playback_interval_ms, 10, 10_000)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
