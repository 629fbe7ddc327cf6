use crate::config::ServerConfig;
use crate::utils::error::{AppError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 所有區段與欄位皆可省略，省略者使用預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub playback: PlaybackSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
    pub allow_origin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSection {
    pub filename_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackSection {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ALLOW_ORIGIN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 疊加到既有設定上，只覆蓋檔案中有寫的欄位
    pub fn apply_to(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.server.host {
            config.host = host.clone();
        }
        if let Some(port) = self.server.port {
            config.port = port;
        }
        if let Some(max_body_bytes) = self.server.max_body_bytes {
            config.max_body_bytes = max_body_bytes;
        }
        if let Some(origin) = &self.server.allow_origin {
            config.allow_origin = Some(origin.clone());
        }
        if let Some(prefix) = &self.export.filename_prefix {
            config.export_filename_prefix = prefix.clone();
        }
        if let Some(interval_ms) = self.playback.interval_ms {
            config.playback_interval_ms = interval_ms;
        }
        if let Some(level) = &self.logging.level {
            config.log_level = Some(level.clone());
        }
        if let Some(json) = self.logging.json {
            config.json_logs = json;
        }
    }

    pub fn into_server_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        self.apply_to(&mut config);
        config
    }
}
