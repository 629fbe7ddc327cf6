use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 請求缺少必要欄位，對應 HTTP 400
    Client,
    Configuration,
    /// 其餘一律視為非預期錯誤，對應 HTTP 500
    Internal,
}

impl AppError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingFieldError {
            field: field.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::MissingFieldError { .. } => ErrorCategory::Client,
            AppError::InvalidConfigValueError { .. } | AppError::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            AppError::IoError(_)
            | AppError::SerializationError(_)
            | AppError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Client
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::MissingFieldError { field } => format!("No {} provided", field),
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值 {} 無效: {}", field, reason)
            }
            AppError::ConfigError { message } => format!("設定錯誤: {}", message),
            AppError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            AppError::SerializationError(e) => format!("JSON 解析失敗: {}", e),
            AppError::ProcessingError { message } => format!("處理失敗: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => "Include the missing field in the request and try again",
            ErrorCategory::Configuration => {
                "Check the command line flags and the TOML configuration file"
            }
            ErrorCategory::Internal => "Check the logs for details and retry the operation",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Client => 2,
            ErrorCategory::Internal => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_client_error() {
        let err = AppError::missing("image");
        assert!(err.is_client_error());
        assert_eq!(err.user_friendly_message(), "No image provided");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_parse_failure_is_internal() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_config_error_category() {
        let err = AppError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
    }
}
