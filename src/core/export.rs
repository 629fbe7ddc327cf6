use crate::domain::model::ExportDocument;
use crate::domain::ports::Clock;
use crate::utils::error::{AppError, Result};
use chrono::SecondsFormat;
use percent_encoding::percent_decode_str;
use std::sync::Arc;

pub const DEFAULT_FILENAME_PREFIX: &str = "manga-animation";

#[derive(Debug, Clone)]
pub struct ExportDownload {
    pub filename: String,
    pub document: ExportDocument,
}

impl ExportDownload {
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// 從原始查詢字串取出第一個 `frames` 值(form 解碼，`+` 視為空白)
pub fn frames_from_query(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "frames")
        .map(|(_, value)| value.into_owned())
}

/// 解析 `frames` 參數。值已被查詢字串解碼過一次；
/// 前端若多編碼了一層，這裡再做一次百分比解碼(`+` 保留原樣)
pub fn decode_frames_param(raw: &str) -> Result<Vec<serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => into_frame_array(value),
        Err(first_err) => {
            let decoded = percent_decode_str(raw).decode_utf8().map_err(|e| {
                AppError::processing(format!("frames is not valid UTF-8 after decoding: {}", e))
            })?;

            if decoded == raw {
                return Err(first_err.into());
            }
            tracing::debug!("frames parameter was percent-encoded twice, decoded again");
            into_frame_array(serde_json::from_str(&decoded)?)
        }
    }
}

fn into_frame_array(value: serde_json::Value) -> Result<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(frames) => Ok(frames),
        other => Err(AppError::processing(format!(
            "frames must be a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

pub struct Exporter {
    clock: Arc<dyn Clock>,
    filename_prefix: String,
}

impl Exporter {
    pub fn new(clock: Arc<dyn Clock>, filename_prefix: impl Into<String>) -> Self {
        Self {
            clock,
            filename_prefix: filename_prefix.into(),
        }
    }

    pub fn build(&self, frames: Vec<serde_json::Value>) -> ExportDownload {
        let now = self.clock.now();

        ExportDownload {
            filename: format!("{}-{}.json", self.filename_prefix, now.timestamp_millis()),
            document: ExportDocument {
                r#type: "animation".to_string(),
                frame_count: frames.len(),
                frames,
                format: "json".to_string(),
                timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }

    /// `raw` 為 None 或空字串時回傳 400 類錯誤
    pub fn export(&self, raw: Option<&str>) -> Result<ExportDownload> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(AppError::missing("frames")),
        };

        let frames = decode_frames_param(raw)?;
        tracing::debug!("Exporting {} frames", frames.len());
        Ok(self.build(frames))
    }
}
