use chrono::{DateTime, Utc};

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn max_body_bytes(&self) -> usize;
    fn allow_origin(&self) -> Option<&str>;
    fn export_filename_prefix(&self) -> &str;
    fn playback_interval_ms(&self) -> u64;
}

/// 時間來源，匯出時間戳由此取得
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
