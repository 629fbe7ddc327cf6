use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "manga_anime=info,tower_http=info";
const VERBOSE_FILTER: &str = "manga_anime=debug,tower_http=debug,info";

/// 建立日誌過濾器：RUST_LOG 優先，其次是設定檔的 level，最後才是預設值
fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else if let Some(level) = level {
            EnvFilter::try_new(format!("manga_anime={level},tower_http={level}"))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 部署環境用 JSON 方便日誌收集
        )
        .init();
}
