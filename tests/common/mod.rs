use manga_anime::{build_router, FixedClock, ServerConfig};
use std::sync::Arc;

#[allow(dead_code)]
pub const FIXED_MILLIS: i64 = 1_700_000_000_123;

/// 在隨機埠啟動伺服器，回傳 base URL
pub async fn spawn_server(config: ServerConfig) -> anyhow::Result<String> {
    let app = build_router(&config, Arc::new(FixedClock::from_millis(FIXED_MILLIS)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server failed: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}

#[allow(dead_code)]
pub async fn spawn_default_server() -> anyhow::Result<String> {
    spawn_server(ServerConfig::default()).await
}
