use clap::Parser;
use manga_anime::config::cli::{AnimationArgs, Command};
use manga_anime::core::animation::generate_animation;
use manga_anime::domain::model::GenerateRequest;
use manga_anime::domain::ports::ConfigProvider;
use manga_anime::utils::logger;
use manga_anime::{AppError, CliConfig, Player, ServerConfig, SystemClock};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            // 日誌尚未初始化，直接輸出到 stderr
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(cli.verbose, config.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level.as_deref());
    }
    tracing::debug!("Resolved config: {:?}", config);

    let result = match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting manga-anime server");
            manga_anime::serve(&config, Arc::new(SystemClock)).await?;
            Ok(())
        }
        Command::Generate { animation, urls } => print_frames(&animation, urls),
        Command::Preview {
            animation, cycles, ..
        } => preview(&config, &animation, cycles).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?})",
            e,
            e.category()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn request_for(animation: &AnimationArgs) -> GenerateRequest {
    GenerateRequest {
        image: Some(animation.image.clone()),
        settings: animation.settings(),
    }
}

fn print_frames(animation: &AnimationArgs, urls: bool) -> Result<(), AppError> {
    let response = generate_animation(&request_for(animation))?;

    if urls {
        for frame in &response.frames {
            println!("{}", frame.fragment_url());
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

async fn preview(
    config: &ServerConfig,
    animation: &AnimationArgs,
    cycles: usize,
) -> Result<(), AppError> {
    let response = generate_animation(&request_for(animation))?;
    let frames = response.frames;
    let interval = Duration::from_millis(config.playback_interval_ms());

    tracing::info!(
        "🎬 Previewing {} frames ({}) every {:?}",
        frames.len(),
        response.settings.effect,
        interval
    );

    let player = Player::spawn(frames.len(), interval);
    let mut updates = player.subscribe();
    let total_ticks = cycles * frames.len();
    let mut shown = 0;

    while shown < total_ticks {
        let state = *updates.borrow_and_update();
        if let Some(frame) = frames.get(state.current) {
            let filter = frame.transform.css_filter().unwrap_or_default();
            println!(
                "{:<16} {:>5.1}%  transform: {}  {}",
                state.label(),
                state.progress_percent(),
                frame.transform.css(),
                filter
            );
        }
        shown += 1;

        if updates.changed().await.is_err() {
            break;
        }
    }

    player.stop().await;
    Ok(())
}
