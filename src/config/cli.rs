use crate::config::toml_config::TomlConfig;
use crate::config::ServerConfig;
use crate::domain::model::{Effect, Settings, DEFAULT_FRAME_COUNT, DEFAULT_MOTION_INTENSITY};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "manga-anime")]
#[command(about = "Turn a manga panel into a CSS-transform slideshow")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true)]
    pub max_body_bytes: Option<usize>,

    #[arg(long, global = true)]
    pub allow_origin: Option<String>,

    #[arg(long, global = true)]
    pub export_prefix: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the frames for an image without starting the server
    Generate {
        #[command(flatten)]
        animation: AnimationArgs,

        /// Print legacy fragment URLs instead of the JSON response
        #[arg(long)]
        urls: bool,
    },
    /// Play the generated frames in the terminal
    Preview {
        #[command(flatten)]
        animation: AnimationArgs,

        /// How many times to loop through the sequence
        #[arg(long, default_value = "2")]
        cycles: usize,

        /// Override the playback interval
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AnimationArgs {
    /// Image reference (data URL or plain URL)
    #[arg(long)]
    pub image: String,

    #[arg(long, default_value_t = DEFAULT_FRAME_COUNT)]
    pub frame_count: u32,

    #[arg(long, default_value_t = DEFAULT_MOTION_INTENSITY)]
    pub intensity: f64,

    #[arg(long, default_value = "pan-zoom")]
    pub effect: String,
}

impl AnimationArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            frame_count: self.frame_count,
            motion_intensity: self.intensity,
            effect: Effect::from_name(&self.effect),
        }
    }
}

impl CliConfig {
    /// 優先順序：命令列 > TOML 檔 > 預設值
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.into_server_config()
            }
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_body_bytes) = self.max_body_bytes {
            config.max_body_bytes = max_body_bytes;
        }
        if let Some(origin) = &self.allow_origin {
            config.allow_origin = Some(origin.clone());
        }
        if let Some(prefix) = &self.export_prefix {
            config.export_filename_prefix = prefix.clone();
        }
        if self.json_logs {
            config.json_logs = true;
        }
        if let Some(Command::Preview {
            interval_ms: Some(interval_ms),
            ..
        }) = &self.command
        {
            config.playback_interval_ms = *interval_ms;
        }

        config.validate()?;
        Ok(config)
    }
}
