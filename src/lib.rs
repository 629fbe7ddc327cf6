pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::clock::{FixedClock, SystemClock};
pub use adapters::http::{build_router, serve};
pub use config::{toml_config::TomlConfig, ServerConfig};
pub use crate::core::{
    animation::handle_generate, export::Exporter, playback::Player,
    transform::generate_transform,
};
pub use domain::model::{Effect, FrameDescriptor, Settings, Transform};
pub use utils::error::{AppError, Result};
