pub mod animation;
pub mod export;
pub mod playback;
pub mod transform;
