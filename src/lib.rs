//! # ascii-frame-player
//!
//! Loader and playback controller for pre-rendered ASCII-art animations.
//!
//! A frame set is a directory of numbered text files
//! (`frame_0001.txt`, `frame_0002.txt`, ...). This crate provides:
//! - Batched, cancellable loading of a frame set into memory
//! - A fixed-rate playback clock driven by the host's render loop
//! - Transport controls (play/pause, restart, step) and a view model
//!
//! Rendering is left to the host: a terminal, a canvas, a GUI widget.
//!
//! ## Features
//!
//! - `fs` (default) - Load frames from a local directory
//! - `http` - Load frames over HTTP
//! - `serde` - Enable serialization/deserialization for the config
//! - `toml` - Read [`PlayerConfig`] from TOML
//! - `cli` - Build the `ascii-play` terminal demo
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use ascii_frame_player::{DirectorySource, FramePlayer, PlayerConfig};
//!
//! let config = PlayerConfig::new("colored").with_fps(48);
//! let mut player = FramePlayer::create(config)?;
//!
//! // Run the load on a local executor
//! let task = player.load(DirectorySource::new("public/frames"));
//! tokio::task::spawn_local(task);
//!
//! // Once per rendering opportunity
//! if player.tick(Instant::now()) {
//!     draw(player.view().frame);
//! }
//!
//! player.dispose();
//! ```

mod animation;
mod config;
mod data;
mod error;
mod loader;
mod player;
pub mod source;

pub use animation::{AnimationState, PlaybackClock};
pub use config::{OverlayStyle, PlayerConfig, DEFAULT_FPS, DEFAULT_FRAME_COUNT, DEFAULT_OVERLAY_STYLE};
pub use data::{FrameFile, FrameSet};
pub use error::{FetchError, PlayerError, PlayerResult};
pub use loader::{load_frame_set, FrameSource, LoadingProgress, BATCH_SIZE};
pub use player::{
    FramePlayer, LoadOutcome, LoadTask, PlaybackState, PlayerStatus, PlayerView, SETTLE_DELAY,
};

#[cfg(feature = "fs")]
pub use source::DirectorySource;
#[cfg(feature = "http")]
pub use source::HttpSource;
