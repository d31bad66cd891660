//! User interface components for memeforge.
//!
//! This module provides the single-window meme studio: image upload, style
//! selection, context entry, generation and export actions.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: The view-state controller and request events
//! - [`settings`]: User preferences and persistence
//! - [`app`]: The eframe application and rendering
//!
//! # Usage
//!
//! ```ignore
//! use memeforge_core::Config;
//! use memeforge_core::ui;
//!
//! let config = Config::load()?;
//! ui::run_studio(config, None)?;
//! ```

mod app;
mod settings;
mod state;

// Public API exports
pub use app::MemeStudio;
pub use settings::Settings;
pub use state::{Controller, Phase, RequestEvent};

use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;

/// Launches the meme studio window.
///
/// Blocks until the window is closed.
///
/// # Arguments
/// * `config` - Application configuration with the service endpoint
/// * `initial_image` - Optional image file to preload into the intake
pub fn run_studio(config: Config, initial_image: Option<PathBuf>) -> Result<()> {
    app::run(config, initial_image)
}
