//! MemeForge Core Library
//!
//! This library provides the core functionality for the MemeForge desktop
//! app: image intake, meme generation via a remote service, and export of
//! the rendered result.
//!
//! # Overview
//!
//! MemeForge lets users pick a local image, choose a caption style, add
//! optional free-text context, and request a generated meme from a remote
//! service. The library handles:
//!
//! - **Image Intake**: File loading and request references via [`intake`]
//! - **Generation**: The remote service client via [`client`]
//! - **Export**: Rasterization, download and share via [`raster`] and [`export`]
//! - **User Interface**: The studio window via [`ui`]
//!
//! All caption generation, virality scoring and similar-meme retrieval happen
//! server-side; this crate only speaks the one request/response contract.
//!
//! # Quick Start
//!
//! The simplest way to use the library is through the [`MemeForge`] facade:
//!
//! ```ignore
//! use memeforge_core::MemeForge;
//!
//! // Initialize with environment configuration
//! let app = MemeForge::new()?;
//!
//! // Launch the studio window
//! app.run_studio(None)?;
//! ```
//!
//! # Module Structure
//!
//! - [`client`]: Remote meme service client
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`export`]: Download and share actions
//! - [`intake`]: Image intake and request references
//! - [`raster`]: Result pane rasterization
//! - [`types`]: Request/result data model
//! - [`ui`]: User interface components

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod intake;
pub mod raster;
pub mod types;
pub mod ui;

// Re-export primary types for convenience
pub use client::MemeClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use intake::ImageIntake;
pub use types::{GenerationRequest, GenerationResult, MemeStyle};

use std::path::Path;

/// Main entry point for the MemeForge application.
///
/// This struct provides a facade over the subsystems, handling
/// initialization and orchestration. It's the recommended way to use the
/// library for most use cases.
pub struct MemeForge {
    config: Config,
}

impl MemeForge {
    /// Creates a new MemeForge instance with default configuration.
    ///
    /// Loads configuration from environment variables (including `.env`
    /// files).
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self { config })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Launches the studio window, optionally preloading an image.
    ///
    /// Blocks until the window is closed.
    pub fn run_studio(&self, initial_image: Option<std::path::PathBuf>) -> Result<()> {
        ui::run_studio(self.config.clone(), initial_image)
    }

    /// Generates a meme from an image file without any UI.
    ///
    /// Loads and encodes the image, issues one generation request and
    /// returns the parsed result. Useful for scripting and the headless CLI
    /// path.
    pub async fn generate_from_file(
        &self,
        path: &Path,
        style: MemeStyle,
        context: &str,
    ) -> Result<GenerationResult> {
        let mut intake = ImageIntake::new();
        intake.load(path)?;
        let reference = intake
            .reference()
            .ok_or_else(|| AppError::image("Intake holds no image reference"))?;

        let request = GenerationRequest::new(reference, style, context);
        MemeClient::new(&self.config).generate(&request).await
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    ///
    /// Allows overriding the endpoint after initialization.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
/// This loads `.env` files if present and sets up the environment.
pub fn init() {
    let _ = dotenvy::dotenv();
}
