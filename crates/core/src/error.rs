//! Error types for the memeforge-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the memeforge-core library.
///
/// Each variant represents a specific failure mode with contextual information
/// to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (bad endpoint URL, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not reach the meme service (transport failure).
    #[error("Network request failed: {0}")]
    Network(String),

    /// The meme service answered with a non-success HTTP status.
    #[error("Meme service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response arrived but was missing or mistyped expected fields.
    #[error("Malformed response from meme service: {0}")]
    MalformedResponse(String),

    /// Image decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// The export region is empty or lies outside the rendered frame.
    #[error("Export region is empty or invalid")]
    EmptyRegion,

    /// Capturing the rendered result pane failed.
    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    /// The platform offers no share capability.
    #[error("Sharing is not available on this platform")]
    ShareUnavailable,

    /// UI-related errors (rendering, window management).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a network transport error with the given message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Creates a malformed-response error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a rasterization error with the given message.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
