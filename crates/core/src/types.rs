//! Core data types for the meme generation workflow.
//!
//! These mirror the wire contract of the remote meme service: a request
//! carries the image reference, a caption-tone preset and optional free-text
//! context; a result carries the generated captions plus server-side metadata
//! (virality score, similar known formats).

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caption-tone presets understood by the meme service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemeStyle {
    Sarcastic,
    Wholesome,
    Dark,
    DadJoke,
}

impl MemeStyle {
    /// All styles in UI presentation order.
    pub const ALL: [MemeStyle; 4] = [
        MemeStyle::Sarcastic,
        MemeStyle::Wholesome,
        MemeStyle::Dark,
        MemeStyle::DadJoke,
    ];

    /// Wire name sent to the meme service.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemeStyle::Sarcastic => "sarcastic",
            MemeStyle::Wholesome => "wholesome",
            MemeStyle::Dark => "dark",
            MemeStyle::DadJoke => "dad_joke",
        }
    }

    /// Human-readable label for buttons and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            MemeStyle::Sarcastic => "😏 Sarcastic",
            MemeStyle::Wholesome => "🥰 Wholesome",
            MemeStyle::Dark => "😈 Dark Humor",
            MemeStyle::DadJoke => "🤓 Dad Joke",
        }
    }

    /// Parses a wire name, for CLI arguments.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "sarcastic" => Ok(MemeStyle::Sarcastic),
            "wholesome" => Ok(MemeStyle::Wholesome),
            "dark" => Ok(MemeStyle::Dark),
            "dad_joke" => Ok(MemeStyle::DadJoke),
            other => Err(AppError::config(format!(
                "Unknown meme style '{}' (expected one of: sarcastic, wholesome, dark, dad_joke)",
                other
            ))),
        }
    }
}

impl Default for MemeStyle {
    fn default() -> Self {
        MemeStyle::Sarcastic
    }
}

impl fmt::Display for MemeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generation request, built fresh per generate action and discarded
/// after send.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Locally derived reference to the uploaded image (data URL).
    pub image_reference: String,
    pub style: MemeStyle,
    /// Optional free-text context, empty when the user left it blank.
    pub context: String,
}

impl GenerationRequest {
    pub fn new(image_reference: impl Into<String>, style: MemeStyle, context: impl Into<String>) -> Self {
        Self {
            image_reference: image_reference.into(),
            style,
            context: context.into(),
        }
    }

    /// An empty image reference must never reach the wire.
    pub fn validate(&self) -> Result<()> {
        if self.image_reference.is_empty() {
            return Err(AppError::config("Image reference must not be empty"));
        }
        Ok(())
    }
}

/// A generated meme as returned by the service.
///
/// Immutable once received; each new request replaces the previous result
/// wholesale, fields are never merged.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Opaque server-assigned identifier.
    pub id: String,
    pub top_text: String,
    pub bottom_text: String,
    pub image_url: String,
    /// Echoes the requested style.
    pub style: String,
    /// Predicted shareability in [0, 1].
    pub confidence: f64,
    /// Labels of related known meme formats, in server order.
    #[serde(default)]
    pub similar: Vec<String>,
}

impl GenerationResult {
    /// The virality score scaled to an integer percentage for display,
    /// e.g. 0.87 -> 87.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Deterministic download filename derived from the server id.
    pub fn download_filename(&self) -> String {
        format!("ai-meme-{}.png", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_wire_names() {
        assert_eq!(MemeStyle::DadJoke.as_str(), "dad_joke");
        assert_eq!(
            serde_json::to_string(&MemeStyle::DadJoke).unwrap(),
            "\"dad_joke\""
        );
        for style in MemeStyle::ALL {
            assert_eq!(MemeStyle::parse(style.as_str()).unwrap(), style);
        }
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(MemeStyle::parse("ironic").is_err());
    }

    #[test]
    fn request_requires_image_reference() {
        let request = GenerationRequest::new("", MemeStyle::Dark, "");
        assert!(request.validate().is_err());

        let request = GenerationRequest::new("data:image/jpeg;base64,AAAA", MemeStyle::Dark, "");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn confidence_is_rendered_as_rounded_percentage() {
        let mut result = sample_result();
        result.confidence = 0.87;
        assert_eq!(result.confidence_percent(), 87);
        result.confidence = 0.725;
        assert_eq!(result.confidence_percent(), 73);
        result.confidence = 1.7; // out-of-contract value is clamped
        assert_eq!(result.confidence_percent(), 100);
        result.confidence = -0.2;
        assert_eq!(result.confidence_percent(), 0);
    }

    #[test]
    fn filename_derives_from_id() {
        let result = sample_result();
        assert_eq!(result.download_filename(), "ai-meme-abc123.png");
    }

    fn sample_result() -> GenerationResult {
        GenerationResult {
            id: "abc123".to_string(),
            top_text: "TOP".to_string(),
            bottom_text: "BOTTOM".to_string(),
            image_url: "http://example.com/meme.png".to_string(),
            style: "dark".to_string(),
            confidence: 0.5,
            similar: vec![],
        }
    }
}
