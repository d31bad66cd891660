//! Client for the remote meme generation service.
//!
//! The service exposes a single query-style operation over HTTP POST: the
//! request body carries the operation text and a variables object with the
//! image reference, style and context; the response nests the generated meme
//! under `data.generateMeme`. Captioning, virality scoring and similar-meme
//! retrieval all happen server-side and are opaque to this client.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{GenerationRequest, GenerationResult};
use serde_json::{json, Value};

/// The generation operation sent with every request.
const GENERATE_QUERY: &str = "\
query GenerateMeme($input: MemeRequestInput!) {
  generateMeme(input: $input) {
    id topText bottomText imageUrl style confidence similar
  }
}";

pub struct MemeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl MemeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Sends one generation request and awaits the single response.
    ///
    /// No retry, no timeout, no cancellation: each invocation is independent,
    /// and repeating identical inputs is a valid "regenerate" action that may
    /// legitimately yield different captions.
    ///
    /// # Errors
    ///
    /// - [`AppError::Network`] when the transport fails
    /// - [`AppError::Api`] on a non-success HTTP status
    /// - [`AppError::MalformedResponse`] when the payload is missing fields
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        let body = json!({
            "query": GENERATE_QUERY,
            "variables": {
                "input": {
                    "imageUrl": request.image_reference,
                    "style": request.style,
                    "context": request.context,
                }
            }
        });

        log::debug!(
            "Requesting meme generation: style={}, context_len={}",
            request.style,
            request.context.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("POST {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::malformed(format!("Response was not valid JSON: {}", e)))?;

        let result = parse_generate_response(&payload)?;
        log::debug!(
            "Received meme {} (confidence {:.2}, {} similar)",
            result.id,
            result.confidence,
            result.similar.len()
        );
        Ok(result)
    }
}

/// Extracts the generated meme from a raw response payload.
///
/// Kept separate from the transport so malformed-payload handling can be
/// exercised without a live service.
pub fn parse_generate_response(payload: &Value) -> Result<GenerationResult> {
    // A query-style service reports operation failures in an `errors` array
    // alongside (or instead of) `data`.
    if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::malformed(if message.is_empty() {
                "Service reported an unspecified error".to_string()
            } else {
                message
            }));
        }
    }

    let meme = payload
        .get("data")
        .and_then(|data| data.get("generateMeme"))
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::malformed("Missing data.generateMeme in response"))?;

    serde_json::from_value(meme.clone())
        .map_err(|e| AppError::malformed(format!("Unexpected generateMeme shape: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_response() {
        let payload = json!({
            "data": {
                "generateMeme": {
                    "id": "m1",
                    "topText": "WHEN MONDAY HITS",
                    "bottomText": "",
                    "imageUrl": "http://example.com/m1.png",
                    "style": "dark",
                    "confidence": 0.72,
                    "similar": ["grumpy cat", "monday mood"]
                }
            }
        });

        let result = parse_generate_response(&payload).unwrap();
        assert_eq!(result.id, "m1");
        assert_eq!(result.top_text, "WHEN MONDAY HITS");
        assert_eq!(result.bottom_text, "");
        assert_eq!(result.style, "dark");
        assert_eq!(result.confidence_percent(), 72);
        assert_eq!(result.similar, vec!["grumpy cat", "monday mood"]);
    }

    #[test]
    fn missing_result_object_is_malformed() {
        let payload = json!({ "data": {} });
        assert!(matches!(
            parse_generate_response(&payload),
            Err(AppError::MalformedResponse(_))
        ));

        let payload = json!({ "data": { "generateMeme": null } });
        assert!(matches!(
            parse_generate_response(&payload),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let payload = json!({
            "data": { "generateMeme": { "id": "m2", "topText": "HI" } }
        });
        assert!(matches!(
            parse_generate_response(&payload),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn service_errors_are_surfaced() {
        let payload = json!({
            "data": null,
            "errors": [
                { "message": "image too large" },
                { "message": "try again" }
            ]
        });
        match parse_generate_response(&payload) {
            Err(AppError::MalformedResponse(msg)) => {
                assert!(msg.contains("image too large"));
                assert!(msg.contains("try again"));
            }
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn absent_similar_defaults_to_empty() {
        let payload = json!({
            "data": {
                "generateMeme": {
                    "id": "m3",
                    "topText": "TOP",
                    "bottomText": "BOTTOM",
                    "imageUrl": "http://example.com/m3.png",
                    "style": "wholesome",
                    "confidence": 0.31
                }
            }
        });
        let result = parse_generate_response(&payload).unwrap();
        assert!(result.similar.is_empty());
    }
}
