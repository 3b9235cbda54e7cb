// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! llama.cpp `/completion` request and response types.

use agrox_core::GenerationRequest;
use serde::{Deserialize, Serialize};

/// Body of a `POST /completion` request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Maximum number of tokens to predict.
    pub n_predict: u32,
    pub temperature: f32,
    pub stop: Vec<String>,
    pub stream: bool,
}

impl From<GenerationRequest> for CompletionRequest {
    fn from(request: GenerationRequest) -> Self {
        Self {
            prompt: request.prompt,
            n_predict: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop,
            stream: false,
        }
    }
}

/// Non-streaming `/completion` response. Only the generated text is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub stop: bool,
    #[serde(default)]
    pub tokens_predicted: Option<u64>,
}

/// Error body returned by the server on non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_maps_port_fields() {
        let request = CompletionRequest::from(GenerationRequest {
            prompt: "Input: \"yam\"\nOutput: ".into(),
            max_tokens: 100,
            temperature: 0.2,
            stop: vec!["Input:".into()],
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["n_predict"], 100);
        assert_eq!(json["stream"], false);
        assert_eq!(json["stop"][0], "Input:");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn response_ignores_extra_fields() {
        let body = r#"{"content": " RAG ", "stop": true, "model": "llama", "timings": {}}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.content, " RAG ");
        assert!(response.stop);
        assert_eq!(response.tokens_predicted, None);
    }

    #[test]
    fn error_body_parses() {
        let body = r#"{"error": {"code": 503, "message": "Loading model", "type": "unavailable_error"}}"#;
        let err: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(err.error.code, Some(503));
        assert_eq!(err.error.message, "Loading model");
        assert_eq!(err.error.type_.as_deref(), Some("unavailable_error"));
    }
}
