// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! llama.cpp completion server adapter for the AgroX text-generation port.
//!
//! This crate implements [`TextGenerator`] against the non-streaming
//! `POST /completion` endpoint of a llama.cpp-style server.

pub mod client;
pub mod types;

use agrox_config::model::LlamaConfig;
use agrox_core::{AgroxError, GenerationRequest, TextGenerator};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::LlamaClient;
use crate::types::CompletionRequest;

/// Text generator backed by a llama.cpp completion server.
pub struct LlamaGenerator {
    client: LlamaClient,
}

impl LlamaGenerator {
    /// Creates a generator for the server described by `config`.
    ///
    /// No request is made here; an unreachable server surfaces on the first
    /// `generate` call.
    pub fn new(config: &LlamaConfig) -> Result<Self, AgroxError> {
        let client = LlamaClient::new(config)?;
        info!(endpoint = client.endpoint(), "llama.cpp generator initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl TextGenerator for LlamaGenerator {
    fn name(&self) -> &str {
        "llama"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, AgroxError> {
        let request = CompletionRequest::from(request);
        let response = self.client.complete(&request).await?;
        debug!(
            tokens = response.tokens_predicted,
            stopped = response.stop,
            "completion received"
        );
        Ok(response.content.trim().to_string())
    }
}
