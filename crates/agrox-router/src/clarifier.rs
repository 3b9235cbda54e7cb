// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewrites underspecified farming queries into complete ones.

use std::sync::Arc;

use agrox_config::model::ClarifierConfig;
use agrox_core::{AgroxError, ExtractedInfo, GenerationRequest, TextGenerator};
use tracing::debug;

use crate::prompts;

/// Asks the text-generation port for a default-filled rewrite of a query.
///
/// Caching and the fall-back-to-input policy live in [`crate::QueryRouter`];
/// this type only reports what the model produced.
pub struct Clarifier {
    generator: Arc<dyn TextGenerator>,
    defaults: ExtractedInfo,
    config: ClarifierConfig,
}

impl Clarifier {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        defaults: ExtractedInfo,
        config: ClarifierConfig,
    ) -> Self {
        Self {
            generator,
            defaults,
            config,
        }
    }

    /// Rewrite `input`. Fails if the port fails or returns only whitespace.
    pub async fn rewrite(&self, input: &str) -> Result<String, AgroxError> {
        let request = GenerationRequest {
            prompt: prompts::clarify_prompt(input, &self.defaults),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stop: self.config.stop.clone(),
        };

        let raw = self.generator.generate(request).await?;
        let clarified = clean_rewrite(&raw);
        if clarified.is_empty() {
            return Err(AgroxError::EmptyGeneration);
        }

        debug!(generator = self.generator.name(), chars = clarified.len(), "query clarified");
        Ok(clarified.to_string())
    }
}

/// Strip whitespace and one layer of wrapping double quotes.
fn clean_rewrite(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(trimmed)
}
