// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-generation port consumed by the clarifier and route classifier.

use async_trait::async_trait;

use crate::error::AgroxError;
use crate::types::GenerationRequest;

/// Single-shot prompt-to-text generation.
///
/// Implementations hold no per-request state. Any backend failure is
/// reported as an [`AgroxError`]; callers in the router treat every error as
/// a signal to degrade rather than to abort.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Returns the human-readable name of this generator.
    fn name(&self) -> &str;

    /// Generates text for the given prompt and sampling parameters.
    async fn generate(&self, request: GenerationRequest) -> Result<String, AgroxError>;
}
