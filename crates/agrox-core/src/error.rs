// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the AgroX query router.

use thiserror::Error;

/// The primary error type used across the text-generation port and routing core.
///
/// None of these errors ever reach a caller of `clarify_and_route`; the router
/// converts each one into a degradation step.
#[derive(Debug, Error)]
pub enum AgroxError {
    /// Configuration errors (invalid values, unusable adapter settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Text-generation backend errors (unreachable server, bad status, undecodable body).
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered but produced no text.
    #[error("generation returned empty text")]
    EmptyGeneration,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Route classification could not produce a decision.
    #[error("routing error: {0}")]
    Routing(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgroxError {
    /// Convenience constructor for a generation failure without an underlying source.
    pub fn generation(message: impl Into<String>) -> Self {
        AgroxError::Generation {
            message: message.into(),
            source: None,
        }
    }
}
