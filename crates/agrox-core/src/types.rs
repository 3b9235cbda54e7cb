// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the router, the CLI, and port adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Crop assumed when a query does not name one.
pub const DEFAULT_CROP: &str = "maize";

/// Location assumed when a query does not name one.
pub const DEFAULT_LOCATION: &str = "Onitsha";

/// Month assumed when a query does not name one.
pub const DEFAULT_MONTH: &str = "July";

/// The knowledge source(s) that should answer a query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteType {
    /// How-to guides and farming procedures (retrieval-augmented generation).
    Rag,
    /// Structured soil, nutrient, and crop suitability data.
    Database,
    /// Needs both procedures and soil/location data.
    Both,
}

impl RouteType {
    /// Interpret a route label emitted by a language model.
    ///
    /// Accepts any casing and surrounding whitespace or quotes. Returns `None`
    /// for anything that is not exactly one of the three labels.
    pub fn from_label(label: &str) -> Option<Self> {
        let cleaned = label.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        match cleaned.to_ascii_uppercase().as_str() {
            "RAG" => Some(RouteType::Rag),
            "DATABASE" => Some(RouteType::Database),
            "BOTH" => Some(RouteType::Both),
            _ => None,
        }
    }
}

/// Slot values pulled out of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedInfo {
    pub crop: String,
    pub location: String,
    pub month: String,
}

impl ExtractedInfo {
    pub fn new(
        crop: impl Into<String>,
        location: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            crop: crop.into(),
            location: location.into(),
            month: month.into(),
        }
    }
}

impl Default for ExtractedInfo {
    fn default() -> Self {
        Self::new(DEFAULT_CROP, DEFAULT_LOCATION, DEFAULT_MONTH)
    }
}

/// The full answer handed to a retrieval dispatcher.
///
/// Every field is always present. `route_type` serializes as `RAG`,
/// `DATABASE`, or `BOTH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResult {
    /// The query exactly as the user sent it.
    pub original_input: String,
    /// The default-filled rewrite (or the original input if rewriting failed).
    pub clarified_query: String,
    /// Which knowledge source(s) should answer.
    pub route_type: RouteType,
    /// Crop, location, and month for the query.
    pub extracted_info: ExtractedInfo,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A single-shot request to the text-generation port.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Sequences that end generation when produced.
    pub stop: Vec<String>,
}
