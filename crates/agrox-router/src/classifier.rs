// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword rule table for routing without a language model.
//!
//! The last tier of the routing chain. Pure, deterministic, and total: every
//! input text matches exactly one rule, and earlier rules take precedence.

use agrox_core::RouteType;

/// Procedural phrasing (rule 1).
const PROCEDURAL_PHRASES: &[&str] = &[
    "how to", "how do", "steps to", "guide to", "procedure", "method",
];

/// Soil chemistry vocabulary (rule 2). Plain substring match, so "ph" also hits "phosphorus".
const SOIL_TERMS: &[&str] = &[
    "soil", "ph", "nutrient", "fertilizer", "nitrogen", "phosphorus", "potassium",
];

/// Crop suitability phrasing (rule 3).
const SUITABILITY_PHRASES: &[&str] = &[
    "what to plant", "which plant", "good to grow", "suitable for",
];

/// Land preparation context (rule 4, only together with "plant").
const LAND_TERMS: &[&str] = &["prepare", "land", "field"];

/// The rule that decided a keyword route, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordRule {
    Procedural,
    SoilNutrient,
    CropSuitability,
    LandPreparation,
    /// No rule matched. Ambiguous queries go to the database.
    Default,
}

impl KeywordRule {
    pub fn route(self) -> RouteType {
        match self {
            KeywordRule::Procedural | KeywordRule::LandPreparation => RouteType::Rag,
            KeywordRule::SoilNutrient | KeywordRule::CropSuitability | KeywordRule::Default => {
                RouteType::Database
            }
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            KeywordRule::Procedural => "procedural keywords",
            KeywordRule::SoilNutrient => "soil/nutrient keywords",
            KeywordRule::CropSuitability => "crop suitability keywords",
            KeywordRule::LandPreparation => "land preparation keywords",
            KeywordRule::Default => "default fallback",
        }
    }
}

impl std::fmt::Display for KeywordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Apply the rule table to `text` and return the first matching rule.
pub fn classify_keywords(text: &str) -> KeywordRule {
    let lower = text.to_lowercase();
    let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if contains_any(PROCEDURAL_PHRASES) {
        KeywordRule::Procedural
    } else if contains_any(SOIL_TERMS) {
        KeywordRule::SoilNutrient
    } else if contains_any(SUITABILITY_PHRASES) {
        KeywordRule::CropSuitability
    } else if lower.contains("plant") && contains_any(LAND_TERMS) {
        KeywordRule::LandPreparation
    } else {
        KeywordRule::Default
    }
}
