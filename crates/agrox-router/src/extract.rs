// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered extraction of routing fields from model output.
//!
//! Model output is tried against an ordered chain of pure extractors
//! ([`MODEL_TIERS`]): a structured JSON decode, then a loose `KEY: value`
//! pattern scan. When both return `None` the caller falls back to the
//! keyword rule table in [`crate::classifier`], which always answers.
//!
//! Extractors only report what they found. Defaults and route validation are
//! applied once, in [`normalize`], whichever tier produced the fields.

use std::sync::LazyLock;

use agrox_core::{ExtractedInfo, RouteType};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::classifier::KeywordRule;

/// Which strategy produced a routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// JSON object decoded from the model output.
    Structured,
    /// `KEY: value` markers scanned from the model output.
    Pattern,
    /// Keyword rule table over the clarified query.
    Keyword,
}

impl Tier {
    /// Reasoning used when the tier produced no `REASON` of its own.
    fn default_reason(self) -> &'static str {
        match self {
            Tier::Structured => "LLM provided route",
            Tier::Pattern => "Pattern fallback parsing",
            Tier::Keyword => "Fallback routing",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Structured => write!(f, "structured"),
            Tier::Pattern => write!(f, "pattern"),
            Tier::Keyword => write!(f, "keyword"),
        }
    }
}

/// Raw fields as a tier found them. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFields {
    pub route: Option<String>,
    pub reason: Option<String>,
    pub crop: Option<String>,
    pub location: Option<String>,
    pub month: Option<String>,
}

impl RouteFields {
    fn is_empty(&self) -> bool {
        self.route.is_none()
            && self.reason.is_none()
            && self.crop.is_none()
            && self.location.is_none()
            && self.month.is_none()
    }
}

impl From<KeywordRule> for RouteFields {
    fn from(rule: KeywordRule) -> Self {
        RouteFields {
            route: Some(rule.route().to_string()),
            reason: Some(format!("Fallback routing: {}", rule.reason())),
            ..Default::default()
        }
    }
}

/// A model-output extractor.
pub type Extractor = fn(&str) -> Option<RouteFields>;

/// Model-output tiers in the order they are tried.
pub const MODEL_TIERS: &[(Tier, Extractor)] = &[
    (Tier::Structured, structured_fields as Extractor),
    (Tier::Pattern, pattern_fields as Extractor),
];

/// Run the model-output tiers in order and return the first that succeeds.
pub fn extract_from_output(output: &str) -> Option<(Tier, RouteFields)> {
    MODEL_TIERS.iter().find_map(|(tier, extractor)| {
        let fields = extractor(output);
        if fields.is_none() {
            debug!(tier = %tier, "extraction tier found nothing");
        }
        fields.map(|f| (*tier, f))
    })
}

/// Tier 1: decode the span from the first `{` to the last `}` as a JSON object.
///
/// Keys match case-insensitively. String and number values are kept; null,
/// arrays, and nested objects count as missing.
pub fn structured_fields(output: &str) -> Option<RouteFields> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end < start {
        return None;
    }

    let value: Value = serde_json::from_str(&output[start..=end]).ok()?;
    let object = value.as_object()?;
    let field = |name: &str| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    };

    Some(RouteFields {
        route: field("ROUTE"),
        reason: field("REASON"),
        crop: field("CROP"),
        location: field("LOCATION"),
        month: field("MONTH"),
    })
}

static ROUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bROUTE["']?\s*:\s*["']?(\w+)"#).expect("route pattern is valid")
});

static VALUE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    ["REASON", "CROP", "LOCATION", "MONTH"].map(|key| {
        Regex::new(&format!(r#"(?i)\b{key}["']?\s*:\s*["']?([^"}}\n]+)"#))
            .expect("value pattern is valid")
    })
});

// Start of the next `KEY:` marker inside a captured value.
static NEXT_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i),?\s*["']?\b(?:ROUTE|REASON|CROP|LOCATION|MONTH)["']?\s*:"#)
        .expect("next key pattern is valid")
});

/// Tier 2: scan for `KEY: value` markers anywhere in the output.
///
/// Tolerates quotes around keys and values and any surrounding prose.
/// Several markers may share a line; a value ends where the next one begins.
/// Returns `None` only when no marker at all is present.
pub fn pattern_fields(output: &str) -> Option<RouteFields> {
    let capture = |pattern: &Regex| {
        pattern
            .captures(output)
            .and_then(|c| c.get(1))
            .map(|m| {
                let value = m.as_str();
                let end = NEXT_KEY_PATTERN
                    .find(value)
                    .map_or(value.len(), |next| next.start());
                value[..end]
                    .trim_matches([' ', '"', '\'', ',', '\t'])
                    .to_string()
            })
            .filter(|s| !s.is_empty())
    };

    let [reason, crop, location, month] = &*VALUE_PATTERNS;
    let fields = RouteFields {
        route: capture(&*ROUTE_PATTERN).map(|r| r.to_uppercase()),
        reason: capture(reason),
        crop: capture(crop),
        location: capture(location),
        month: capture(month),
    };

    (!fields.is_empty()).then_some(fields)
}

/// Routing fields after defaults and route validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRoute {
    pub route_type: RouteType,
    pub reasoning: String,
    pub extracted_info: ExtractedInfo,
}

/// Apply defaults and canonicalize the route, whichever tier produced `fields`.
///
/// Missing, blank, or unrecognized values are replaced: the route becomes
/// `BOTH`, slots take `defaults`, and reasoning takes the tier's generic text.
pub fn normalize(fields: RouteFields, tier: Tier, defaults: &ExtractedInfo) -> NormalizedRoute {
    let route_type = match fields.route.as_deref().map(|r| (r, RouteType::from_label(r))) {
        Some((_, Some(route))) => route,
        Some((label, None)) => {
            debug!(tier = %tier, label, "unrecognized route label, using BOTH");
            RouteType::Both
        }
        None => RouteType::Both,
    };

    let pick = |value: Option<String>, default: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    NormalizedRoute {
        route_type,
        reasoning: pick(fields.reason, tier.default_reason()),
        extracted_info: ExtractedInfo {
            crop: pick(fields.crop, &defaults.crop),
            location: pick(fields.location, &defaults.location),
            month: pick(fields.month, &defaults.month),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_tier_reads_json_with_surrounding_prose() {
        let output = r#"Sure, here you go:
{
  "ROUTE": "DATABASE",
  "REASON": "soil chemistry question",
  "CROP": "tomatoes",
  "LOCATION": "Onitsha",
  "MONTH": "July"
}
Hope that helps."#;

        let (tier, fields) = extract_from_output(output).unwrap();
        assert_eq!(tier, Tier::Structured);
        assert_eq!(fields.route.as_deref(), Some("DATABASE"));
        assert_eq!(fields.reason.as_deref(), Some("soil chemistry question"));
        assert_eq!(fields.crop.as_deref(), Some("tomatoes"));
    }

    #[test]
    fn structured_tier_matches_keys_case_insensitively() {
        let fields = structured_fields(r#"{"route": "rag", "crop": "cassava"}"#).unwrap();
        assert_eq!(fields.route.as_deref(), Some("rag"));
        assert_eq!(fields.crop.as_deref(), Some("cassava"));
        assert!(fields.month.is_none());
    }

    #[test]
    fn structured_tier_rejects_non_objects_and_garbage() {
        assert!(structured_fields("no braces here").is_none());
        assert!(structured_fields("} backwards {").is_none());
        assert!(structured_fields("{ROUTE: RAG, CROP: maize}").is_none());
    }

    #[test]
    fn malformed_json_falls_through_to_pattern_tier() {
        let output = "{ROUTE: RAG, REASON: planting steps\nCROP: cassava\nMONTH: April}";
        let (tier, fields) = extract_from_output(output).unwrap();
        assert_eq!(tier, Tier::Pattern);
        assert_eq!(fields.route.as_deref(), Some("RAG"));
        assert_eq!(fields.crop.as_deref(), Some("cassava"));
        assert_eq!(fields.month.as_deref(), Some("April"));
        assert!(fields.location.is_none());
    }

    #[test]
    fn pattern_tier_uppercases_route_and_strips_quotes() {
        let output = "route: 'database'\n\"crop\": \"yam\",\nLocation:  Nsukka ";
        let fields = pattern_fields(output).unwrap();
        assert_eq!(fields.route.as_deref(), Some("DATABASE"));
        assert_eq!(fields.crop.as_deref(), Some("yam"));
        assert_eq!(fields.location.as_deref(), Some("Nsukka"));
    }

    #[test]
    fn pattern_tier_splits_markers_on_one_line() {
        let output = "{ROUTE: RAG, REASON: steps, CROP: cassava, LOCATION: Awka, MONTH: April}";
        let (tier, fields) = extract_from_output(output).unwrap();
        assert_eq!(tier, Tier::Pattern);
        assert_eq!(fields.route.as_deref(), Some("RAG"));
        assert_eq!(fields.reason.as_deref(), Some("steps"));
        assert_eq!(fields.crop.as_deref(), Some("cassava"));
        assert_eq!(fields.location.as_deref(), Some("Awka"));
        assert_eq!(fields.month.as_deref(), Some("April"));
    }

    #[test]
    fn pattern_tier_reads_single_quoted_dict() {
        let output = "{'ROUTE': 'RAG', 'CROP': 'cassava', 'LOCATION': 'Awka', 'MONTH': 'April'}";
        let (tier, fields) = extract_from_output(output).unwrap();
        assert_eq!(tier, Tier::Pattern);
        assert_eq!(fields.route.as_deref(), Some("RAG"));
        assert_eq!(fields.crop.as_deref(), Some("cassava"));
        assert_eq!(fields.location.as_deref(), Some("Awka"));
        assert_eq!(fields.month.as_deref(), Some("April"));
    }

    #[test]
    fn pattern_tier_keeps_commas_inside_a_value() {
        let fields = pattern_fields("ROUTE: BOTH\nREASON: planting steps, plus soil data\n").unwrap();
        assert_eq!(fields.reason.as_deref(), Some("planting steps, plus soil data"));
    }

    #[test]
    fn pattern_tier_needs_at_least_one_marker() {
        assert!(pattern_fields("I think this question is about soil.").is_none());
        assert!(extract_from_output("").is_none());
    }

    #[test]
    fn normalize_fills_defaults_and_canonicalizes_route() {
        let defaults = ExtractedInfo::default();
        let fields = RouteFields {
            route: Some("rag".into()),
            crop: Some("  ".into()),
            ..Default::default()
        };
        let normalized = normalize(fields, Tier::Pattern, &defaults);
        assert_eq!(normalized.route_type, RouteType::Rag);
        assert_eq!(normalized.reasoning, "Pattern fallback parsing");
        assert_eq!(normalized.extracted_info, defaults);
    }

    #[test]
    fn normalize_turns_unknown_route_into_both() {
        let fields = RouteFields {
            route: Some("RAG or DATABASE or BOTH".into()),
            reason: Some("template echo".into()),
            ..Default::default()
        };
        let normalized = normalize(fields, Tier::Structured, &ExtractedInfo::default());
        assert_eq!(normalized.route_type, RouteType::Both);
        assert_eq!(normalized.reasoning, "template echo");

        let missing = normalize(RouteFields::default(), Tier::Structured, &ExtractedInfo::default());
        assert_eq!(missing.route_type, RouteType::Both);
        assert_eq!(missing.reasoning, "LLM provided route");
    }

    #[test]
    fn normalize_uses_configured_defaults() {
        let defaults = ExtractedInfo::new("sorghum", "Kano", "June");
        let normalized = normalize(RouteFields::default(), Tier::Structured, &defaults);
        assert_eq!(normalized.extracted_info, defaults);
    }

    #[test]
    fn keyword_rule_converts_to_fields() {
        let fields = RouteFields::from(KeywordRule::CropSuitability);
        let normalized = normalize(fields, Tier::Keyword, &ExtractedInfo::default());
        assert_eq!(normalized.route_type, RouteType::Database);
        assert_eq!(
            normalized.reasoning,
            "Fallback routing: crop suitability keywords"
        );
        assert_eq!(normalized.extracted_info, ExtractedInfo::default());
    }
}
