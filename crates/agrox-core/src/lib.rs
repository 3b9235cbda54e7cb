// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the AgroX query router.
//!
//! This crate provides the error type, the text-generation port trait, and
//! the routing value types shared by every other crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AgroxError;
pub use traits::TextGenerator;
pub use types::{
    ExtractedInfo, GenerationRequest, RouteType, RoutingResult, DEFAULT_CROP, DEFAULT_LOCATION,
    DEFAULT_MONTH,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn agrox_error_has_all_variants() {
        let _config = AgroxError::Config("test".into());
        let _generation = AgroxError::Generation {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _empty = AgroxError::EmptyGeneration;
        let _timeout = AgroxError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _routing = AgroxError::Routing("test".into());
        let _internal = AgroxError::Internal("test".into());
    }

    #[test]
    fn route_type_display_and_from_str() {
        use std::str::FromStr;

        for (variant, label) in [
            (RouteType::Rag, "RAG"),
            (RouteType::Database, "DATABASE"),
            (RouteType::Both, "BOTH"),
        ] {
            assert_eq!(variant.to_string(), label);
            assert_eq!(RouteType::from_str(label).unwrap(), variant);
        }
    }

    #[test]
    fn route_type_from_label_is_case_insensitive() {
        assert_eq!(RouteType::from_label("rag"), Some(RouteType::Rag));
        assert_eq!(RouteType::from_label(" Database "), Some(RouteType::Database));
        assert_eq!(RouteType::from_label("\"both\""), Some(RouteType::Both));
        assert_eq!(RouteType::from_label("RAG or DATABASE or BOTH"), None);
        assert_eq!(RouteType::from_label(""), None);
    }

    #[test]
    fn extracted_info_defaults() {
        let info = ExtractedInfo::default();
        assert_eq!(info.crop, "maize");
        assert_eq!(info.location, "Onitsha");
        assert_eq!(info.month, "July");
    }

    #[test]
    fn routing_result_json_shape() {
        let result = RoutingResult {
            original_input: "soil pH for tomatoes".into(),
            clarified_query: "What is the soil pH requirement for tomatoes in Onitsha in July?"
                .into(),
            route_type: RouteType::Database,
            extracted_info: ExtractedInfo::new("tomatoes", "Onitsha", "July"),
            reasoning: "soil question".into(),
        };
        let json = serde_json::to_value(&result).expect("should serialize");

        assert_eq!(json["route_type"], "DATABASE");
        assert_eq!(json["extracted_info"]["crop"], "tomatoes");
        assert_eq!(json["extracted_info"]["location"], "Onitsha");
        assert_eq!(json["extracted_info"]["month"], "July");
        assert_eq!(json["original_input"], "soil pH for tomatoes");
        assert!(json.get("clarified_query").is_some());
        assert!(json.get("reasoning").is_some());

        let parsed: RoutingResult = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(parsed, result);
    }

    proptest! {
        #[test]
        fn from_label_only_yields_canonical_routes(label in ".*") {
            if let Some(route) = RouteType::from_label(&label) {
                let canonical = route.to_string();
                prop_assert!(["RAG", "DATABASE", "BOTH"].contains(&canonical.as_str()));
            }
        }
    }
}
