// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route classification across the extraction tiers.
//!
//! Order: model call → structured parse → pattern parse → keyword rules.
//! A failed port call skips straight to the keyword rules.

use std::sync::Arc;

use agrox_config::model::RouterConfig;
use agrox_core::{AgroxError, ExtractedInfo, GenerationRequest, RouteType, TextGenerator};
use tracing::{debug, info, warn};

use crate::classifier::classify_keywords;
use crate::extract::{self, RouteFields, Tier};
use crate::prompts;

/// A normalized routing decision and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub route_type: RouteType,
    pub reasoning: String,
    pub extracted_info: ExtractedInfo,
    pub tier: Tier,
}

/// Classifies a clarified query into a [`RouteDecision`].
pub struct RouteClassifier {
    generator: Arc<dyn TextGenerator>,
    defaults: ExtractedInfo,
    config: RouterConfig,
}

impl RouteClassifier {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        defaults: ExtractedInfo,
        config: RouterConfig,
    ) -> Self {
        Self {
            generator,
            defaults,
            config,
        }
    }

    /// Decide the route for `clarified` (with `original` shown to the model for context).
    ///
    /// Port and parse failures cascade down the tiers. An error is returned
    /// only when the model tiers fail and `keyword_fallback` is disabled.
    pub async fn determine_route(
        &self,
        original: &str,
        clarified: &str,
    ) -> Result<RouteDecision, AgroxError> {
        let request = GenerationRequest {
            prompt: prompts::route_prompt(original, clarified),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stop: self.config.stop.clone(),
        };

        let failure = match self.generator.generate(request).await {
            Ok(output) => match extract::extract_from_output(&output) {
                Some((tier, fields)) => {
                    let decision = self.decide(fields, tier);
                    debug!(tier = %tier, route = %decision.route_type, "route extracted from model output");
                    return Ok(decision);
                }
                None => {
                    warn!(chars = output.len(), "model output had no usable routing fields");
                    "model output had no usable routing fields".to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, generator = self.generator.name(), "route generation failed");
                format!("route generation failed: {e}")
            }
        };

        if !self.config.keyword_fallback {
            return Err(AgroxError::Routing(failure));
        }

        Ok(self.keyword_route(clarified))
    }

    /// The keyword-rule decision for `clarified`, without calling the model.
    pub fn keyword_route(&self, clarified: &str) -> RouteDecision {
        let rule = classify_keywords(clarified);
        info!(rule = %rule, route = %rule.route(), "keyword fallback routing");
        self.decide(RouteFields::from(rule), Tier::Keyword)
    }

    fn decide(&self, fields: RouteFields, tier: Tier) -> RouteDecision {
        let normalized = extract::normalize(fields, tier, &self.defaults);
        RouteDecision {
            route_type: normalized.route_type,
            reasoning: normalized.reasoning,
            extracted_info: normalized.extracted_info,
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrox_test_utils::{MockGenerator, MockReply};

    fn classifier(generator: Arc<MockGenerator>, config: RouterConfig) -> RouteClassifier {
        RouteClassifier::new(generator, ExtractedInfo::default(), config)
    }

    #[tokio::test]
    async fn json_output_is_used_verbatim() {
        let generator = Arc::new(MockGenerator::always(
            r#"{"ROUTE": "RAG", "REASON": "planting steps", "CROP": "cassava", "LOCATION": "Awka", "MONTH": "April"}"#,
        ));
        let decision = classifier(generator, RouterConfig::default())
            .determine_route("plant cassava", "How to plant cassava in Awka in April?")
            .await
            .unwrap();

        assert_eq!(decision.tier, Tier::Structured);
        assert_eq!(decision.route_type, RouteType::Rag);
        assert_eq!(decision.reasoning, "planting steps");
        assert_eq!(decision.extracted_info, ExtractedInfo::new("cassava", "Awka", "April"));
    }

    #[tokio::test]
    async fn sends_router_parameters() {
        let generator = Arc::new(MockGenerator::always("{}"));
        classifier(generator.clone(), RouterConfig::default())
            .determine_route("a", "b")
            .await
            .unwrap();

        let requests = generator.requests().await;
        assert_eq!(requests[0].max_tokens, 200);
        assert!((requests[0].temperature - 0.1).abs() < f32::EPSILON);
        assert!(requests[0].prompt.contains("Clarified: \"b\""));
    }

    #[tokio::test]
    async fn empty_json_object_defaults_everything() {
        let generator = Arc::new(MockGenerator::always("{}"));
        let decision = classifier(generator, RouterConfig::default())
            .determine_route("x", "x")
            .await
            .unwrap();
        assert_eq!(decision.tier, Tier::Structured);
        assert_eq!(decision.route_type, RouteType::Both);
        assert_eq!(decision.extracted_info, ExtractedInfo::default());
    }

    #[tokio::test]
    async fn port_failure_uses_keyword_rules() {
        let generator = Arc::new(MockGenerator::failing());
        let decision = classifier(generator, RouterConfig::default())
            .determine_route("soil pH for tomatoes", "soil pH for tomatoes")
            .await
            .unwrap();
        assert_eq!(decision.tier, Tier::Keyword);
        assert_eq!(decision.route_type, RouteType::Database);
        assert_eq!(decision.reasoning, "Fallback routing: soil/nutrient keywords");
        assert_eq!(decision.extracted_info, ExtractedInfo::default());
    }

    #[tokio::test]
    async fn unparseable_output_uses_keyword_rules_on_clarified_text() {
        let generator = Arc::new(MockGenerator::with_replies(vec![MockReply::text(
            "I am not sure what you mean.",
        )]));
        let decision = classifier(generator, RouterConfig::default())
            .determine_route("maize", "How to plant maize in Onitsha in July?")
            .await
            .unwrap();
        assert_eq!(decision.tier, Tier::Keyword);
        assert_eq!(decision.route_type, RouteType::Rag);
    }

    #[tokio::test]
    async fn disabled_keyword_fallback_reports_failure() {
        let config = RouterConfig {
            keyword_fallback: false,
            ..RouterConfig::default()
        };
        let generator = Arc::new(MockGenerator::failing());
        let err = classifier(generator, config)
            .determine_route("maize", "maize")
            .await
            .unwrap_err();
        assert!(matches!(err, AgroxError::Routing(_)));
    }
}
