// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query router: clarification, route classification, and caching.
//!
//! Orchestrates the pipeline: routing cache > clarify (cached) > classify.
//! Nothing escapes [`QueryRouter::clarify_and_route`]: errors and panics
//! inside the pipeline become the fail-safe `BOTH` result.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use agrox_config::model::{AgroxConfig, DefaultsConfig};
use agrox_core::{AgroxError, ExtractedInfo, RouteType, RoutingResult, TextGenerator};
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, RouteCache};
use crate::clarifier::Clarifier;
use crate::decision::{RouteClassifier, RouteDecision};

/// Reasoning attached to the fail-safe result.
pub const FALLBACK_REASONING: &str = "system fallback";

/// Clarifies farming queries and routes them to RAG, DATABASE, or BOTH.
///
/// Safe to share across tasks. The cache lock is never held across a call to
/// the text-generation port, so concurrent misses on the same input may both
/// compute; the later write wins.
pub struct QueryRouter {
    clarifier: Clarifier,
    classifier: RouteClassifier,
    defaults: ExtractedInfo,
    cache: Mutex<RouteCache>,
}

impl QueryRouter {
    /// Create a router over `generator` with caches built from `config.cache`.
    pub fn new(generator: Arc<dyn TextGenerator>, config: &AgroxConfig) -> Self {
        Self::with_cache(generator, config, RouteCache::from_config(&config.cache))
    }

    /// Create a router with an explicitly constructed cache pair.
    pub fn with_cache(
        generator: Arc<dyn TextGenerator>,
        config: &AgroxConfig,
        cache: RouteCache,
    ) -> Self {
        let defaults = defaults_from_config(&config.defaults);
        Self {
            clarifier: Clarifier::new(
                Arc::clone(&generator),
                defaults.clone(),
                config.clarifier.clone(),
            ),
            classifier: RouteClassifier::new(generator, defaults.clone(), config.router.clone()),
            defaults,
            cache: Mutex::new(cache),
        }
    }

    /// Rewrite `input` with missing crop, location, and month filled in.
    ///
    /// Successful rewrites are cached. If the port fails, panics, or returns
    /// nothing, the input is returned unchanged and nothing is cached.
    pub async fn clarify(&self, input: &str) -> String {
        let cached = self.lock_cache().clarification(input);
        if let Some(clarified) = cached {
            debug!("clarification cache hit");
            return clarified;
        }
        debug!("clarification cache miss");

        let outcome = AssertUnwindSafe(self.clarifier.rewrite(input))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(AgroxError::Internal(format!(
                    "clarifier panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });

        match outcome {
            Ok(clarified) => {
                self.lock_cache()
                    .store_clarification(input, clarified.clone());
                clarified
            }
            Err(e) => {
                warn!(error = %e, "clarification failed, using original input");
                input.to_string()
            }
        }
    }

    /// Decide the route for an already clarified query. Not cached.
    pub async fn determine_route(
        &self,
        original: &str,
        clarified: &str,
    ) -> Result<RouteDecision, AgroxError> {
        self.classifier.determine_route(original, clarified).await
    }

    /// Clarify and route `input`. Always returns a result.
    ///
    /// Results computed by the pipeline are cached by input. The fail-safe
    /// result is not cached, so a later call retries the pipeline.
    pub async fn clarify_and_route(&self, input: &str) -> RoutingResult {
        let cached = self.lock_cache().route(input);
        if let Some(result) = cached {
            debug!(route = %result.route_type, "routing cache hit");
            return result;
        }
        debug!("routing cache miss");

        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.run_pipeline(input))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                info!(
                    route = %result.route_type,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "query routed"
                );
                self.lock_cache().store_route(input, result.clone());
                result
            }
            Ok(Err(e)) => {
                warn!(error = %e, "routing pipeline failed, using fail-safe route");
                self.fail_safe(input)
            }
            Err(panic) => {
                error!(
                    panic = panic_message(panic.as_ref()),
                    "routing pipeline panicked, using fail-safe route"
                );
                self.fail_safe(input)
            }
        }
    }

    /// Empty both caches.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        info!("caches cleared");
    }

    /// Current entry counts of both caches.
    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    async fn run_pipeline(&self, input: &str) -> Result<RoutingResult, AgroxError> {
        let clarified = self.clarify(input).await;
        let decision = self.determine_route(input, &clarified).await?;
        debug!(tier = %decision.tier, "route decided");

        Ok(RoutingResult {
            original_input: input.to_string(),
            clarified_query: clarified,
            route_type: decision.route_type,
            extracted_info: decision.extracted_info,
            reasoning: decision.reasoning,
        })
    }

    fn fail_safe(&self, input: &str) -> RoutingResult {
        RoutingResult {
            original_input: input.to_string(),
            clarified_query: input.to_string(),
            route_type: RouteType::Both,
            extracted_info: self.defaults.clone(),
            reasoning: FALLBACK_REASONING.to_string(),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, RouteCache> {
        // A panic never happens while the lock is held, but recover anyway.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn defaults_from_config(config: &DefaultsConfig) -> ExtractedInfo {
    ExtractedInfo::new(&config.crop, &config.location, &config.month)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
