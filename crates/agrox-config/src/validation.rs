// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! non-empty slot defaults, positive token budgets, sane temperatures, and a
//! usable cache policy.

use crate::diagnostic::ConfigError;
use crate::model::{AgroxConfig, CachePolicy};

/// Highest sampling temperature accepted for either prompt.
const MAX_TEMPERATURE: f32 = 2.0;

/// Accepted range for the cache key length, in hex characters.
const KEY_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 8..=64;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &AgroxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    for (key, value) in [
        ("defaults.crop", &config.defaults.crop),
        ("defaults.location", &config.defaults.location),
        ("defaults.month", &config.defaults.month),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    for (section, max_tokens, temperature) in [
        ("clarifier", config.clarifier.max_tokens, config.clarifier.temperature),
        ("router", config.router.max_tokens, config.router.temperature),
    ] {
        if max_tokens == 0 {
            fail(format!("{section}.max_tokens must be greater than 0"));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            fail(format!(
                "{section}.temperature must be between 0.0 and {MAX_TEMPERATURE}, got {temperature}"
            ));
        }
    }

    match (config.cache.policy, config.cache.capacity) {
        (CachePolicy::Lru, None) => {
            fail("cache.capacity is required when cache.policy = \"lru\"".to_string());
        }
        (CachePolicy::Lru, Some(0)) => {
            fail("cache.capacity must be greater than 0".to_string());
        }
        _ => {}
    }

    if !KEY_LENGTH_RANGE.contains(&config.cache.key_length) {
        fail(format!(
            "cache.key_length must be between {} and {}, got {}",
            KEY_LENGTH_RANGE.start(),
            KEY_LENGTH_RANGE.end(),
            config.cache.key_length
        ));
    }

    if config.llama.base_url.trim().is_empty() {
        fail("llama.base_url must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
