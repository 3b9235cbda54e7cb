// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the AgroX query router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use agrox_core::{DEFAULT_CROP, DEFAULT_LOCATION, DEFAULT_MONTH};
use serde::{Deserialize, Serialize};

/// Top-level AgroX configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgroxConfig {
    /// Process-level settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Slot values assumed when a query leaves them out.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Query clarification generation settings.
    #[serde(default)]
    pub clarifier: ClarifierConfig,

    /// Route classification generation settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Clarification and routing cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// llama.cpp completion server settings.
    #[serde(default)]
    pub llama: LlamaConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default slot values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default = "default_crop")]
    pub crop: String,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_month")]
    pub month: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            crop: default_crop(),
            location: default_location(),
            month: default_month(),
        }
    }
}

fn default_crop() -> String {
    DEFAULT_CROP.to_string()
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_month() -> String {
    DEFAULT_MONTH.to_string()
}

/// Generation parameters for the clarification prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClarifierConfig {
    /// Max tokens for the rewritten query.
    #[serde(default = "default_clarifier_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for the rewrite.
    #[serde(default = "default_clarifier_temperature")]
    pub temperature: f32,

    /// Stop sequences that keep the model from echoing further few-shot examples.
    #[serde(default = "default_stop_sequences")]
    pub stop: Vec<String>,
}

impl Default for ClarifierConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_clarifier_max_tokens(),
            temperature: default_clarifier_temperature(),
            stop: default_stop_sequences(),
        }
    }
}

fn default_clarifier_max_tokens() -> u32 {
    100
}

fn default_clarifier_temperature() -> f32 {
    0.2
}

fn default_stop_sequences() -> Vec<String> {
    ["</s>", "\n\n", "Input:", "Original:"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Generation parameters and fallback policy for route classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Max tokens for the JSON routing answer.
    #[serde(default = "default_router_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for the routing answer.
    #[serde(default = "default_router_temperature")]
    pub temperature: f32,

    /// Stop sequences for the routing answer.
    #[serde(default = "default_stop_sequences")]
    pub stop: Vec<String>,

    /// Fall back to the keyword rule table when the model tiers fail.
    /// When false, such queries get the fail-safe `BOTH` result instead.
    #[serde(default = "default_keyword_fallback")]
    pub keyword_fallback: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_router_max_tokens(),
            temperature: default_router_temperature(),
            stop: default_stop_sequences(),
            keyword_fallback: default_keyword_fallback(),
        }
    }
}

fn default_router_max_tokens() -> u32 {
    200
}

fn default_router_temperature() -> f32 {
    0.1
}

fn default_keyword_fallback() -> bool {
    true
}

/// Cache eviction policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Entries live until an explicit clear.
    #[default]
    Unbounded,
    /// Least-recently-used eviction once `capacity` entries are held.
    Lru,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Eviction policy applied to both caches.
    #[serde(default)]
    pub policy: CachePolicy,

    /// Per-cache entry limit. Required when `policy = "lru"`.
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Number of hex characters kept from the input digest.
    #[serde(default = "default_key_length")]
    pub key_length: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            policy: CachePolicy::default(),
            capacity: None,
            key_length: default_key_length(),
        }
    }
}

fn default_key_length() -> usize {
    16
}

/// llama.cpp completion server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlamaConfig {
    /// Base URL of the server (the `/completion` path is appended).
    #[serde(default = "default_llama_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_llama_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a transient HTTP status.
    #[serde(default = "default_llama_max_retries")]
    pub max_retries: u32,
}

impl Default for LlamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_llama_base_url(),
            timeout_secs: default_llama_timeout_secs(),
            max_retries: default_llama_max_retries(),
        }
    }
}

fn default_llama_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_llama_timeout_secs() -> u64 {
    120
}

fn default_llama_max_retries() -> u32 {
    1
}
