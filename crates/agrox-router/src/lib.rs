// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query clarification and multi-tier routing for the AgroX farming assistant.
//!
//! This crate provides:
//! - [`QueryRouter`]: the cached clarify-then-route pipeline with a fail-safe result
//! - [`Clarifier`]: default-filling query rewrites through a [`agrox_core::TextGenerator`]
//! - [`RouteClassifier`]: route decisions from structured, pattern, or keyword tiers
//! - [`RouteCache`]: content-addressed caches with pluggable eviction
//!
//! The router sits in front of the retrieval layer, deciding whether a farming
//! question should be answered from how-to guides (RAG), the soil and crop
//! database (DATABASE), or both.

pub mod cache;
pub mod clarifier;
pub mod classifier;
pub mod decision;
pub mod extract;
pub mod prompts;
pub mod router;

pub use cache::{cache_key, CacheStats, EvictionPolicy, LruEviction, NoEviction, RouteCache};
pub use clarifier::Clarifier;
pub use classifier::{classify_keywords, KeywordRule};
pub use decision::{RouteClassifier, RouteDecision};
pub use extract::Tier;
pub use router::{QueryRouter, FALLBACK_REASONING};
