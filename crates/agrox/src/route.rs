// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agrox route` and `agrox batch` command implementations.

use std::path::Path;
use std::sync::Arc;

use agrox_config::AgroxConfig;
use agrox_core::{AgroxError, RoutingResult};
use agrox_llama::LlamaGenerator;
use agrox_router::{CacheStats, QueryRouter};
use serde::Serialize;
use tracing::info;

/// Queries routed by `agrox batch` when no file is given.
pub const DEMO_QUERIES: [&str; 8] = [
    "which plant is good to grow in Onitsha south",
    "soil pH for tomatoes",
    "how to plant maize",
    "fertilizer requirements for maize in August",
    "step by step guide to planting cassava",
    "what is the nitrogen content of my soil",
    "how to prepare land for farming",
    "phosphorus levels in Onitsha soil",
];

/// Results of a batch run plus the cache sizes after it.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub results: Vec<RoutingResult>,
    pub cache_stats: CacheStats,
}

fn build_router(config: &AgroxConfig) -> Result<QueryRouter, AgroxError> {
    let generator = LlamaGenerator::new(&config.llama)?;
    Ok(QueryRouter::new(Arc::new(generator), config))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AgroxError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(|e| AgroxError::Internal(format!("failed to encode JSON: {e}")))
}

/// Run the `agrox route` command.
pub async fn run_route(config: &AgroxConfig, query: &str) -> Result<(), AgroxError> {
    let router = build_router(config)?;
    let result = router.clarify_and_route(query).await;
    println!("{}", to_json(&result, true)?);
    Ok(())
}

/// Run the `agrox batch` command: one JSON line per query, then the cache stats.
pub async fn run_batch(config: &AgroxConfig, file: Option<&Path>) -> Result<(), AgroxError> {
    let queries = match file {
        Some(path) => read_queries(path)?,
        None => DEMO_QUERIES.iter().map(|q| q.to_string()).collect(),
    };

    let router = build_router(config)?;
    let report = route_batch(&router, &queries).await;

    for result in &report.results {
        println!("{}", to_json(result, false)?);
    }
    println!(
        "{}",
        to_json(&serde_json::json!({ "cache_stats": report.cache_stats }), false)?
    );
    Ok(())
}

/// Route `queries` in order through `router`.
pub async fn route_batch(router: &QueryRouter, queries: &[String]) -> BatchReport {
    let mut results = Vec::with_capacity(queries.len());
    for query in queries {
        results.push(router.clarify_and_route(query).await);
    }

    let cache_stats = router.cache_stats();
    info!(
        queries = queries.len(),
        clarifications = cache_stats.clarification_cache_size,
        routes = cache_stats.routing_cache_size,
        "batch complete"
    );
    BatchReport {
        results,
        cache_stats,
    }
}

/// Read one query per line, skipping blank lines and `#` comments.
pub fn read_queries(path: &Path) -> Result<Vec<String>, AgroxError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AgroxError::Config(format!("failed to read query file {}: {e}", path.display()))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
