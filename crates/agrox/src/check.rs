// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agrox check-config` command implementation.
//!
//! Reaching this command means the configuration already loaded and
//! validated; it prints the effective settings the router will use.

use std::path::Path;

use agrox_config::model::CachePolicy;
use agrox_config::AgroxConfig;

/// Run the `agrox check-config` command.
pub fn run_check_config(config: &AgroxConfig, path: Option<&Path>) {
    for line in summary_lines(config, path) {
        println!("{line}");
    }
}

/// Human-readable summary of the effective configuration.
fn summary_lines(config: &AgroxConfig, path: Option<&Path>) -> Vec<String> {
    let source = match path {
        Some(path) => path.display().to_string(),
        None => "standard locations + AGROX_* environment".to_string(),
    };
    let cache = match (config.cache.policy, config.cache.capacity) {
        (CachePolicy::Lru, Some(capacity)) => format!("lru (capacity {capacity})"),
        (CachePolicy::Lru, None) => "lru".to_string(),
        (CachePolicy::Unbounded, _) => "unbounded".to_string(),
    };

    vec![
        format!("agrox: configuration is valid ({source})"),
        format!(
            "  defaults:   crop={} location={} month={}",
            config.defaults.crop, config.defaults.location, config.defaults.month
        ),
        format!(
            "  clarifier:  max_tokens={} temperature={}",
            config.clarifier.max_tokens, config.clarifier.temperature
        ),
        format!(
            "  router:     max_tokens={} temperature={} keyword_fallback={}",
            config.router.max_tokens, config.router.temperature, config.router.keyword_fallback
        ),
        format!("  cache:      {cache}, key_length={}", config.cache.key_length),
        format!(
            "  llama:      {} (timeout {}s, {} retries)",
            config.llama.base_url, config.llama.timeout_secs, config.llama.max_retries
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_defaults() {
        let lines = summary_lines(&AgroxConfig::default(), None);
        assert!(lines[0].contains("configuration is valid"));
        assert!(lines.iter().any(|l| l.contains("crop=maize location=Onitsha month=July")));
        assert!(lines.iter().any(|l| l.contains("unbounded")));
        assert!(lines.iter().any(|l| l.contains("http://127.0.0.1:8080")));
    }

    #[test]
    fn summary_reports_lru_capacity_and_path() {
        let config = agrox_config::load_and_validate_str(
            "[cache]\npolicy = \"lru\"\ncapacity = 64\n",
        )
        .unwrap();
        let lines = summary_lines(&config, Some(Path::new("/etc/agrox/agrox.toml")));
        assert!(lines[0].contains("/etc/agrox/agrox.toml"));
        assert!(lines.iter().any(|l| l.contains("lru (capacity 64)")));
    }
}
