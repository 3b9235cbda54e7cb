// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./agrox.toml` > `~/.config/agrox/agrox.toml` > `/etc/agrox/agrox.toml`
//! with environment variable overrides via `AGROX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AgroxConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/agrox/agrox.toml";

/// Local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "agrox.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/agrox/agrox.toml` (system-wide)
/// 3. `~/.config/agrox/agrox.toml` (user XDG config)
/// 4. `./agrox.toml` (local directory)
/// 5. `AGROX_*` environment variables
pub fn load_config() -> Result<AgroxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AgroxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgroxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AgroxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgroxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AgroxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("agrox").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` because keys contain underscores:
/// `AGROX_ROUTER_MAX_TOKENS` must map to `router.max_tokens`, not `router.max.tokens`.
fn env_provider() -> Env {
    Env::prefixed("AGROX_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    const SECTIONS: &[&str] = &[
        "agent", "defaults", "clarifier", "router", "cache", "llama",
    ];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
