// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./semrouter.toml` > `~/.config/semrouter/semrouter.toml`
//! > `/etc/semrouter/semrouter.toml` with environment variable overrides via
//! the `SEMROUTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SemrouterConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/semrouter/semrouter.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "semrouter.toml";

/// Per-user config file under the XDG config dir, if one can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("semrouter/semrouter.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/semrouter/semrouter.toml`
/// 3. `~/.config/semrouter/semrouter.toml`
/// 4. `./semrouter.toml`
/// 5. `SEMROUTER_*` environment variables
pub fn load_config() -> Result<SemrouterConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SemrouterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SemrouterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SemrouterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SemrouterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SemrouterConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
///
/// Only the first section separator is rewritten so that underscore-containing
/// keys survive: `classifier_timeout_ms` -> `classifier.timeout_ms`.
/// `data_collection_` is matched first since the section name itself
/// contains an underscore.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 6] = [
        "data_collection",
        "classifier",
        "routing",
        "cache",
        "monitoring",
        "server",
    ];

    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}

/// Environment variable provider using explicit section mapping.
///
/// `Env::split("_")` would turn `SEMROUTER_CACHE_TTL_SECONDS` into
/// `cache.ttl.seconds`; the explicit map keeps it `cache.ttl_seconds`.
fn env_provider() -> Env {
    Env::prefixed("SEMROUTER_").map(|key| map_env_key(key.as_str()).into())
}
