// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pacelog.toml` > `~/.config/pacelog/pacelog.toml`
//! > `/etc/pacelog/pacelog.toml` with environment variable overrides via the
//! `PACELOG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PacelogConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pacelog/pacelog.toml` (system-wide)
/// 3. `~/.config/pacelog/pacelog.toml` (user XDG config)
/// 4. `./pacelog.toml` (local directory)
/// 5. `PACELOG_*` environment variables
pub fn load_config() -> Result<PacelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PacelogConfig::default()))
        .merge(Toml::file("/etc/pacelog/pacelog.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pacelog/pacelog.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pacelog.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and for loading a config from an in-memory string.
pub fn load_config_from_str(toml_content: &str) -> Result<PacelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PacelogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PacelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PacelogConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PACELOG_LINE_CHANNEL_SECRET` must map
/// to `line.channel_secret`, not `line.channel.secret`.
fn env_provider() -> Env {
    Env::prefixed("PACELOG_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PACELOG_LINE_CHANNEL_SECRET -> "line_channel_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("line_", "line.", 1)
            .replacen("typhoon_", "typhoon.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("pipeline_", "pipeline.", 1);
        mapped.into()
    })
}
