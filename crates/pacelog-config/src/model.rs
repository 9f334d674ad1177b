// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the pacelog bot backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level pacelog configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional at deserialization time; required
/// credentials are enforced by post-load validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PacelogConfig {
    /// Process-wide settings (log level).
    #[serde(default)]
    pub agent: AgentConfig,

    /// LINE Messaging API settings.
    #[serde(default)]
    pub line: LineConfig,

    /// Typhoon OCR/chat API settings.
    #[serde(default)]
    pub typhoon: TyphoonConfig,

    /// Storage backend settings (SQLite + media directory).
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Pipeline tuning (timeouts, image normalization).
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Process-wide settings.
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

/// LINE Messaging API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Channel secret used to verify webhook signatures. Required.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Channel access token for the Messaging API. Required.
    #[serde(default)]
    pub channel_access_token: Option<String>,

    /// Base URL of the Messaging API (reply/push/profile).
    #[serde(default = "default_line_api_base")]
    pub api_base_url: String,

    /// Base URL of the content API (message binary download).
    #[serde(default = "default_line_data_base")]
    pub data_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_access_token: None,
            api_base_url: default_line_api_base(),
            data_base_url: default_line_data_base(),
        }
    }
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_line_data_base() -> String {
    "https://api-data.line.me".to_string()
}

/// Typhoon API configuration (OCR + chat completions).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TyphoonConfig {
    /// Bearer token for the Typhoon API. Required.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Typhoon API.
    #[serde(default = "default_typhoon_base")]
    pub base_url: String,

    /// Model identifier for the OCR endpoint.
    #[serde(default = "default_ocr_model")]
    pub ocr_model: String,

    /// Model identifier for the chat-completion endpoint.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

impl Default for TyphoonConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_typhoon_base(),
            ocr_model: default_ocr_model(),
            chat_model: default_chat_model(),
        }
    }
}

fn default_typhoon_base() -> String {
    "https://api.opentyphoon.ai".to_string()
}

fn default_ocr_model() -> String {
    "typhoon-ocr".to_string()
}

fn default_chat_model() -> String {
    "typhoon-v2.5-30b-a3b-instruct".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory where original run images are written.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,

    /// Public base URL under which files in `media_dir` are served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            media_dir: default_media_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pacelog").join("pacelog.db"))
        .and_then(|p| p.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "pacelog.db".to_string())
}

fn default_media_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("pacelog").join("media"))
        .and_then(|p| p.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "media".to_string())
}

fn default_public_base_url() -> String {
    "http://localhost:3000/media".to_string()
}

/// Webhook gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Per-external-call timeout in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Maximum image width after normalization; smaller images are never
    /// enlarged.
    #[serde(default = "default_max_image_width")]
    pub max_image_width: u32,

    /// Fixed grayscale cutoff for binarization (0-255).
    #[serde(default = "default_binarize_threshold")]
    pub binarize_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout_secs(),
            max_image_width: default_max_image_width(),
            binarize_threshold: default_binarize_threshold(),
        }
    }
}

fn default_call_timeout_secs() -> u64 {
    60
}

fn default_max_image_width() -> u32 {
    1000
}

fn default_binarize_threshold() -> u8 {
    160
}
