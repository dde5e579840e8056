//! Sub-configuration structs with their defaults.

use crate::types::{Language, Vocabulary};
use serde::{Deserialize, Serialize};

/// Default public Annif endpoint.
pub const DEFAULT_ANNIF_BASE_URL: &str = "https://api.annif.org/v1/";

/// Vision-language model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VlmConfig {
    /// Base URL; `/v1/chat/completions` is appended (env: VLM_API_BASE_URL)
    pub base_url: String,

    /// Sent as `X-API-Key` when present (env: VLM_API_KEY)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name placed in the request body (env: VLM_MODEL)
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            model: "default".to_string(),
            max_tokens: 300,
            timeout_ms: 60_000,
        }
    }
}

impl VlmConfig {
    /// Chat completions endpoint derived from the base URL.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Annif subject indexing service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnifConfig {
    /// Base URL ending in `v1/` (env: ANNIF_API_BASE_URL)
    pub base_url: String,

    /// Maximum number of suggestions to request
    pub limit: u32,

    /// Minimum score for a suggestion to be returned
    pub threshold: f64,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for AnnifConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ANNIF_BASE_URL.to_string(),
            limit: 10,
            threshold: 0.0,
            timeout_ms: 30_000,
        }
    }
}

/// JPEG payload settings for the captioning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Longest edge in pixels; larger images are downscaled before encoding
    pub max_dimension: u32,

    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2048,
            jpeg_quality: 90,
        }
    }
}

/// Initial form selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub language: Language,
    pub vocabulary: Vocabulary,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
