//! Configuration validation: required settings, URL shape and range checks.

use crate::error::ConfigError;
use reqwest::Url;

use super::env::VLM_API_BASE_URL;
use super::Config;

impl Config {
    /// Validate that required settings are present and values are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vlm.base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: VLM_API_BASE_URL,
            });
        }
        check_url("vlm.base_url", &self.vlm.base_url)?;

        check_url("annif.base_url", &self.annif.base_url)?;
        if !self.annif.base_url.ends_with("v1/") {
            return Err(ConfigError::ValidationError(format!(
                "annif.base_url must end with 'v1/' (got '{}')",
                self.annif.base_url
            )));
        }

        if self.vlm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.max_tokens must be > 0".into(),
            ));
        }
        if self.vlm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.timeout_ms must be > 0".into(),
            ));
        }
        if self.annif.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "annif.timeout_ms must be > 0".into(),
            ));
        }
        if self.annif.limit == 0 {
            return Err(ConfigError::ValidationError(
                "annif.limit must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.annif.threshold) {
            return Err(ConfigError::ValidationError(
                "annif.threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.image.max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "image.max_dimension must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.image.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "image.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{field} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{field} must use http or https (got '{other}')"
        ))),
    }
}
