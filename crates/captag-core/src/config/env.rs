//! Environment variable overrides.
//!
//! Variables take precedence over the config file. Empty values are treated
//! as unset.

use super::Config;

pub const VLM_API_BASE_URL: &str = "VLM_API_BASE_URL";
pub const VLM_API_KEY: &str = "VLM_API_KEY";
pub const VLM_MODEL: &str = "VLM_MODEL";
pub const ANNIF_API_BASE_URL: &str = "ANNIF_API_BASE_URL";

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup (used by tests).
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = get(VLM_API_BASE_URL) {
            self.vlm.base_url = url;
        }
        if let Some(key) = get(VLM_API_KEY) {
            self.vlm.api_key = Some(key);
        }
        if let Some(model) = get(VLM_MODEL) {
            self.vlm.model = model;
        }
        if let Some(url) = get(ANNIF_API_BASE_URL) {
            self.annif.base_url = url;
        }
    }
}
