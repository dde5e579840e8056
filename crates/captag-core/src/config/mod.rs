//! Configuration management for captag.
//!
//! A single immutable [`Config`] is built once at startup: defaults, then the
//! optional TOML file, then environment overrides, then validation. It is
//! passed explicitly to the providers and the pipeline afterwards.

mod env;
mod types;
mod validate;

pub use env::{ANNIF_API_BASE_URL, VLM_API_BASE_URL, VLM_API_KEY, VLM_MODEL};
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for captag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vision-language model service
    pub vlm: VlmConfig,

    /// Annif subject indexing service
    pub annif: AnnifConfig,

    /// Image payload settings
    pub image: ImageConfig,

    /// Initial language and vocabulary selections
    pub defaults: DefaultsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the config file (if any), apply environment overrides and validate.
    ///
    /// Fails when `VLM_API_BASE_URL` is absent or any value is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file()?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load only the config file at the default location, without env
    /// overrides or validation. Returns defaults if the file doesn't exist.
    pub fn load_file() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::read_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/org.captag.captag/config.toml
    /// - Linux: ~/.config/captag/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\captag\captag\config\config.toml
    ///
    /// Falls back to ~/.captag/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "captag", "captag")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".captag").join("config.toml")
            })
    }

    /// Copy of the config with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.vlm.api_key.is_some() {
            copy.vlm.api_key = Some("********".to_string());
        }
        copy
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, Vocabulary};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.vlm.max_tokens, 300);
        assert_eq!(config.annif.base_url, DEFAULT_ANNIF_BASE_URL);
        assert_eq!(config.defaults.language, Language::Fi);
        assert_eq!(config.defaults.vocabulary, Vocabulary::Yso);
        assert!(config.vlm.api_key.is_none());
    }

    #[test]
    fn test_vlm_endpoint_derivation() {
        let mut vlm = VlmConfig::default();
        vlm.base_url = "http://gpu-box:8000".to_string();
        assert_eq!(vlm.endpoint(), "http://gpu-box:8000/v1/chat/completions");
        vlm.base_url = "http://gpu-box:8000/".to_string();
        assert_eq!(vlm.endpoint(), "http://gpu-box:8000/v1/chat/completions");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[vlm]"));
        assert!(toml.contains("[annif]"));
        assert!(toml.contains("language = \"fi\""));
    }

    #[test]
    fn test_read_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[vlm]\nbase_url = \"http://vlm.local\"\n\n[defaults]\nlanguage = \"en\"\nvocabulary = \"kauno\""
        )
        .unwrap();

        let config = Config::read_from(file.path()).unwrap();
        assert_eq!(config.vlm.base_url, "http://vlm.local");
        assert_eq!(config.vlm.max_tokens, 300);
        assert_eq!(config.defaults.language, Language::En);
        assert_eq!(config.defaults.vocabulary, Vocabulary::Kauno);
    }

    #[test]
    fn test_read_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vlm\nbase_url = ").unwrap();
        let err = Config::read_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = Config::default();
        config.vlm.api_key = Some("top-secret".to_string());
        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("top-secret"));
        assert!(shown.contains("********"));
    }
}
