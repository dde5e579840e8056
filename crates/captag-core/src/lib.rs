//! captag core - caption an image with a VLM, then index the caption with Annif.
//!
//! # Architecture
//!
//! Each submission runs two remote calls in sequence:
//!
//! ```text
//! Image → JPEG/base64 → VLM chat completion → caption → Annif suggest → label/score map
//! ```
//!
//! A captioning failure ends the run. A subject failure keeps the caption and
//! attaches a warning instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use captag_core::{Captag, CaptionRequest, Config, Language, SourceImage, Vocabulary};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let captag = Captag::new(Config::load()?)?;
//!     let image = SourceImage::from_path("photo.jpg".as_ref()).await?;
//!     let request = CaptionRequest::new(image, Language::En, Vocabulary::Yso);
//!
//!     match captag.pipeline().run(&request).await {
//!         Ok(annotation) => println!("{}: {:?}", annotation.caption, annotation.subjects),
//!         Err(failure) => eprintln!("{failure}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod caption;
pub mod config;
pub mod error;
pub mod form;
pub mod image;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod subjects;
pub mod types;

pub use caption::{CaptionProvider, VlmProvider};
pub use config::Config;
pub use error::{CaptagError, CaptionError, ConfigError, Result, SubjectError};
pub use form::FormState;
pub use self::image::{JpegPayload, SourceImage};
pub use output::{OutputFormat, OutputWriter, Report};
pub use pipeline::{
    Annotation, CaptionRequest, Pipeline, PipelineFailure, PipelineOptions, PipelineState,
};
pub use subjects::{AnnifProvider, ProjectInfo, SubjectProvider};
pub use types::{Language, ProjectId, SubjectSuggestions, Suggestion, Vocabulary};

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wires the configured providers into a pipeline.
///
/// Built once at startup; everything inside is read-only afterwards.
pub struct Captag {
    config: Config,
    annif: Arc<AnnifProvider>,
    pipeline: Pipeline,
}

impl Captag {
    /// Create providers and the pipeline from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing captag v{}", VERSION);

        let client = reqwest::Client::builder()
            .user_agent(concat!("captag/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {e}")))?;

        let vlm = Arc::new(VlmProvider::with_client(
            &config.vlm,
            &config.image,
            client.clone(),
        ));
        let annif = Arc::new(AnnifProvider::with_client(&config.annif, client));
        tracing::debug!("VLM endpoint: {}", vlm.endpoint());
        tracing::debug!("Annif endpoint: {}", annif.base_url());

        let pipeline = Pipeline::new(
            vlm,
            annif.clone(),
            PipelineOptions::from_config(&config),
        );

        Ok(Self {
            config,
            annif,
            pipeline,
        })
    }

    /// Load configuration (file + environment) and build.
    pub fn from_env() -> Result<Self> {
        let config = Config::load()?;
        Self::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn annif(&self) -> &AnnifProvider {
        &self.annif
    }

    /// Fresh form with the configured default selections.
    pub fn new_form(&self) -> FormState {
        FormState::new(
            self.config.defaults.language,
            self.config.defaults.vocabulary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_new_rejects_missing_vlm_url() {
        let err = Captag::new(Config::default()).err().unwrap();
        assert!(matches!(
            err,
            CaptagError::Config(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_annif_url_before_any_request() {
        let mut config = Config::default();
        config.vlm.base_url = "http://localhost:8000".to_string();
        config.annif.base_url = "https://api.annif.org/".to_string();
        assert!(Captag::new(config).is_err());
    }

    #[test]
    fn test_new_form_uses_configured_defaults() {
        let mut config = Config::default();
        config.vlm.base_url = "http://localhost:8000".to_string();
        config.defaults.language = Language::Sv;
        let captag = Captag::new(config).unwrap();
        let form = captag.new_form();
        assert_eq!(form.language(), Language::Sv);
        assert_eq!(form.prompt(), prompts::default_prompt(Language::Sv));
    }
}
