//! Two-stage pipeline orchestration: image → caption → subject suggestions.
//!
//! The run is a result chain. A captioning error ends the run with a generic
//! [`PipelineFailure`]; a subject error after a successful caption is folded
//! into the [`Annotation`] as a warning with an empty subject mapping.

mod state;

pub use state::PipelineState;

use crate::caption::CaptionProvider;
use crate::config::Config;
use crate::error::{CaptionError, SubjectError};
use crate::image::SourceImage;
use crate::prompts;
use crate::subjects::{request_subjects, SubjectProvider};
use crate::types::{Language, ProjectId, SubjectSuggestions, Vocabulary};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// One submission: an image plus the form selections.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub image: SourceImage,
    pub language: Language,
    pub vocabulary: Vocabulary,
    /// Prompt override; blank or `None` selects the language default
    pub prompt: Option<String>,
    /// Project override; `None` composes `<vocabulary>-<language>`
    pub project: Option<ProjectId>,
}

impl CaptionRequest {
    pub fn new(image: SourceImage, language: Language, vocabulary: Vocabulary) -> Self {
        Self {
            image,
            language,
            vocabulary,
            prompt: None,
            project: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Prompt actually sent to the VLM.
    pub fn effective_prompt(&self) -> String {
        prompts::select_prompt(self.language, self.prompt.as_deref())
    }

    /// Project actually queried on the indexing service.
    pub fn effective_project(&self) -> ProjectId {
        self.project
            .clone()
            .unwrap_or_else(|| ProjectId::compose(self.vocabulary, self.language))
    }
}

/// Successful pipeline output. Subjects may be empty.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub caption: String,
    pub project: ProjectId,
    pub subjects: SubjectSuggestions,
    /// Set when subjects could not be fetched and the caption is shown alone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Captioning failed; nothing usable came out of the run.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PipelineFailure {
    /// User-safe summary (never the underlying error)
    pub message: String,
}

/// Per-stage deadlines.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub caption_timeout: Duration,
    pub subject_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            caption_timeout: Duration::from_secs(60),
            subject_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            caption_timeout: Duration::from_millis(config.vlm.timeout_ms),
            subject_timeout: Duration::from_millis(config.annif.timeout_ms),
        }
    }
}

/// Sequences the caption and subject providers for each submission.
///
/// Holds only read-only state, so one instance can serve concurrent
/// submissions.
#[derive(Clone)]
pub struct Pipeline {
    captioner: Arc<dyn CaptionProvider>,
    indexer: Arc<dyn SubjectProvider>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        captioner: Arc<dyn CaptionProvider>,
        indexer: Arc<dyn SubjectProvider>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            captioner,
            indexer,
            options,
        }
    }

    /// Run one submission to completion.
    pub async fn run(&self, request: &CaptionRequest) -> Result<Annotation, PipelineFailure> {
        self.run_observed(request, |_| {}).await
    }

    /// Run one submission, reporting every state transition to `on_state`.
    pub async fn run_observed<F>(
        &self,
        request: &CaptionRequest,
        on_state: F,
    ) -> Result<Annotation, PipelineFailure>
    where
        F: FnMut(PipelineState),
    {
        let mut progress = Progress::new(on_state);
        let prompt = request.effective_prompt();
        let project = request.effective_project();

        progress.advance(PipelineState::CaptioningInFlight);
        let caption = match self.caption_stage(&request.image, &prompt).await {
            Ok(caption) => {
                progress.advance(PipelineState::CaptionReady);
                caption
            }
            Err(e) => {
                tracing::error!(
                    provider = self.captioner.name(),
                    status = e.status_code(),
                    "Captioning failed for {}: {e}",
                    request.image.name
                );
                progress.advance(PipelineState::CaptionFailed);
                return Err(PipelineFailure {
                    message: e.user_message().to_string(),
                });
            }
        };

        progress.advance(PipelineState::SubjectsInFlight);
        match self.subject_stage(&project, &caption).await {
            Ok(subjects) => {
                tracing::info!(
                    "{}: {} subject(s) from {project}",
                    request.image.name,
                    subjects.len()
                );
                progress.advance(PipelineState::SubjectsReady);
                Ok(Annotation {
                    caption,
                    project,
                    subjects,
                    warning: None,
                })
            }
            Err(e) => {
                tracing::error!(
                    provider = self.indexer.name(),
                    status = e.status_code(),
                    "Subject suggestion failed for {} ({project}): {e}",
                    request.image.name
                );
                progress.advance(PipelineState::SubjectsFailed);
                Ok(Annotation {
                    caption,
                    project,
                    subjects: SubjectSuggestions::new(),
                    warning: Some(e.user_message().to_string()),
                })
            }
        }
    }

    async fn caption_stage(
        &self,
        image: &SourceImage,
        prompt: &str,
    ) -> Result<String, CaptionError> {
        let timeout = self.options.caption_timeout;
        tokio::time::timeout(timeout, self.captioner.caption(image, prompt))
            .await
            .map_err(|_| CaptionError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            })?
    }

    async fn subject_stage(
        &self,
        project: &ProjectId,
        caption: &str,
    ) -> Result<SubjectSuggestions, SubjectError> {
        let timeout = self.options.subject_timeout;
        tokio::time::timeout(
            timeout,
            request_subjects(self.indexer.as_ref(), project, caption),
        )
        .await
        .map_err(|_| SubjectError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        })?
    }
}

/// Tracks the current state and forwards transitions to the observer.
struct Progress<F> {
    state: PipelineState,
    on_state: F,
}

impl<F: FnMut(PipelineState)> Progress<F> {
    fn new(on_state: F) -> Self {
        Self {
            state: PipelineState::Idle,
            on_state,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal pipeline transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
        (self.on_state)(next);
    }
}
