//! Form state behind the interactive front end.
//!
//! Holds the current image, language, vocabulary, prompt field and the last
//! result. The prompt field follows the language default until the user types
//! something else; from then on language changes leave it alone.

use crate::image::SourceImage;
use crate::pipeline::{Annotation, CaptionRequest, PipelineFailure, PipelineState};
use crate::prompts::default_prompt;
use crate::types::{Language, ProjectId, SubjectSuggestions, Vocabulary};

#[derive(Debug, Clone)]
pub struct FormState {
    image: Option<SourceImage>,
    language: Language,
    vocabulary: Vocabulary,
    prompt: String,
    caption: String,
    subjects: SubjectSuggestions,
    project: Option<ProjectId>,
    warning: Option<String>,
    error: Option<String>,
    status: PipelineState,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(Language::default(), Vocabulary::default())
    }
}

impl FormState {
    pub fn new(language: Language, vocabulary: Vocabulary) -> Self {
        Self {
            image: None,
            language,
            vocabulary,
            prompt: default_prompt(language).to_string(),
            caption: String::new(),
            subjects: SubjectSuggestions::new(),
            project: None,
            warning: None,
            error: None,
            status: PipelineState::Idle,
        }
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: SourceImage) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. The prompt field is repopulated with the new
    /// language's default unless it holds a custom prompt.
    pub fn set_language(&mut self, language: Language) {
        let keep_prompt = self.prompt_is_custom();
        self.language = language;
        if !keep_prompt {
            self.prompt = default_prompt(language).to_string();
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = vocabulary;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// True when the prompt field differs from the current language default.
    ///
    /// A blank field is not custom: it falls back to the default on submit and
    /// is refilled on the next language change.
    pub fn prompt_is_custom(&self) -> bool {
        !self.prompt.trim().is_empty() && self.prompt != default_prompt(self.language)
    }

    /// Submit is only possible once an image is present.
    pub fn can_submit(&self) -> bool {
        self.image.is_some()
    }

    /// Build the request for the current selections, or `None` without an image.
    pub fn submission(&self) -> Option<CaptionRequest> {
        let image = self.image.clone()?;
        Some(
            CaptionRequest::new(image, self.language, self.vocabulary)
                .with_prompt(self.prompt.clone()),
        )
    }

    /// Mark a new submission as started, dropping the previous result.
    pub fn begin(&mut self) {
        self.caption.clear();
        self.subjects = SubjectSuggestions::new();
        self.project = None;
        self.warning = None;
        self.error = None;
        self.status = PipelineState::Idle;
    }

    pub fn record_state(&mut self, state: PipelineState) {
        self.status = state;
    }

    /// Store the outcome of a pipeline run.
    pub fn apply(&mut self, outcome: Result<Annotation, PipelineFailure>) {
        match outcome {
            Ok(annotation) => {
                self.status = if annotation.warning.is_some() {
                    PipelineState::SubjectsFailed
                } else {
                    PipelineState::SubjectsReady
                };
                self.caption = annotation.caption;
                self.subjects = annotation.subjects;
                self.project = Some(annotation.project);
                self.warning = annotation.warning;
                self.error = None;
            }
            Err(failure) => {
                self.status = PipelineState::CaptionFailed;
                self.caption.clear();
                self.subjects = SubjectSuggestions::new();
                self.project = None;
                self.warning = None;
                self.error = Some(failure.message);
            }
        }
    }

    /// Reset the caption and prompt fields. Image and selections stay.
    pub fn clear(&mut self) {
        self.begin();
        self.prompt = default_prompt(self.language).to_string();
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn subjects(&self) -> &SubjectSuggestions {
        &self.subjects
    }

    pub fn project(&self) -> Option<&ProjectId> {
        self.project.as_ref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> PipelineState {
        self.status
    }
}
