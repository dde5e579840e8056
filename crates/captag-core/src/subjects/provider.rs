//! Subject provider trait.

use crate::error::SubjectError;
use crate::types::{ProjectId, SubjectSuggestions, Suggestion};
use async_trait::async_trait;

/// Anything that can suggest subjects for a piece of text.
#[async_trait]
pub trait SubjectProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Ranked suggestions for `text` from the model selected by `project`.
    ///
    /// An empty vector means the service found nothing; that is not an error.
    async fn suggest(
        &self,
        project: &ProjectId,
        text: &str,
    ) -> Result<Vec<Suggestion>, SubjectError>;
}

/// Request subjects for a caption and collapse them into a label → score map.
pub async fn request_subjects(
    provider: &dyn SubjectProvider,
    project: &ProjectId,
    caption: &str,
) -> Result<SubjectSuggestions, SubjectError> {
    if caption.trim().is_empty() {
        return Err(SubjectError::InvalidInput("caption is empty".to_string()));
    }
    let suggestions = provider.suggest(project, caption).await?;
    tracing::debug!(
        "{} returned {} suggestion(s) from project {project}",
        provider.name(),
        suggestions.len()
    );
    Ok(SubjectSuggestions::from_suggestions(suggestions))
}
