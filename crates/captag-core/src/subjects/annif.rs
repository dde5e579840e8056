//! Annif REST API client.
//!
//! Talks to `<base>projects` and `<base>projects/<id>/suggest`, where the base
//! URL ends in `v1/`. Error responses use problem JSON; the `detail` field is
//! kept for the logs.

use super::provider::SubjectProvider;
use crate::config::AnnifConfig;
use crate::error::SubjectError;
use crate::types::{ProjectId, Suggestion};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Subject provider backed by an Annif instance.
pub struct AnnifProvider {
    base_url: String,
    limit: u32,
    threshold: f64,
    timeout: Duration,
    client: reqwest::Client,
}

/// Summary of an Annif project as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_id: String,
    pub name: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_trained: Option<bool>,
}

#[derive(Deserialize)]
struct ProjectList {
    projects: Vec<ProjectInfo>,
}

#[derive(Deserialize)]
struct SuggestResponse {
    results: Vec<Suggestion>,
}

#[derive(Deserialize)]
struct Problem {
    detail: Option<String>,
    title: Option<String>,
}

impl AnnifProvider {
    pub fn new(config: &AnnifConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create with a shared HTTP client.
    pub fn with_client(config: &AnnifConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.clone(),
            limit: config.limit,
            threshold: config.threshold,
            timeout: Duration::from_millis(config.timeout_ms),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the projects available on the service.
    pub async fn projects(&self) -> Result<Vec<ProjectInfo>, SubjectError> {
        let url = format!("{}projects", self.base_url);
        let resp = self.send(self.client.get(&url)).await?;
        let list: ProjectList = resp
            .json()
            .await
            .map_err(|e| SubjectError::Response(format!("invalid project list: {e}")))?;
        Ok(list.projects)
    }

    /// Fetch a single project's details.
    pub async fn project(&self, project: &ProjectId) -> Result<ProjectInfo, SubjectError> {
        let url = format!("{}projects/{}", self.base_url, project);
        let resp = self.send(self.client.get(&url)).await?;
        resp.json()
            .await
            .map_err(|e| SubjectError::Response(format!("invalid project: {e}")))
    }

    /// Send with timeout and map non-success statuses to `SubjectError::Status`.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SubjectError> {
        let resp = request.timeout(self.timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                SubjectError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                SubjectError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<Problem>(&text) {
            Ok(Problem {
                detail: Some(detail),
                ..
            }) => detail,
            Ok(Problem {
                title: Some(title), ..
            }) => title,
            _ => text,
        };
        Err(SubjectError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl SubjectProvider for AnnifProvider {
    fn name(&self) -> &str {
        "annif"
    }

    async fn suggest(
        &self,
        project: &ProjectId,
        text: &str,
    ) -> Result<Vec<Suggestion>, SubjectError> {
        let url = format!("{}projects/{}/suggest", self.base_url, project);
        let form = [
            ("text", text.to_string()),
            ("limit", self.limit.to_string()),
            ("threshold", self.threshold.to_string()),
        ];

        let resp = self.send(self.client.post(&url).form(&form)).await?;
        let body: SuggestResponse = resp
            .json()
            .await
            .map_err(|e| SubjectError::Response(format!("invalid suggestions: {e}")))?;
        Ok(body.results)
    }
}
