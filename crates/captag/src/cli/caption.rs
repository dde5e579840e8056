//! The `captag caption` command: one submission per image, in order.

use anyhow::Context;
use captag_core::{
    Captag, CaptionRequest, Language, OutputFormat as CoreOutputFormat, OutputWriter,
    PipelineFailure, ProjectId, Report, SourceImage, Vocabulary,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{LanguageArg, OutputFormat, VocabularyArg};

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Image file(s) to caption
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Caption language (defaults to `defaults.language` from config)
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Subject vocabulary (defaults to `defaults.vocabulary` from config)
    #[arg(long, value_enum)]
    pub vocabulary: Option<VocabularyArg>,

    /// Query this Annif project instead of `<vocabulary>-<language>`
    #[arg(long)]
    pub project: Option<String>,

    /// Custom prompt instead of the language default
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the caption command.
pub async fn execute(captag: &Captag, args: CaptionArgs) -> anyhow::Result<()> {
    let defaults = &captag.config().defaults;
    let language: Language = args.language.map(Into::into).unwrap_or(defaults.language);
    let vocabulary: Vocabulary = args
        .vocabulary
        .map(Into::into)
        .unwrap_or(defaults.vocabulary);
    let project = match args.project.as_deref() {
        Some(raw) => {
            let id = ProjectId::custom(raw).ok_or_else(|| {
                anyhow::anyhow!("--project must be a non-empty id of letters, digits, '-' or '_'")
            })?;
            check_project(captag, &id).await?;
            Some(id)
        }
        None => None,
    };

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let format: CoreOutputFormat = args.format.into();
    let mut writer = OutputWriter::new(sink, format, args.pretty);

    let spinner = spinner();
    let mut reports = Vec::with_capacity(args.images.len());

    for path in &args.images {
        let report = match load_image(path).await {
            Ok(image) => {
                let mut request = CaptionRequest::new(image, language, vocabulary);
                if let Some(prompt) = &args.prompt {
                    request = request.with_prompt(prompt.clone());
                }
                if let Some(project) = &project {
                    request = request.with_project(project.clone());
                }

                let name = request.image.name.clone();
                let outcome = captag
                    .pipeline()
                    .run_observed(&request, |state| {
                        spinner.set_message(format!("{name}: {state}"));
                    })
                    .await;
                if let Ok(annotation) = &outcome {
                    if let Some(warning) = &annotation.warning {
                        tracing::warn!("{name}: {warning}");
                    }
                }
                Report::new(name, &outcome)
            }
            Err(message) => {
                tracing::error!("{message}");
                Report::new(
                    path.display().to_string(),
                    &Err(PipelineFailure { message }),
                )
            }
        };

        // A single JSON document has to be written in one go.
        if matches!(format, CoreOutputFormat::Json) {
            reports.push(report);
        } else {
            spinner.suspend(|| writer.write(&report))?;
            reports.push(report);
        }
    }
    spinner.finish_and_clear();

    if matches!(format, CoreOutputFormat::Json) {
        if let [single] = reports.as_slice() {
            writer.write(single)?;
        } else {
            writer.write_all(&reports)?;
        }
    }
    writer.flush()?;

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} image(s) could not be captioned",
            reports.len()
        );
    }
    Ok(())
}

/// Make sure an explicitly requested project exists before any image is captioned.
async fn check_project(captag: &Captag, project: &ProjectId) -> anyhow::Result<()> {
    let info = captag
        .annif()
        .project(project)
        .await
        .with_context(|| format!("Annif project {project} is not available"))?;
    if info.is_trained == Some(false) {
        tracing::warn!("Annif project {project} is not trained; expect no subjects");
    }
    tracing::debug!("Using Annif project {} ({})", info.project_id, info.name);
    Ok(())
}

/// Read an image argument, expanding `~`.
async fn load_image(path: &Path) -> Result<SourceImage, String> {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    SourceImage::from_path(&expanded)
        .await
        .map_err(|e| format!("Could not read {}: {e}", expanded.display()))
}

/// Spinner on stderr; hidden when stderr is not a terminal.
fn spinner() -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use captag_core::Config;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn captag_for(annif: &MockServer) -> Captag {
        let mut config = Config::default();
        config.vlm.base_url = "http://127.0.0.1:9".to_string();
        config.annif.base_url = format!("{}/v1/", annif.uri());
        Captag::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_check_project_accepts_listed_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/yso-mllm-en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project_id": "yso-mllm-en", "name": "YSO MLLM English", "language": "en",
                "is_trained": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = ProjectId::custom("yso-mllm-en").unwrap();
        check_project(&captag_for(&server), &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_project_rejects_unknown_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "Project 'nope' not found", "status": 404
            })))
            .mount(&server)
            .await;

        let id = ProjectId::custom("nope").unwrap();
        let err = check_project(&captag_for(&server), &id).await.unwrap_err();
        assert!(err.to_string().contains("Annif project nope is not available"));
    }

    #[tokio::test]
    async fn test_load_image_reports_missing_file() {
        let err = load_image(Path::new("/no/such/dir/cat.jpg"))
            .await
            .unwrap_err();
        assert!(err.starts_with("Could not read /no/such/dir/cat.jpg"));
    }

    #[tokio::test]
    async fn test_load_image_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let image = load_image(&path).await.unwrap();
        assert_eq!(image.name, "cat.jpg");
        assert_eq!(image.bytes.len(), 3);
    }
}
