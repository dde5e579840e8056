//! Output formatting for pipeline results.
//!
//! A [`Report`] is the serializable record of one submission. The writer
//! emits reports as JSON, JSON Lines or plain text.

use serde::Serialize;
use std::io::{self, Write};

use crate::pipeline::{Annotation, PipelineFailure};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Human-readable caption and subject list
    Text,
}

/// One ranked subject in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSubject {
    pub label: String,
    pub score: f64,
}

/// Record of a single submission.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Image name as given by the caller
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Subjects sorted by descending score
    pub subjects: Vec<RankedSubject>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new(image: impl Into<String>, outcome: &Result<Annotation, PipelineFailure>) -> Self {
        let image = image.into();
        match outcome {
            Ok(annotation) => Self {
                image,
                caption: Some(annotation.caption.clone()),
                project: Some(annotation.project.to_string()),
                subjects: annotation
                    .subjects
                    .ranked()
                    .into_iter()
                    .map(|(label, score)| RankedSubject {
                        label: label.to_string(),
                        score,
                    })
                    .collect(),
                warning: annotation.warning.clone(),
                error: None,
            },
            Err(failure) => Self {
                image,
                caption: None,
                project: None,
                subjects: Vec::new(),
                warning: None,
                error: Some(failure.message.clone()),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Plain-text rendering: image header, caption, then one subject per line.
    pub fn to_text(&self) -> String {
        let mut out = format!("== {}\n", self.image);
        if let Some(error) = &self.error {
            out.push_str(&format!("error: {error}\n"));
            return out;
        }
        if let Some(caption) = &self.caption {
            out.push_str(caption);
            out.push('\n');
        }
        if let Some(warning) = &self.warning {
            out.push_str(&format!("warning: {warning}\n"));
        }
        if let Some(project) = &self.project {
            if self.subjects.is_empty() && self.warning.is_none() {
                out.push_str(&format!("subjects ({project}): none found\n"));
            } else if !self.subjects.is_empty() {
                out.push_str(&format!("subjects ({project}):\n"));
            }
        }
        for subject in &self.subjects {
            out.push_str(&format!("  {:.4}  {}\n", subject.score, subject.label));
        }
        out
    }
}

/// A writer that serializes reports in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single report.
    pub fn write(&mut self, report: &Report) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, report)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Text => {
                if self.items_written > 0 {
                    writeln!(self.writer)?;
                }
                write!(self.writer, "{}", report.to_text())?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write several reports. JSON gets a single array; the other formats
    /// write one report after another.
    pub fn write_all(&mut self, reports: &[Report]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, reports)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, reports).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += reports.len();
            }
            OutputFormat::JsonLines | OutputFormat::Text => {
                for report in reports {
                    self.write(report)?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, ProjectId, SubjectSuggestions, Suggestion, Vocabulary};

    fn ok_outcome(warning: Option<&str>) -> Result<Annotation, PipelineFailure> {
        let subjects = if warning.is_some() {
            SubjectSuggestions::new()
        } else {
            SubjectSuggestions::from_suggestions(vec![
                Suggestion {
                    label: "lighthouses".to_string(),
                    score: 0.35,
                    uri: None,
                    notation: None,
                },
                Suggestion {
                    label: "coasts".to_string(),
                    score: 0.6,
                    uri: None,
                    notation: None,
                },
            ])
        };
        Ok(Annotation {
            caption: "A lighthouse on a rocky coast.".to_string(),
            project: ProjectId::compose(Vocabulary::Yso, Language::En),
            subjects,
            warning: warning.map(String::from),
        })
    }

    #[test]
    fn test_report_ranks_subjects() {
        let report = Report::new("coast.jpg", &ok_outcome(None));
        assert_eq!(report.subjects[0].label, "coasts");
        assert_eq!(report.subjects[1].label, "lighthouses");
        assert!(!report.is_failure());
    }

    #[test]
    fn test_failure_report_has_no_caption() {
        let outcome = Err(PipelineFailure {
            message: "Captioning failed".to_string(),
        });
        let report = Report::new("coast.jpg", &outcome);
        assert!(report.is_failure());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("caption").is_none());
        assert_eq!(json["error"], "Captioning failed");
    }

    #[test]
    fn test_jsonl_writes_one_line_per_report() {
        let mut buf = Vec::new();
        {
            let mut writer = OutputWriter::new(&mut buf, OutputFormat::JsonLines, true);
            writer.write(&Report::new("a.jpg", &ok_outcome(None))).unwrap();
            writer.write(&Report::new("b.jpg", &ok_outcome(None))).unwrap();
            assert_eq!(writer.items_written(), 2);
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_json_write_all_is_array() {
        let mut buf = Vec::new();
        let reports = vec![
            Report::new("a.jpg", &ok_outcome(None)),
            Report::new("b.jpg", &ok_outcome(Some("unavailable"))),
        ];
        OutputWriter::new(&mut buf, OutputFormat::Json, false)
            .write_all(&reports)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["warning"], "unavailable");
    }

    #[test]
    fn test_text_rendering() {
        let text = Report::new("coast.jpg", &ok_outcome(None)).to_text();
        assert!(text.starts_with("== coast.jpg\nA lighthouse on a rocky coast.\n"));
        assert!(text.contains("subjects (yso-en):"));
        assert!(text.contains("0.6000  coasts"));

        let partial = Report::new("coast.jpg", &ok_outcome(Some("unavailable"))).to_text();
        assert!(partial.contains("warning: unavailable"));
        assert!(!partial.contains("none found"));
    }
}
