//! Core data types for the captag pipeline.
//!
//! All values here are per-request and ephemeral; nothing is persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Error returned when a selection string does not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseSelectionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Target language for the caption and the subject vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fi,
    Sv,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Fi, Language::Sv, Language::En];

    /// ISO 639-1 code as used in Annif project identifiers.
    pub fn code(self) -> &'static str {
        match self {
            Language::Fi => "fi",
            Language::Sv => "sv",
            Language::En => "en",
        }
    }

    /// Human-readable name, in the language itself.
    pub fn label(self) -> &'static str {
        match self {
            Language::Fi => "suomi",
            Language::Sv => "svenska",
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fi" => Ok(Language::Fi),
            "sv" => Ok(Language::Sv),
            "en" => Ok(Language::En),
            other => Err(ParseSelectionError {
                kind: "language",
                value: other.to_string(),
                expected: "fi, sv, en",
            }),
        }
    }
}

/// Controlled subject vocabulary used by the indexing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    /// General Finnish ontology
    #[default]
    Yso,
    /// Public libraries classification scheme
    Ykl,
    /// Fiction ontology
    Kauno,
}

impl Vocabulary {
    pub const ALL: [Vocabulary; 3] = [Vocabulary::Yso, Vocabulary::Ykl, Vocabulary::Kauno];

    /// Identifier prefix as used in Annif project identifiers.
    pub fn code(self) -> &'static str {
        match self {
            Vocabulary::Yso => "yso",
            Vocabulary::Ykl => "ykl",
            Vocabulary::Kauno => "kauno",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Vocabulary::Yso => "YSO - General Finnish Ontology",
            Vocabulary::Ykl => "YKL - Finnish Public Libraries Classification",
            Vocabulary::Kauno => "KAUNO - Ontology for Fiction",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Vocabulary {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yso" => Ok(Vocabulary::Yso),
            "ykl" => Ok(Vocabulary::Ykl),
            "kauno" => Ok(Vocabulary::Kauno),
            other => Err(ParseSelectionError {
                kind: "vocabulary",
                value: other.to_string(),
                expected: "yso, ykl, kauno",
            }),
        }
    }
}

/// Identifier selecting the indexing model, e.g. `yso-en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Compose `<vocabulary>-<language>`.
    pub fn compose(vocabulary: Vocabulary, language: Language) -> Self {
        Self(format!("{}-{}", vocabulary.code(), language.code()))
    }

    /// Use an arbitrary project identifier known to the service.
    ///
    /// Returns `None` for blank input or anything outside `[A-Za-z0-9_-]`,
    /// since the id becomes a URL path segment.
    pub fn custom(id: &str) -> Option<Self> {
        let id = id.trim();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single subject suggestion, in the order the service ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Preferred label of the subject
    pub label: String,

    /// Confidence score, typically 0.0-1.0
    pub score: f64,

    /// Concept URI in the vocabulary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Classification notation (set for classification schemes such as YKL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

/// Mapping from subject label to confidence score.
///
/// Order is not preserved; rank by score with [`SubjectSuggestions::ranked`].
/// An empty mapping is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectSuggestions(HashMap<String, f64>);

impl SubjectSuggestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping from ordered service results, discarding order.
    ///
    /// If the service returns the same label twice, the higher score wins.
    pub fn from_suggestions<I>(suggestions: I) -> Self
    where
        I: IntoIterator<Item = Suggestion>,
    {
        let mut map: HashMap<String, f64> = HashMap::new();
        for suggestion in suggestions {
            map.entry(suggestion.label)
                .and_modify(|score| *score = score.max(suggestion.score))
                .or_insert(suggestion.score);
        }
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Labels sorted by descending score (ties broken by label).
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> =
            self.0.iter().map(|(label, score)| (label.as_str(), *score)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn into_inner(self) -> HashMap<String, f64> {
        self.0
    }
}
