//! CLI enum types: language, vocabulary and output format.

use clap::ValueEnum;
use captag_core::{Language, OutputFormat as CoreOutputFormat, Vocabulary};

/// Caption and vocabulary language.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LanguageArg {
    /// Finnish
    Fi,
    /// Swedish
    Sv,
    /// English
    En,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Fi => Language::Fi,
            LanguageArg::Sv => Language::Sv,
            LanguageArg::En => Language::En,
        }
    }
}

/// Subject vocabulary.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VocabularyArg {
    /// General Finnish ontology
    Yso,
    /// Finnish public libraries classification
    Ykl,
    /// Ontology for fiction
    Kauno,
}

impl From<VocabularyArg> for Vocabulary {
    fn from(arg: VocabularyArg) -> Self {
        match arg {
            VocabularyArg::Yso => Vocabulary::Yso,
            VocabularyArg::Ykl => Vocabulary::Ykl,
            VocabularyArg::Kauno => Vocabulary::Kauno,
        }
    }
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Caption and ranked subjects as plain text
    Text,
    /// Single JSON object, or an array for several images
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
