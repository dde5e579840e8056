//! Per-request pipeline states.

use serde::Serialize;
use std::fmt;

/// Where a single submission is in the caption → subjects progression.
///
/// ```text
/// Idle → CaptioningInFlight → CaptionReady → SubjectsInFlight → SubjectsReady
///                           ↘ CaptionFailed                   ↘ SubjectsFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    CaptioningInFlight,
    CaptionReady,
    CaptionFailed,
    SubjectsInFlight,
    SubjectsReady,
    SubjectsFailed,
}

impl PipelineState {
    /// No further transitions happen from this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::CaptionFailed | PipelineState::SubjectsReady | PipelineState::SubjectsFailed
        )
    }

    /// Terminal states that still hand a caption back to the user.
    ///
    /// `SubjectsFailed` counts: the caption is kept and a warning attached.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            PipelineState::SubjectsReady | PipelineState::SubjectsFailed
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, CaptioningInFlight)
                | (CaptioningInFlight, CaptionReady)
                | (CaptioningInFlight, CaptionFailed)
                | (CaptionReady, SubjectsInFlight)
                | (SubjectsInFlight, SubjectsReady)
                | (SubjectsInFlight, SubjectsFailed)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::CaptioningInFlight => "captioning",
            PipelineState::CaptionReady => "caption ready",
            PipelineState::CaptionFailed => "caption failed",
            PipelineState::SubjectsInFlight => "suggesting subjects",
            PipelineState::SubjectsReady => "subjects ready",
            PipelineState::SubjectsFailed => "subjects failed",
        };
        f.write_str(name)
    }
}
