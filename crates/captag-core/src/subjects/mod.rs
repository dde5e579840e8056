//! Subject suggestion stage: caption text in, label → score mapping out.

pub(crate) mod annif;
pub(crate) mod provider;

pub use annif::{AnnifProvider, ProjectInfo};
pub use provider::{request_subjects, SubjectProvider};
