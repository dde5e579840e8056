//! Captioning stage: image + prompt in, caption text out.

pub(crate) mod provider;
pub(crate) mod vlm;

pub use provider::CaptionProvider;
pub use vlm::{VlmProvider, API_KEY_HEADER};
