//! Gemini adapter for [`safereport_core::classify::ImageClassifier`].
//!
//! Sends one `generateContent` request per image and hands the model's text
//! to [`safereport_core::classify::parse_model_response`].

mod gemini;
mod wire;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClassifier, GeminiConfig};
