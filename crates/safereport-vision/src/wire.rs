//! Request and response bodies of the `generateContent` endpoint. Only the
//! fields this adapter reads or writes are modelled.

use serde::{Deserialize, Serialize};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
  pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
  pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
  Text { text: &'a str },
  InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
pub struct InlineData<'a> {
  pub mime_type: &'a str,
  /// Standard base64.
  pub data:      String,
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
  #[serde(default)]
  pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
  pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
  #[serde(default)]
  pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
  pub text: Option<String>,
}

impl GenerateResponse {
  /// Text parts of the first candidate, joined by newlines. `None` when the
  /// model returned no text at all.
  pub fn into_text(self) -> Option<String> {
    let parts = self.candidates.into_iter().next()?.content?.parts;
    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() { None } else { Some(texts.join("\n")) }
  }
}
