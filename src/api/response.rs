//! Success payloads for the three studio endpoints.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Metadata attached to text results.
#[derive(Debug, Clone, Serialize)]
pub struct TextMetadata {
    /// Model that produced the text.
    pub model: String,
    /// ISO-8601 UTC completion time.
    pub timestamp: String,
}

impl TextMetadata {
    /// Metadata stamped with the current time.
    #[must_use]
    pub fn now(model: &str) -> Self {
        Self { model: model.to_string(), timestamp: iso_timestamp() }
    }
}

/// Body returned by `POST /api/director`.
#[derive(Debug, Clone, Serialize)]
pub struct TreatmentResponse {
    /// The generated director's treatment.
    pub treatment: String,
    /// Model and time.
    pub metadata: TextMetadata,
}

/// Body returned by `POST /api/rewrite`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResponse {
    /// The rewritten prompt.
    pub rewritten_prompt: String,
    /// Model and time.
    pub metadata: TextMetadata,
}

/// Metadata attached to rendered images.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Model that produced the image.
    pub model: String,
    /// ISO-8601 UTC completion time.
    pub timestamp: String,
    /// Whether a structure reference was supplied.
    pub has_structure_ref: bool,
    /// Whether a style reference was supplied.
    pub has_style_ref: bool,
}

/// Body returned by `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    /// The rendered image as a data-URI.
    pub image_url: String,
    /// Model, time and which references were used.
    pub metadata: ImageMetadata,
}

/// Current UTC time with millisecond precision and a `Z` suffix.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
