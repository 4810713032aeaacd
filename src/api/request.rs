//! Request payloads for the three studio endpoints.
//!
//! Text fields are optional at the serde level so that a missing field is
//! reported as `InvalidInput` by validation rather than as a decode error.

use serde::Deserialize;

/// Body of `POST /api/director`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRequest {
    /// Free-text concept, at most 2000 characters.
    #[serde(default)]
    pub concept_text: Option<String>,
    /// Optional reference image as a data-URI.
    #[serde(default)]
    pub reference_image: Option<String>,
}

/// Body of `POST /api/rewrite`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    /// Prompt to rewrite, at most 5000 characters.
    #[serde(default)]
    pub original_prompt: Option<String>,
    /// Optional reference image as a data-URI.
    #[serde(default)]
    pub reference_image: Option<String>,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    /// Image prompt, at most 5000 characters.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Image whose composition should be kept.
    #[serde(default)]
    pub structure_reference: Option<String>,
    /// Image whose lighting, texture and color should be imitated.
    #[serde(default)]
    pub style_reference: Option<String>,
}
