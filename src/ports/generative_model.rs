//! Generative model port for multi-part content generation.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::profiles::ModelProfile;

/// Inline binary payload, kept base64-encoded as the provider expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
    /// Base64 payload without any data-URI prefix.
    pub data: String,
}

/// One piece of a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// Plain text.
    Text(String),
    /// Inline image data.
    InlineImage(InlineImage),
}

impl Part {
    /// Return the text of a text part.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::InlineImage(_) => None,
        }
    }

    /// Return the payload of an inline image part.
    #[must_use]
    pub fn as_inline_image(&self) -> Option<&InlineImage> {
        match self {
            Self::InlineImage(image) => Some(image),
            Self::Text(_) => None,
        }
    }
}

/// A single generate-content call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    /// Model configuration the call runs under.
    pub profile: ModelProfile,
    /// Ordered user parts: images first, then the instruction text.
    pub parts: Vec<Part>,
}

/// Finish reasons that mean the candidate was withheld or cut short by a
/// provider filter. Any text that came back with them is unusable.
pub const WITHHELD_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

/// The first candidate of a generate-content response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentResponse {
    /// Ordered response parts.
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Finish reason reported by the provider, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl ContentResponse {
    /// Concatenate every text part, in order.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Return the first part carrying inline image data.
    #[must_use]
    pub fn first_image(&self) -> Option<&InlineImage> {
        self.parts.iter().find_map(Part::as_inline_image)
    }

    /// The finish reason, when it is one of [`WITHHELD_FINISH_REASONS`].
    #[must_use]
    pub fn withheld_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref().filter(|r| WITHHELD_FINISH_REASONS.contains(r))
    }

    /// Return the text, or [`StudioError::Blocked`] when the provider
    /// withheld the candidate.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Blocked`] for a withheld finish reason, even
    /// when partial text came back.
    pub fn into_text(self) -> Result<String, StudioError> {
        if let Some(reason) = self.withheld_reason() {
            return Err(StudioError::Blocked { reason: reason.to_string() });
        }
        Ok(self.text())
    }
}

/// Boxed future type returned by [`GenerativeModel::generate_content`].
pub type ContentFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ContentResponse, StudioError>> + Send + 'a>>;

/// Generates content from multi-part prompts via an external API.
pub trait GenerativeModel: Send + Sync {
    /// Run one generate-content call.
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_>;
}
