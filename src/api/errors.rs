//! Boundary error taxonomy and provider error classification.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::StudioError;

const CONFIGURATION_MESSAGE: &str =
    "API key not configured. Please set GOOGLE_AI_API_KEY environment variable.";
const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
const CONTENT_FILTERED_MESSAGE: &str =
    "Content was blocked by safety filters. Please try a different prompt.";

/// The studio operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Director's treatment generation.
    Treatment,
    /// Prompt rewriting.
    Rewrite,
    /// Image synthesis.
    Image,
}

impl Operation {
    /// Short name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Treatment => "treatment",
            Self::Rewrite => "rewrite",
            Self::Image => "image",
        }
    }

    /// Whether safety refusals are reported as `ContentFiltered`.
    #[must_use]
    pub fn filters_content(self) -> bool {
        self == Self::Image
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Treatment => "An unexpected error occurred while generating the treatment.",
            Self::Rewrite => "An unexpected error occurred while rewriting the prompt.",
            Self::Image => "An unexpected error occurred while generating the image.",
        }
    }
}

/// Failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Missing or oversized input; never reaches the provider.
    InvalidInput,
    /// No provider credential.
    ConfigurationError,
    /// Provider quota or throttling.
    RateLimited,
    /// Provider safety refusal on the image path.
    ContentFiltered,
    /// The image call returned no image.
    NoImageProduced,
    /// Any other provider failure.
    ProviderError,
    /// A failure without a usable message.
    UnknownError,
}

impl ErrorKind {
    /// HTTP status for this class.
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::ContentFiltered => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ConfigurationError
            | Self::NoImageProduced
            | Self::ProviderError
            | Self::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A classified, user-facing failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure class.
    pub kind: ErrorKind,
    /// Short human-readable message.
    pub message: String,
    /// Diagnostic text, such as the model's reply when no image came back.
    pub detail: Option<String>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), detail: None }
    }

    /// An `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Classify a provider failure raised during `operation`.
    ///
    /// Error variants that carry their class are mapped directly; everything
    /// else goes through [`ApiError::from_message`].
    #[must_use]
    pub fn from_provider(err: &StudioError, operation: Operation) -> Self {
        match err {
            StudioError::MissingApiKey => {
                return Self::new(ErrorKind::ConfigurationError, CONFIGURATION_MESSAGE);
            }
            StudioError::Api { status: 429, .. } => {
                return Self::new(ErrorKind::RateLimited, RATE_LIMITED_MESSAGE);
            }
            StudioError::Api { message, .. } if message.trim().is_empty() => {
                return Self::new(ErrorKind::UnknownError, operation.fallback_message());
            }
            StudioError::Blocked { .. } if operation.filters_content() => {
                return Self::new(ErrorKind::ContentFiltered, CONTENT_FILTERED_MESSAGE);
            }
            StudioError::NoImageProduced { text } => {
                return Self {
                    kind: ErrorKind::NoImageProduced,
                    message: err.to_string(),
                    detail: Some(text.clone()),
                };
            }
            _ => {}
        }
        Self::from_message(&err.to_string(), operation)
    }

    /// Classify a failure by sniffing its message.
    ///
    /// Quota and `429` markers win over every other marker, then credential
    /// problems, then (image path only) safety refusals.
    #[must_use]
    pub fn from_message(message: &str, operation: Operation) -> Self {
        if message.contains("429") || message.contains("quota") {
            Self::new(ErrorKind::RateLimited, RATE_LIMITED_MESSAGE)
        } else if message.contains("API key") {
            Self::new(ErrorKind::ConfigurationError, CONFIGURATION_MESSAGE)
        } else if operation.filters_content()
            && (message.contains("blocked") || message.contains("safety"))
        {
            Self::new(ErrorKind::ContentFiltered, CONTENT_FILTERED_MESSAGE)
        } else if message.trim().is_empty() {
            Self::new(ErrorKind::UnknownError, operation.fallback_message())
        } else {
            Self::new(ErrorKind::ProviderError, message)
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: &self.message, kind: self.kind, detail: self.detail.as_deref() };
        (self.status(), Json(body)).into_response()
    }
}
