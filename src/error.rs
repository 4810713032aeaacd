//! Unified error type for provider calls and local I/O.

use thiserror::Error;

/// Errors that can occur while talking to the generative model or handling
/// project files.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The API returned a non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No credential could be resolved for the provider.
    #[error(
        "Google AI API key is not configured. Please set GOOGLE_AI_API_KEY or GEMINI_API_KEY environment variable."
    )]
    MissingApiKey,

    /// The provider refused to answer because of its safety filters.
    #[error("Response was blocked due to {reason}")]
    Blocked {
        /// Block or finish reason reported by the provider.
        reason: String,
    },

    /// The image model answered without any inline image part.
    #[error("No image was generated. The model returned: {text}")]
    NoImageProduced {
        /// Text the model returned instead, often an explanation or refusal.
        text: String,
    },

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// An error captured in a cassette and replayed verbatim.
    #[error("{0}")]
    Replayed(String),

    /// A studio operation failed at the boundary; shows its user-facing message.
    #[error("{0}")]
    Operation(#[from] crate::api::errors::ApiError),
}
