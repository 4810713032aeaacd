//! Stand-in model used when no credential is configured.

use crate::error::StudioError;
use crate::ports::generative_model::{ContentFuture, ContentRequest, GenerativeModel};

/// Fails every call with [`StudioError::MissingApiKey`].
///
/// Lets the server start without a key so the problem surfaces as a
/// configuration error on the first request.
pub struct UnconfiguredModel;

impl GenerativeModel for UnconfiguredModel {
    fn generate_content(&self, _request: &ContentRequest) -> ContentFuture<'_> {
        Box::pin(async { Err(StudioError::MissingApiKey) })
    }
}
