//! The three boundary operations: validate, call the studio, classify.
//!
//! Shared by the HTTP handlers and the CLI flows so both surfaces report
//! the same failures.

use tracing::{debug, error, warn};

use super::errors::{ApiError, ErrorKind, Operation};
use super::request::{GenerateImageRequest, RewriteRequest, TreatmentRequest};
use super::response::{
    iso_timestamp, GenerateImageResponse, ImageMetadata, RewriteResponse, TextMetadata,
    TreatmentResponse,
};
use super::validation::{optional_image, require_text, MAX_CONCEPT_CHARS, MAX_PROMPT_CHARS};
use crate::error::StudioError;
use crate::studio::Studio;

/// Validate and run a treatment request.
///
/// # Errors
///
/// Returns `InvalidInput` before any provider call, or the classified
/// provider failure.
pub async fn generate_treatment(
    studio: &Studio,
    request: &TreatmentRequest,
) -> Result<TreatmentResponse, ApiError> {
    let concept = require_text(
        request.concept_text.as_deref(),
        MAX_CONCEPT_CHARS,
        "Concept text is required",
        "Concept text is too long. Maximum 2000 characters.",
    )
    .inspect_err(|e| log_rejection(Operation::Treatment, e))?;
    let reference = optional_image(request.reference_image.as_deref());

    debug!(chars = concept.chars().count(), has_reference = reference.is_some(), "treatment request");

    let treatment = studio
        .generate_director_treatment(concept, reference)
        .await
        .map_err(|e| classify(&e, Operation::Treatment))?;

    Ok(TreatmentResponse {
        treatment,
        metadata: TextMetadata::now(&studio.profiles().director.model),
    })
}

/// Validate and run a rewrite request.
///
/// # Errors
///
/// Returns `InvalidInput` before any provider call, or the classified
/// provider failure.
pub async fn rewrite_prompt(
    studio: &Studio,
    request: &RewriteRequest,
) -> Result<RewriteResponse, ApiError> {
    let original = require_text(
        request.original_prompt.as_deref(),
        MAX_PROMPT_CHARS,
        "Original prompt is required",
        "Prompt is too long. Maximum 5000 characters.",
    )
    .inspect_err(|e| log_rejection(Operation::Rewrite, e))?;
    let reference = optional_image(request.reference_image.as_deref());

    debug!(chars = original.chars().count(), has_reference = reference.is_some(), "rewrite request");

    let rewritten_prompt = studio
        .rewrite_prompt(original, reference)
        .await
        .map_err(|e| classify(&e, Operation::Rewrite))?;

    Ok(RewriteResponse {
        rewritten_prompt,
        metadata: TextMetadata::now(&studio.profiles().rewriter.model),
    })
}

/// Validate and run an image request.
///
/// # Errors
///
/// Returns `InvalidInput` before any provider call, or the classified
/// provider failure.
pub async fn generate_image(
    studio: &Studio,
    request: &GenerateImageRequest,
) -> Result<GenerateImageResponse, ApiError> {
    let prompt = require_text(
        request.prompt.as_deref(),
        MAX_PROMPT_CHARS,
        "Prompt is required",
        "Prompt is too long. Maximum 5000 characters.",
    )
    .inspect_err(|e| log_rejection(Operation::Image, e))?;
    let structure = optional_image(request.structure_reference.as_deref());
    let style = optional_image(request.style_reference.as_deref());

    debug!(
        chars = prompt.chars().count(),
        has_structure = structure.is_some(),
        has_style = style.is_some(),
        "image request"
    );

    let image_url = studio
        .generate_styled_image(prompt, structure, style)
        .await
        .map_err(|e| classify(&e, Operation::Image))?;

    Ok(GenerateImageResponse {
        image_url,
        metadata: ImageMetadata {
            model: studio.profiles().image.model.clone(),
            timestamp: iso_timestamp(),
            has_structure_ref: structure.is_some(),
            has_style_ref: style.is_some(),
        },
    })
}

fn classify(err: &StudioError, operation: Operation) -> ApiError {
    let classified = ApiError::from_provider(err, operation);
    match classified.kind {
        ErrorKind::RateLimited | ErrorKind::ContentFiltered => {
            warn!(operation = operation.name(), kind = ?classified.kind, "provider call failed: {err}");
        }
        _ => error!(operation = operation.name(), kind = ?classified.kind, "provider call failed: {err}"),
    }
    classified
}

fn log_rejection(operation: Operation, err: &ApiError) {
    warn!(operation = operation.name(), "rejected request: {}", err.message);
}
