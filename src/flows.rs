//! Page-level flows: the brief, studio and rewrite actions.
//!
//! Each flow reads its inputs from the [`ProjectStore`], runs one boundary
//! operation with a progress script, and writes the outcome back.
//! `observe` sees every progress line as it is produced.

use tracing::info;

use crate::api::errors::ApiError;
use crate::api::operations;
use crate::api::request::{GenerateImageRequest, RewriteRequest, TreatmentRequest};
use crate::progress::{self, run_with_progress};
use crate::project::{LoadingPhase, ProjectStore};
use crate::studio::Studio;

const EMPTY_CONCEPT: &str = "Please enter a concept to generate a treatment.";
const EMPTY_PROMPT: &str = "Please enter a prompt to generate an image.";
const EMPTY_REWRITE: &str = "Please enter a prompt to rewrite.";

/// Generate a treatment from the stored concept and reference image.
///
/// # Errors
///
/// Returns the classified failure, which is also recorded in the store.
pub async fn generate_brief(
    store: &mut ProjectStore,
    studio: &Studio,
    mut observe: impl FnMut(&str),
) -> Result<String, ApiError> {
    if store.state().concept_text.trim().is_empty() {
        store.set_error(Some(EMPTY_CONCEPT.into()));
        return Err(ApiError::invalid_input(EMPTY_CONCEPT));
    }

    store.clear_error();
    store.set_loading(true, Some(LoadingPhase::Analyzing));
    store.set_director_treatment("");

    let request = TreatmentRequest {
        concept_text: Some(store.state().concept_text.clone()),
        reference_image: store.state().reference_image.clone(),
    };
    let result = run_with_progress(
        &progress::BRIEF,
        |m| {
            store.add_loading_message(m);
            observe(m);
        },
        operations::generate_treatment(studio, &request),
    )
    .await;

    let outcome = match result {
        Ok(response) => {
            store.set_director_treatment(response.treatment.clone());
            info!(model = %response.metadata.model, "treatment stored");
            Ok(response.treatment)
        }
        Err(e) => {
            store.set_error(Some(e.message.clone()));
            Err(e)
        }
    };
    store.set_loading(false, None);
    outcome
}

/// Render the stored studio prompt with the stored references.
///
/// # Errors
///
/// Returns the classified failure, which is also recorded in the store.
pub async fn render(
    store: &mut ProjectStore,
    studio: &Studio,
    mut observe: impl FnMut(&str),
) -> Result<String, ApiError> {
    if store.state().studio_prompt.trim().is_empty() {
        store.set_error(Some(EMPTY_PROMPT.into()));
        return Err(ApiError::invalid_input(EMPTY_PROMPT));
    }

    store.clear_error();
    store.set_loading(true, Some(LoadingPhase::Rendering));
    store.set_generated_image(None);

    let state = store.state();
    let request = GenerateImageRequest {
        prompt: Some(state.studio_prompt.clone()),
        structure_reference: state.structure_reference.clone(),
        style_reference: state.style_reference.clone(),
    };
    let result = run_with_progress(
        &progress::STUDIO,
        |m| {
            store.add_loading_message(m);
            observe(m);
        },
        operations::generate_image(studio, &request),
    )
    .await;

    let outcome = match result {
        Ok(response) => {
            store.set_generated_image(Some(response.image_url.clone()));
            info!(
                model = %response.metadata.model,
                structure = response.metadata.has_structure_ref,
                style = response.metadata.has_style_ref,
                "render stored"
            );
            Ok(response.image_url)
        }
        Err(e) => {
            store.set_error(Some(e.message.clone()));
            Err(e)
        }
    };
    store.set_loading(false, None);
    outcome
}

/// Rewrite the stored studio prompt, using the structure reference or,
/// failing that, the style reference. With `apply` the result replaces the
/// studio prompt.
///
/// The rewrite keeps its own log: progress lines go only to `observe`, not
/// to the store's loading messages. Failures are recorded in the store.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty prompt, or the classified failure.
pub async fn rewrite(
    store: &mut ProjectStore,
    studio: &Studio,
    apply: bool,
    observe: impl FnMut(&str),
) -> Result<String, ApiError> {
    if store.state().studio_prompt.trim().is_empty() {
        store.set_error(Some(EMPTY_REWRITE.into()));
        return Err(ApiError::invalid_input(EMPTY_REWRITE));
    }

    let state = store.state();
    let request = RewriteRequest {
        original_prompt: Some(state.studio_prompt.clone()),
        reference_image: state.structure_reference.clone().or_else(|| state.style_reference.clone()),
    };

    store.clear_error();
    store.set_loading(true, Some(LoadingPhase::Rewriting));
    let result = run_with_progress(
        &progress::REWRITE,
        observe,
        operations::rewrite_prompt(studio, &request),
    )
    .await;

    let outcome = match result {
        Ok(response) => {
            if apply {
                store.set_studio_prompt(response.rewritten_prompt.clone());
                info!("rewritten prompt applied");
            }
            Ok(response.rewritten_prompt)
        }
        Err(e) => {
            store.set_error(Some(e.message.clone()));
            Err(e)
        }
    };
    store.set_loading(false, None);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ErrorKind;
    use crate::error::StudioError;
    use crate::ports::Part;
    use crate::profiles::Profiles;
    use crate::test_support::{MemoryStorage, StubModel};

    fn setup(stub: &StubModel) -> (ProjectStore, Studio) {
        let store = ProjectStore::open(Box::new(MemoryStorage::default()));
        (store, Studio::new(Box::new(stub.clone()), Profiles::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn empty_concept_records_error_without_calling_provider() {
        let stub = StubModel::text("unused");
        let (mut store, studio) = setup(&stub);
        store.set_concept_text("   ");

        let err = generate_brief(&mut store, &studio, |_| {}).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(store.state().error.as_deref(), Some(EMPTY_CONCEPT));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn brief_stores_treatment_and_ends_loading() {
        let stub = StubModel::text("Low-key practical light, 35mm, Portra 400.");
        let (mut store, studio) = setup(&stub);
        store.set_concept_text("Dragon in a sandbox, sad");
        store.set_reference_image(Some("data:image/png;base64,REF".into()));

        let mut seen = Vec::new();
        let treatment = generate_brief(&mut store, &studio, |m| seen.push(m.to_string())).await.unwrap();

        assert_eq!(treatment, "Low-key practical light, 35mm, Portra 400.");
        let state = store.state();
        assert_eq!(state.director_treatment, treatment);
        assert!(!state.is_loading);
        assert!(state.loading_phase.is_none());
        assert_eq!(state.loading_messages.last().map(String::as_str), Some("Treatment generated successfully!"));
        assert_eq!(seen, state.loading_messages);
        assert!(matches!(stub.last_request().parts.first(), Some(Part::InlineImage(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_is_recorded_and_clears_previous_image() {
        let stub = StubModel::fail(|| StudioError::Api { status: 429, message: "Resource exhausted".into() });
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a lighthouse in fog");
        store.set_generated_image(Some("data:image/png;base64,OLD".into()));

        let err = render(&mut store, &studio, |_| {}).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::RateLimited);
        let state = store.state();
        assert!(state.generated_image.is_none());
        assert_eq!(state.error.as_deref(), Some("Rate limit exceeded. Please try again later."));
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn render_stores_data_uri() {
        let stub = StubModel::image("image/png", "iVBORw0KGgo=");
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a lighthouse in fog");

        let uri = render(&mut store, &studio, |_| {}).await.unwrap();

        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(store.state().generated_image.as_deref(), Some(uri.as_str()));
        assert_eq!(store.state().loading_messages.last().map(String::as_str), Some("Render complete!"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_prompt_blocks_render() {
        let stub = StubModel::image("image/png", "AAAA");
        let (mut store, studio) = setup(&stub);

        let err = render(&mut store, &studio, |_| {}).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(store.state().error.as_deref(), Some(EMPTY_PROMPT));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rewrite_prefers_structure_and_applies_on_request() {
        let stub = StubModel::text("Shot on 16mm, halation on the neon.");
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a neon street");
        store.set_style_reference(Some("data:image/png;base64,STYLE".into()));
        store.set_structure_reference(Some("data:image/png;base64,STRUCT".into()));

        let kept = rewrite(&mut store, &studio, false, |_| {}).await.unwrap();
        assert_eq!(store.state().studio_prompt, "a neon street");
        match stub.last_request().parts.first() {
            Some(Part::InlineImage(image)) => assert_eq!(image.data, "STRUCT"),
            other => panic!("expected structure reference, got {other:?}"),
        }

        let applied = rewrite(&mut store, &studio, true, |_| {}).await.unwrap();
        assert_eq!(kept, applied);
        assert_eq!(store.state().studio_prompt, "Shot on 16mm, halation on the neon.");
    }

    #[tokio::test(start_paused = true)]
    async fn rewrite_falls_back_to_style_reference() {
        let stub = StubModel::text("rewritten");
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a neon street");
        store.set_style_reference(Some("data:image/png;base64,STYLE".into()));

        rewrite(&mut store, &studio, false, |_| {}).await.unwrap();

        match stub.last_request().parts.first() {
            Some(Part::InlineImage(image)) => assert_eq!(image.data, "STYLE"),
            other => panic!("expected style reference, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rewrite_failure_is_recorded_and_ends_loading() {
        let stub = StubModel::fail(|| StudioError::Replayed("model overloaded".into()));
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a neon street");

        let mut log = Vec::new();
        let err = rewrite(&mut store, &studio, true, |m| log.push(m.to_string())).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::ProviderError);
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("model overloaded"));
        assert!(!state.is_loading);
        assert!(state.loading_phase.is_none());
        assert_eq!(state.studio_prompt, "a neon street");
        assert!(state.loading_messages.is_empty());
        assert_eq!(log.last().map(String::as_str), Some("Error: Rewrite failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn rewrite_success_clears_stale_error() {
        let stub = StubModel::text("rewritten");
        let (mut store, studio) = setup(&stub);
        store.set_studio_prompt("a neon street");
        store.set_error(Some("previous failure".into()));

        rewrite(&mut store, &studio, false, |_| {}).await.unwrap();

        assert!(store.state().error.is_none());
        assert!(!store.state().is_loading);
    }
}
