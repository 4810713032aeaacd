//! Project state container: one mutable record per session, persisted
//! through an injected [`ProjectStorage`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ports::ProjectStorage;

/// What the session is currently busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingPhase {
    /// Reading a concept and reference for a treatment.
    Analyzing,
    /// Generic generation work.
    Generating,
    /// Rewriting a prompt.
    Rewriting,
    /// Rendering an image.
    Rendering,
}

impl fmt::Display for LoadingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Analyzing => "analyzing",
            Self::Generating => "generating",
            Self::Rewriting => "rewriting",
            Self::Rendering => "rendering",
        };
        f.write_str(name)
    }
}

/// The full session record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    /// Brief: reference image as a data-URI.
    pub reference_image: Option<String>,
    /// Brief: free-text concept.
    pub concept_text: String,
    /// Brief: generated treatment.
    pub director_treatment: String,
    /// Studio: structure reference as a data-URI.
    pub structure_reference: Option<String>,
    /// Studio: style reference as a data-URI.
    pub style_reference: Option<String>,
    /// Studio: prompt to render.
    pub studio_prompt: String,
    /// Studio: latest render as a data-URI.
    pub generated_image: Option<String>,
    /// A request is outstanding.
    pub is_loading: bool,
    /// What the outstanding request is doing.
    pub loading_phase: Option<LoadingPhase>,
    /// Progress log of the current or last request.
    pub loading_messages: Vec<String>,
    /// Last failure, for display.
    pub error: Option<String>,
}

/// The persisted subset of [`ProjectState`]: content fields only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSnapshot {
    /// See [`ProjectState::reference_image`].
    pub reference_image: Option<String>,
    /// See [`ProjectState::concept_text`].
    pub concept_text: String,
    /// See [`ProjectState::director_treatment`].
    pub director_treatment: String,
    /// See [`ProjectState::structure_reference`].
    pub structure_reference: Option<String>,
    /// See [`ProjectState::style_reference`].
    pub style_reference: Option<String>,
    /// See [`ProjectState::studio_prompt`].
    pub studio_prompt: String,
    /// See [`ProjectState::generated_image`].
    pub generated_image: Option<String>,
}

impl ProjectState {
    /// The content fields to persist.
    #[must_use]
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            reference_image: self.reference_image.clone(),
            concept_text: self.concept_text.clone(),
            director_treatment: self.director_treatment.clone(),
            structure_reference: self.structure_reference.clone(),
            style_reference: self.style_reference.clone(),
            studio_prompt: self.studio_prompt.clone(),
            generated_image: self.generated_image.clone(),
        }
    }

    /// Initial state with the snapshot's content restored.
    #[must_use]
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        Self {
            reference_image: snapshot.reference_image,
            concept_text: snapshot.concept_text,
            director_treatment: snapshot.director_treatment,
            structure_reference: snapshot.structure_reference,
            style_reference: snapshot.style_reference,
            studio_prompt: snapshot.studio_prompt,
            generated_image: snapshot.generated_image,
            ..Self::default()
        }
    }
}

/// Owns the session state. Every mutation goes through a setter, and
/// content changes are written to storage before the setter returns.
pub struct ProjectStore {
    state: ProjectState,
    storage: Box<dyn ProjectStorage>,
}

impl ProjectStore {
    /// Open the store, rehydrating content from `storage`.
    ///
    /// An unreadable snapshot is logged and replaced by the initial state.
    #[must_use]
    pub fn open(storage: Box<dyn ProjectStorage>) -> Self {
        let state = match storage.load() {
            Ok(Some(snapshot)) => ProjectState::from_snapshot(snapshot),
            Ok(None) => ProjectState::default(),
            Err(e) => {
                warn!("Discarding unreadable project snapshot: {e}");
                ProjectState::default()
            }
        };
        Self { state, storage }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    /// Set the brief reference image.
    pub fn set_reference_image(&mut self, image: Option<String>) {
        self.replace(|s| &mut s.reference_image, image);
    }

    /// Set the concept text.
    pub fn set_concept_text(&mut self, text: impl Into<String>) {
        self.replace(|s| &mut s.concept_text, text.into());
    }

    /// Set the treatment text.
    pub fn set_director_treatment(&mut self, treatment: impl Into<String>) {
        self.replace(|s| &mut s.director_treatment, treatment.into());
    }

    /// Copy the treatment into the studio prompt and the brief reference
    /// into the structure reference, as one change.
    pub fn send_treatment_to_studio(&mut self) {
        let s = &mut self.state;
        if s.studio_prompt == s.director_treatment && s.structure_reference == s.reference_image {
            return;
        }
        s.studio_prompt.clone_from(&s.director_treatment);
        s.structure_reference.clone_from(&s.reference_image);
        self.persist();
    }

    /// Set the structure reference.
    pub fn set_structure_reference(&mut self, image: Option<String>) {
        self.replace(|s| &mut s.structure_reference, image);
    }

    /// Set the style reference.
    pub fn set_style_reference(&mut self, image: Option<String>) {
        self.replace(|s| &mut s.style_reference, image);
    }

    /// Set the studio prompt.
    pub fn set_studio_prompt(&mut self, prompt: impl Into<String>) {
        self.replace(|s| &mut s.studio_prompt, prompt.into());
    }

    /// Set or clear the latest render.
    pub fn set_generated_image(&mut self, image: Option<String>) {
        self.replace(|s| &mut s.generated_image, image);
    }

    /// Start or finish a request. Starting clears the progress log;
    /// finishing keeps it for display.
    pub fn set_loading(&mut self, is_loading: bool, phase: Option<LoadingPhase>) {
        self.state.is_loading = is_loading;
        self.state.loading_phase = phase;
        if is_loading {
            self.state.loading_messages.clear();
        }
    }

    /// Append a line to the progress log.
    pub fn add_loading_message(&mut self, message: impl Into<String>) {
        self.state.loading_messages.push(message.into());
    }

    /// Record a failure. Always ends loading.
    pub fn set_error(&mut self, error: Option<String>) {
        self.state.error = error;
        self.state.is_loading = false;
        self.state.loading_phase = None;
    }

    /// Forget the last failure.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Return to the initial state and discard the stored snapshot.
    pub fn reset(&mut self) {
        self.state = ProjectState::default();
        if let Err(e) = self.storage.clear() {
            warn!("Failed to discard project snapshot: {e}");
        }
    }

    /// Write one content field, persisting only when its value changes.
    fn replace<T: PartialEq>(&mut self, field: impl FnOnce(&mut ProjectState) -> &mut T, value: T) {
        let slot = field(&mut self.state);
        if *slot != value {
            *slot = value;
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state.snapshot()) {
            warn!("Failed to persist project snapshot: {e}");
        }
    }
}
