//! The three studio operations, built on the generative model port.
//!
//! Each operation assembles a multi-part request, runs it under its model
//! profile and extracts text or an image. Provider failures are returned
//! unchanged; classifying them is the HTTP boundary's job.

use tracing::debug;

use crate::data_uri;
use crate::error::StudioError;
use crate::ports::{ContentRequest, GenerativeModel, Part};
use crate::profiles::Profiles;

const CLOSING_IMAGE_INSTRUCTION: &str =
    " Generate a high-quality, photorealistic image with gritty textures and cinematic lighting.";

/// Facade over the generative model for treatments, rewrites and renders.
pub struct Studio {
    model: Box<dyn GenerativeModel>,
    profiles: Profiles,
}

impl Studio {
    /// Create a studio over the given model and profiles.
    #[must_use]
    pub fn new(model: Box<dyn GenerativeModel>, profiles: Profiles) -> Self {
        Self { model, profiles }
    }

    /// The profiles calls run under.
    #[must_use]
    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    /// Turn a concept, and optionally a reference image, into a director's
    /// treatment.
    ///
    /// # Errors
    ///
    /// Propagates any provider failure, and returns
    /// [`StudioError::Blocked`] when the provider withheld the candidate.
    pub async fn generate_director_treatment(
        &self,
        concept_text: &str,
        reference_image: Option<&str>,
    ) -> Result<String, StudioError> {
        let parts = match reference_image {
            Some(image) => vec![
                image_part(image),
                Part::Text(format!(
                    "\n\nReference image provided above. Analyze this image along with the following concept:\n\n\
                     {concept_text}\n\n\
                     Create a Director's Treatment that transforms this into gritty, photorealistic cinematography."
                )),
            ],
            None => vec![Part::Text(format!(
                "Concept: {concept_text}\n\n\
                 Create a Director's Treatment that transforms this concept into gritty, photorealistic cinematography."
            ))],
        };

        let request = ContentRequest { profile: self.profiles.director.clone(), parts };
        self.model.generate_content(&request).await?.into_text()
    }

    /// Rewrite a prompt for gritty realism, optionally grounded in an image.
    ///
    /// # Errors
    ///
    /// Propagates any provider failure, and returns
    /// [`StudioError::Blocked`] when the provider withheld the candidate.
    pub async fn rewrite_prompt(
        &self,
        original_prompt: &str,
        reference_image: Option<&str>,
    ) -> Result<String, StudioError> {
        let parts = match reference_image {
            Some(image) => vec![
                image_part(image),
                Part::Text(format!(
                    "\n\nLook at this image. Rewrite the following prompt to describe this exact scene, \
                     but imagine it was shot with a 100mm Macro lens on Kodak Portra 400 film. \
                     Focus on surface imperfections.\n\nOriginal prompt: {original_prompt}"
                )),
            ],
            None => vec![Part::Text(format!(
                "Rewrite this prompt for gritty photorealistic execution:\n\n{original_prompt}"
            ))],
        };

        let request = ContentRequest { profile: self.profiles.rewriter.clone(), parts };
        self.model.generate_content(&request).await?.into_text()
    }

    /// Render an image from a prompt plus optional structure and style
    /// references, returning it as a data-URI.
    ///
    /// # Errors
    ///
    /// Propagates any provider failure, and returns
    /// [`StudioError::NoImageProduced`] when no response part carries image
    /// data. A withheld finish reason without an image is
    /// [`StudioError::Blocked`].
    pub async fn generate_styled_image(
        &self,
        prompt: &str,
        structure_reference: Option<&str>,
        style_reference: Option<&str>,
    ) -> Result<String, StudioError> {
        let mut parts = Vec::with_capacity(3);
        let mut full_prompt = prompt.to_string();

        if let Some(image) = structure_reference {
            parts.push(image_part(image));
            full_prompt = format!(
                "Using the structure and composition from the provided reference image, create: {prompt}"
            );
        }

        if let Some(image) = style_reference {
            parts.push(image_part(image));
            full_prompt
                .push_str(" Apply the visual style, texture, and lighting from the style reference image.");
        }

        full_prompt.push_str(CLOSING_IMAGE_INSTRUCTION);
        parts.push(Part::Text(full_prompt));

        let request = ContentRequest { profile: self.profiles.image.clone(), parts };
        let response = self.model.generate_content(&request).await?;

        match response.first_image() {
            Some(image) => {
                debug!(mime = %image.mime_type, bytes = image.data.len(), "image received");
                Ok(data_uri::format(&image.mime_type, &image.data))
            }
            None => match response.withheld_reason() {
                Some(reason) => Err(StudioError::Blocked { reason: reason.to_string() }),
                None => Err(StudioError::NoImageProduced { text: response.text() }),
            },
        }
    }
}

/// Package a data-URI as an inline image part.
#[must_use]
pub fn image_part(uri: &str) -> Part {
    Part::InlineImage(data_uri::to_inline_image(uri))
}
