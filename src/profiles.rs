//! Model profiles: model identifiers, sampling parameters and personas.

use serde::{Deserialize, Serialize};

/// Default model for treatment and rewrite calls.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

/// Default model for image synthesis.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

const DIRECTOR_INSTRUCTION: &str = "\
You are an Art Director obsessed with texture, working in gritty, photorealistic cinematography.

Read the concept you are given (and the reference image, when there is one) and write a \
Director's Treatment: a prompt precise enough to brief a cinematographer on a single frame.

Before writing, weigh three lighting setups:
- hard chiaroscuro with deep, unforgiving shadows
- soft, diffused natural light with ambient fill
- rim light motivated by practical sources in the scene
Keep whichever setup gives the most gritty realism and the least cartoon smoothness.

The treatment must cover:
- Lighting: key, fill, rim and practicals
- Lens: camera body, focal length, aperture, depth of field
- Texture: surface wear, material detail, weathering, imperfections
- Color grade: film stock or palette reference
- Composition: framing, angle, perspective
- Atmosphere: haze, dust, moisture, particles in the air

Write it as one flowing paragraph, never as a list, between 100 and 200 words, in the voice \
of professional direction.";

const REWRITER_INSTRUCTION: &str = "\
You rewrite image prompts for gritty photorealism. Prompts that read as cute, clean or \
cartoonish are your main target.

Picture every scene as:
- shot through a 100mm macro lens on Kodak Portra 400
- lit by a veteran cinematographer
- full of visible surface flaws and micro-detail

Push each element toward the physical:
- smooth skin becomes visible pores, faint sun damage, natural oils catching the light
- bright eyes become veined sclera, textured irises, the room reflected back
- a clean background becomes dust motes in the air, scratched surfaces, aged materials

Return only the rewritten prompt with no commentary. Aim for 50 to 150 words, dense with \
visual detail an image model can act on.";

/// Output modalities a model may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Text output.
    Text,
    /// Image output.
    Image,
}

/// Fixed configuration one kind of call runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Provider model identifier.
    pub model: String,
    /// Persona and output contract, when the call has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum output tokens.
    pub max_output_tokens: u32,
    /// Requested response modalities; empty means the provider default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<Modality>,
}

/// The three profiles the studio uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Profiles {
    /// Director's treatment generation.
    pub director: ModelProfile,
    /// Prompt rewriting.
    pub rewriter: ModelProfile,
    /// Image synthesis.
    pub image: ModelProfile,
}

impl Profiles {
    /// Build the profiles for the given text and image model identifiers.
    #[must_use]
    pub fn new(text_model: &str, image_model: &str) -> Self {
        Self {
            director: ModelProfile {
                model: text_model.to_string(),
                system_instruction: Some(DIRECTOR_INSTRUCTION.to_string()),
                temperature: 0.8,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 1024,
                response_modalities: Vec::new(),
            },
            rewriter: ModelProfile {
                model: text_model.to_string(),
                system_instruction: Some(REWRITER_INSTRUCTION.to_string()),
                temperature: 0.7,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 512,
                response_modalities: Vec::new(),
            },
            image: ModelProfile {
                model: image_model.to_string(),
                system_instruction: None,
                temperature: 1.0,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                response_modalities: vec![Modality::Text, Modality::Image],
            },
        }
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_MODEL, DEFAULT_IMAGE_MODEL)
    }
}
