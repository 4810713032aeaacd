//! Live adapter for the Gemini `generateContent` API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::StudioError;
use crate::ports::generative_model::{
    ContentFuture, ContentRequest, ContentResponse, GenerativeModel, InlineImage, Part,
    WITHHELD_FINISH_REASONS,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini model that calls the Google AI API.
pub struct GeminiModel {
    client: Client,
    api_key: String,
}

impl GeminiModel {
    /// Create a new Gemini model client with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

impl GenerativeModel for GeminiModel {
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.profile.model);
            let body = build_body(&request);

            debug!(model = %request.profile.model, parts = request.parts.len(), "calling Gemini");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(StudioError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                StudioError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            into_content_response(parsed)
        })
    }
}

/// Build the JSON body for a generate-content call.
fn build_body(request: &ContentRequest) -> Value {
    let profile = &request.profile;
    let parts: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => json!({ "text": text }),
            Part::InlineImage(image) => json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }),
        })
        .collect();

    let mut generation_config = json!({
        "temperature": profile.temperature,
        "topP": profile.top_p,
        "topK": profile.top_k,
        "maxOutputTokens": profile.max_output_tokens,
    });
    if !profile.response_modalities.is_empty() {
        generation_config["responseModalities"] = json!(profile.response_modalities);
    }

    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": generation_config,
    });
    if let Some(ref instruction) = profile.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

/// Pull `error.message` out of a Gemini error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string())
}

fn into_content_response(parsed: GeminiResponse) -> Result<ContentResponse, StudioError> {
    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(StudioError::Blocked { reason });
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Ok(ContentResponse::default());
    };

    let parts: Vec<Part> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| {
            if let Some(inline) = part.inline_data {
                Some(Part::InlineImage(InlineImage {
                    mime_type: inline.mime_type,
                    data: inline.data,
                }))
            } else {
                part.text.map(Part::Text)
            }
        })
        .collect();

    if parts.is_empty() {
        if let Some(reason) = candidate
            .finish_reason
            .as_deref()
            .filter(|r| WITHHELD_FINISH_REASONS.contains(r))
        {
            return Err(StudioError::Blocked { reason: reason.to_string() });
        }
    }

    Ok(ContentResponse { parts, finish_reason: candidate.finish_reason })
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}
