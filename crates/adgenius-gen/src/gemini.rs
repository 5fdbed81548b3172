use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::GenerationError;
use crate::provider::GenerationProvider;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini `generateContent` gateway. One request per operation, API key
/// auth, no streaming.
pub struct GeminiProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString) -> Self {
        Self::with_base_url(api_key, API_BASE.to_owned())
    }

    /// Point the provider at a different endpoint (test servers).
    pub fn with_base_url(api_key: SecretString, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = format!("{}/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), model, "generation request failed");
            return Err(GenerationError::from_status(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, audience, tone))]
    async fn generate_copy(
        &self,
        product_name: &str,
        audience: &str,
        tone: &str,
    ) -> Result<String, GenerationError> {
        let prompt = copy_prompt(product_name, audience, tone);
        let response = self.generate(TEXT_MODEL, &prompt).await?;
        let text = extract_text(&response).ok_or(GenerationError::EmptyResponse)?;
        debug!(chars = text.len(), "ad copy generated");
        Ok(text)
    }

    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self.generate(IMAGE_MODEL, prompt).await?;
        let data_url = extract_inline_image(&response).ok_or(GenerationError::NoImageData)?;
        debug!(chars = data_url.len(), "ad image generated");
        Ok(data_url)
    }
}

/// Prompt template for ad copy. Kept short and directive so the raw model
/// output can be used verbatim as the description field.
fn copy_prompt(product_name: &str, audience: &str, tone: &str) -> String {
    format!(
        "Write a compelling, short advertisement description (max 2 sentences) \
         for a product named \"{product_name}\".\n\
         Target Audience: {audience}.\n\
         Tone: {tone}.\n\
         Focus on benefits and call to action. Return ONLY the raw text of the ad copy."
    )
}

/// First text part of the first candidate, if any.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .find_map(|part| part.text.clone())
}

/// First inline image of the first candidate, as a data URL.
fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .map(|inline| {
            let mime = if inline.mime_type.is_empty() {
                "image/png"
            } else {
                &inline.mime_type
            };
            format!("data:{};base64,{}", mime, inline.data)
        })
}

// --- Wire types (subset of the generateContent schema we use) ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".into(),
                parts: vec![RequestPart {
                    text: prompt.to_owned(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}
