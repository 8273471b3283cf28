//! Google Gemini `generateContent` client.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{ChatProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// The API key is only exposed when building the request header.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Without a key every call fails with [`ProviderError::Unavailable`].
    pub fn new(api_key: Option<SecretString>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::Unavailable("GEMINI_API_KEY is not set".to_owned()));
        };

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "calling generateContent");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        reply_text(response.json().await?)
    }
}

/// Concatenated text parts of the first candidate.
fn reply_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderError::EmptyResponse {
            reason: block_reason.unwrap_or_else(|| "no candidates".to_owned()),
        });
    };

    let text: String = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        return Err(ProviderError::EmptyResponse {
            reason: candidate
                .finish_reason
                .or(block_reason)
                .unwrap_or_else(|| "empty candidate".to_owned()),
        });
    }

    Ok(text)
}
