use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{http_client, GenerationProvider, GenerationRequest, ProviderError};

pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// OpenAI 互換 chat completions API（Groq 等）を使用したプロバイダ
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            name: name.into(),
            endpoint: endpoint.into(),
            api_key,
            model,
        })
    }

    pub fn groq(api_key: String, model: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new(
            "groq",
            GROQ_ENDPOINT,
            api_key,
            model.unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_string()),
            timeout,
        )
    }
}

fn first_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl GenerationProvider for OpenAiCompatProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(&self.name, status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Failed(format!("Response parse error: {e}")))?;

        first_content(parsed).ok_or(ProviderError::EmptyResponse)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_defaults() {
        let provider = OpenAiCompatProvider::groq("k".to_string(), None, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), GROQ_DEFAULT_MODEL);
        assert_eq!(provider.endpoint, GROQ_ENDPOINT);
    }

    #[test]
    fn test_groq_default_is_general_model() {
        assert_eq!(GROQ_DEFAULT_MODEL, "llama-3.3-70b-versatile");
        let provider =
            OpenAiCompatProvider::groq("k".to_string(), Some("llama-3.1-8b-instant".to_string()), Duration::from_secs(5))
                .unwrap();
        assert_eq!(provider.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_first_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Done."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(parsed).as_deref(), Some("Done."));
    }

    #[test]
    fn test_empty_content_is_none() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(first_content(parsed).is_none());

        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_content(parsed).is_none());

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_content(parsed).is_none());
    }
}
