use std::sync::Arc;

use tracing::{info, warn};

use assistant_common::openai::{ChatCompletionRequest, Message, OpenAiClient, OpenAiClientError};

const SYSTEM_PROMPT: &str = "You are a helpful health assistant.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 200;

/// Free-text advice from a hosted chat model for inputs the catalog cannot answer.
#[derive(Clone)]
pub struct FallbackResponder {
    client: Arc<OpenAiClient>,
    model: String,
}

impl FallbackResponder {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn build_request(&self, input: &str) -> ChatCompletionRequest {
        let instruction = format!(
            "A user reports the symptom: '{input}'. Provide concise, safe, and informative advice. \
Suggest next steps but do NOT provide a diagnosis."
        );
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(instruction)],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
        }
    }

    /// Trimmed text of the first completion choice.
    pub async fn try_respond(&self, input: &str) -> Result<String, OpenAiClientError> {
        let request = self.build_request(input);
        let response = self.client.chat_completions(&request).await?;
        let text = response.first_content()?.trim().to_string();
        info!(model = %self.model, chars = text.len(), "fallback response received");
        Ok(text)
    }

    /// Like `try_respond`, but any failure is rendered as `Error: <description>`.
    pub async fn respond(&self, input: &str) -> String {
        match self.try_respond(input).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, model = %self.model, "fallback request failed");
                format!("Error: {e}")
            }
        }
    }
}
