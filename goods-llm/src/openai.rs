use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use goods_core::{GoodsError, GoodsResult};
use tracing::{debug, instrument};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo-preview";

/// Chat-completion backend
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Send one system and one user message, returning the reply text
    async fn complete(&self, system: &str, user: &str) -> GoodsResult<String>;
}

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIClient {
    pub fn new() -> Self {
        // async-openai reads OPENAI_API_KEY from env automatically
        Self::with_config(OpenAIConfig::default())
    }

    pub fn with_config(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageService for OpenAIClient {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> GoodsResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| GoodsError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(|e| GoodsError::internal(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| GoodsError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GoodsError::api(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GoodsError::parse("No response from OpenAI"))?;

        debug!("Received {} chars from chat completion", content.len());
        Ok(content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{user_prompt, SYSTEM_PROMPT};

    #[test]
    fn test_default_model() {
        let client = OpenAIClient::with_config(OpenAIConfig::new().with_api_key("sk-test"));
        assert_eq!(client.model(), "gpt-4-turbo-preview");
        assert_eq!(client.with_model("gpt-4o").model(), "gpt-4o");
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_complete_product_query() {
        let client = OpenAIClient::new();
        let reply = client
            .complete(SYSTEM_PROMPT, &user_prompt("eco-friendly lotion over $20"))
            .await
            .expect("Failed to complete");

        assert!(!reply.trim().is_empty());
    }
}
