mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};

use client::OpenAiClient;

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";

/// Default size for generated images.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Simple chat completion.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user))
            .temperature(temperature)
            .max_tokens(max_tokens);

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }

    /// Generate a single image and return its hosted URL.
    pub async fn generate_image(&self, prompt: impl Into<String>) -> Result<String> {
        let request = types::ImageRequest {
            model: DEFAULT_IMAGE_MODEL.to_string(),
            prompt: prompt.into(),
            n: 1,
            size: DEFAULT_IMAGE_SIZE.to_string(),
        };

        let response = self.client().generate_image(&request).await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| anyhow!("No image URL in response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_model() {
        let agent = OpenAi::new("test-key", "gpt-3.5-turbo");
        assert_eq!(agent.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn with_base_url_overrides_default() {
        let agent = OpenAi::new("test-key", "gpt-3.5-turbo").with_base_url("http://localhost:8080");
        assert_eq!(agent.base_url.as_deref(), Some("http://localhost:8080"));
    }
}
