//! Seam between content generation and the LLM provider.

use anyhow::Result;
use async_trait::async_trait;

/// Chat model used for blog generation.
pub const CHAT_MODEL: &str = "gpt-3.5-turbo";

#[async_trait]
pub trait ContentModel: Send + Sync {
    async fn generate_text(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;

    /// Generate one image and return its hosted URL.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl ContentModel for ai_client::OpenAi {
    async fn generate_text(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        self.chat_completion(system, user, temperature, max_tokens)
            .await
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        ai_client::OpenAi::generate_image(self, prompt).await
    }
}
