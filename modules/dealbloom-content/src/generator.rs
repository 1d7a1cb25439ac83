//! LLM blog-post generation with a guaranteed fallback.

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::warn;

use crate::fallback;
use crate::images::ImageSet;
use crate::model::ContentModel;
use crate::prompt;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// A post ready to persist. Both generation paths produce one.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
}

/// Generation outcome with provenance.
#[derive(Debug, Clone)]
pub enum GeneratedContent {
    /// The model returned valid JSON with all required fields.
    Generated(PostDraft),
    /// Generation failed somewhere and the fixed template took over.
    Fallback(PostDraft),
}

impl GeneratedContent {
    pub fn post(&self) -> &PostDraft {
        match self {
            Self::Generated(p) | Self::Fallback(p) => p,
        }
    }

    pub fn into_post(self) -> PostDraft {
        match self {
            Self::Generated(p) | Self::Fallback(p) => p,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Wire shape the model is asked to produce.
#[derive(Debug, Deserialize)]
struct LlmPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, rename = "metaDescription")]
    meta_description: Option<String>,
}

/// Generate a post for a campaign. Total: every failure path lands in the
/// fallback template, so callers always get content.
pub async fn generate_post(
    model: &dyn ContentModel,
    title: &str,
    category: &str,
    images: &ImageSet,
) -> GeneratedContent {
    match try_generate(model, title, category, Some(&images.lifestyle)).await {
        Ok(draft) => GeneratedContent::Generated(draft),
        Err(e) => {
            warn!(title = %title, error = %e, "Blog generation failed, composing fallback");
            GeneratedContent::Fallback(fallback::compose(title, category, Some(images)))
        }
    }
}

async fn try_generate(
    model: &dyn ContentModel,
    title: &str,
    category: &str,
    embed_image: Option<&str>,
) -> Result<PostDraft> {
    let brief = prompt::build_content_brief(title, category, embed_image);
    let raw = model
        .generate_text(prompt::SYSTEM_PROMPT, &brief, TEMPERATURE, MAX_TOKENS)
        .await?;

    let parsed: LlmPost = serde_json::from_str(ai_client::util::strip_code_blocks(&raw))?;

    if parsed.title.is_empty() || parsed.content.is_empty() || parsed.excerpt.is_empty() {
        bail!("Model response missing required fields");
    }

    Ok(PostDraft {
        title: parsed.title,
        content: parsed.content,
        excerpt: parsed.excerpt,
        tags: parsed.tags,
        meta_description: parsed.meta_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FailingModel, FixtureModel};

    fn image_set() -> ImageSet {
        ImageSet {
            primary: "https://cdn.example.com/banner.jpg".to_string(),
            lifestyle: "https://cdn.example.com/life.jpg".to_string(),
            detail: "https://cdn.example.com/detail.jpg".to_string(),
            promotional: "https://cdn.example.com/promo.jpg".to_string(),
        }
    }

    const VALID_JSON: &str = r#"{
        "title": "패션 특가 모음",
        "content": "<h2>패션 특가</h2><p>이번 주 하이라이트.</p>",
        "excerpt": "이번 주 패션 특가 모음",
        "tags": ["패션", "특가", "할인"],
        "metaDescription": "패션 특가 총정리"
    }"#;

    #[tokio::test]
    async fn valid_model_json_yields_generated_variant() {
        let model = FixtureModel::new(VALID_JSON, "unused");
        let result = generate_post(&model, "패션 위크", "패션", &image_set()).await;

        assert!(!result.is_fallback());
        let post = result.post();
        assert_eq!(post.title, "패션 특가 모음");
        assert_eq!(post.tags.len(), 3);
        assert_eq!(post.meta_description.as_deref(), Some("패션 특가 총정리"));
    }

    #[tokio::test]
    async fn fenced_json_is_unwrapped_before_parsing() {
        let fenced = format!("```json\n{VALID_JSON}\n```");
        let model = FixtureModel::new(fenced, "unused");
        let result = generate_post(&model, "패션 위크", "패션", &image_set()).await;
        assert!(!result.is_fallback());
    }

    #[tokio::test]
    async fn failing_model_always_yields_fallback_content() {
        let result = generate_post(&FailingModel, "Winter Sale", "패션", &image_set()).await;

        assert!(result.is_fallback());
        let post = result.post();
        assert!(!post.title.is_empty());
        assert!(!post.content.is_empty());
        assert!(!post.excerpt.is_empty());
        assert!(post.title.contains("Winter Sale"));
        assert!(post.content.contains("<h2>Winter Sale 기획전 상세 리뷰</h2>"));
    }

    #[tokio::test]
    async fn malformed_json_falls_back() {
        let model = FixtureModel::new("정말 멋진 기획전이네요!", "unused");
        let result = generate_post(&model, "특가", "일반", &image_set()).await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn missing_required_field_falls_back() {
        let model = FixtureModel::new(
            r#"{"title": "제목", "content": "", "excerpt": "요약"}"#,
            "unused",
        );
        let result = generate_post(&model, "특가", "일반", &image_set()).await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn fallback_inlines_resolved_slot_images() {
        let result = generate_post(&FailingModel, "특가", "뷰티", &image_set()).await;
        let post = result.post();
        assert!(post.content.contains("https://cdn.example.com/life.jpg"));
        assert!(post.content.contains("https://cdn.example.com/promo.jpg"));
    }
}
