//! Four-slot image resolution for generated posts.
//!
//! Every post gets a primary, lifestyle, detail and promotional image. Slots
//! resolve in order: supplied URL (primary only), generative API, then a
//! deterministic category-keyed placeholder. Resolution never fails.

use tracing::warn;

use crate::model::ContentModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Primary,
    Lifestyle,
    Detail,
    Promotional,
}

impl ImageSlot {
    /// Seed token appended to the category stem in fallback URLs. The primary
    /// slot keeps the bare stem; content slots are numbered.
    fn seed_token(self) -> &'static str {
        match self {
            Self::Primary => "",
            Self::Lifestyle => "1",
            Self::Detail => "2",
            Self::Promotional => "3",
        }
    }

    fn prompt(self, category: &str) -> String {
        match self {
            Self::Primary => {
                format!("{category} 기획전 대표 배너, 상품이 돋보이는 깔끔한 구도")
            }
            Self::Lifestyle => {
                format!("{category} 상품을 일상에서 사용하는 라이프스타일 사진, 밝고 따뜻한 분위기")
            }
            Self::Detail => {
                format!("{category} 상품 클로즈업 디테일 사진, 스튜디오 조명")
            }
            Self::Promotional => {
                format!("{category} 할인 프로모션 배너, 시선을 끄는 화려한 색감")
            }
        }
    }
}

/// Resolved URLs for every slot. Always fully populated.
#[derive(Debug, Clone)]
pub struct ImageSet {
    pub primary: String,
    pub lifestyle: String,
    pub detail: String,
    pub promotional: String,
}

fn category_stem(category: &str) -> &'static str {
    match category {
        "패션" => "fashion",
        "뷰티" => "beauty",
        "전자제품" => "electronics",
        "홈리빙" => "home",
        _ => "general",
    }
}

/// Deterministic category-keyed placeholder for a slot. Unknown categories
/// share the general stem.
pub fn fallback_image_for(category: &str, slot: ImageSlot) -> String {
    format!(
        "https://picsum.photos/seed/{}{}/800/400",
        category_stem(category),
        slot.seed_token()
    )
}

/// Resolve all four slots for a campaign. `supplied` is the campaign's own
/// banner image and wins the primary slot when present.
pub async fn resolve_images(
    model: &dyn ContentModel,
    category: &str,
    supplied: Option<&str>,
) -> ImageSet {
    let primary = match supplied {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => resolve_slot(model, category, ImageSlot::Primary).await,
    };

    ImageSet {
        primary,
        lifestyle: resolve_slot(model, category, ImageSlot::Lifestyle).await,
        detail: resolve_slot(model, category, ImageSlot::Detail).await,
        promotional: resolve_slot(model, category, ImageSlot::Promotional).await,
    }
}

async fn resolve_slot(model: &dyn ContentModel, category: &str, slot: ImageSlot) -> String {
    match model.generate_image(&slot.prompt(category)).await {
        Ok(url) => url,
        Err(e) => {
            warn!(?slot, category = %category, error = %e, "Image generation failed, using category placeholder");
            fallback_image_for(category, slot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FailingModel, FixtureModel};

    #[test]
    fn known_categories_map_to_their_stems() {
        assert_eq!(
            fallback_image_for("패션", ImageSlot::Primary),
            "https://picsum.photos/seed/fashion/800/400"
        );
        assert_eq!(
            fallback_image_for("뷰티", ImageSlot::Lifestyle),
            "https://picsum.photos/seed/beauty1/800/400"
        );
        assert_eq!(
            fallback_image_for("전자제품", ImageSlot::Detail),
            "https://picsum.photos/seed/electronics2/800/400"
        );
    }

    #[test]
    fn unknown_category_falls_back_to_general_stem() {
        let url = fallback_image_for("운동화", ImageSlot::Promotional);
        assert_eq!(url, "https://picsum.photos/seed/general3/800/400");
    }

    #[test]
    fn slots_get_distinct_seeds() {
        let urls = [
            fallback_image_for("홈리빙", ImageSlot::Primary),
            fallback_image_for("홈리빙", ImageSlot::Lifestyle),
            fallback_image_for("홈리빙", ImageSlot::Detail),
            fallback_image_for("홈리빙", ImageSlot::Promotional),
        ];
        for (i, a) in urls.iter().enumerate() {
            for b in urls.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn supplied_url_wins_the_primary_slot() {
        let model = FixtureModel::new("{}", "https://generated.example.com/img.png");
        let set = resolve_images(&model, "패션", Some("https://cdn.example.com/banner.jpg")).await;
        assert_eq!(set.primary, "https://cdn.example.com/banner.jpg");
        assert_eq!(set.lifestyle, "https://generated.example.com/img.png");
    }

    #[tokio::test]
    async fn failing_model_still_fills_every_slot() {
        let set = resolve_images(&FailingModel, "뷰티", None).await;
        assert_eq!(set.primary, "https://picsum.photos/seed/beauty/800/400");
        assert_eq!(set.lifestyle, "https://picsum.photos/seed/beauty1/800/400");
        assert_eq!(set.detail, "https://picsum.photos/seed/beauty2/800/400");
        assert_eq!(set.promotional, "https://picsum.photos/seed/beauty3/800/400");
    }

    #[tokio::test]
    async fn empty_supplied_url_is_not_used() {
        let set = resolve_images(&FailingModel, "일반", Some("")).await;
        assert_eq!(set.primary, "https://picsum.photos/seed/general/800/400");
    }
}
