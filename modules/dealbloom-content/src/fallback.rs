//! Fixed Korean template used whenever model generation fails.

use chrono::Utc;

use crate::generator::PostDraft;
use crate::images::ImageSet;

/// Compose the template post for a campaign. Total. When no resolved image
/// set is available the inline images degrade to timestamp-seeded
/// placeholders so the body still renders.
pub fn compose(title: &str, category: &str, images: Option<&ImageSet>) -> PostDraft {
    let millis = Utc::now().timestamp_millis();
    let (img1, img2, promo) = match images {
        Some(set) => (
            set.lifestyle.clone(),
            set.detail.clone(),
            set.promotional.clone(),
        ),
        None => (
            format!("https://picsum.photos/800/400?random={millis}"),
            format!("https://picsum.photos/800/400?random={}", millis + 1),
            format!("https://picsum.photos/800/400?random={}", millis + 2),
        ),
    };

    let content = format!(
        r#"<h2>{title} 기획전 상세 리뷰</h2>

<img src="{img1}" alt="{category} 기획전 상품 이미지" style="width: 100%; max-width: 800px; height: 400px; object-fit: cover; border-radius: 8px; margin: 20px 0;" />

<h3>🎯 기획전 개요</h3>
<p>온라인에서 진행 중인 <strong>{title}</strong> 기획전이 뜨거운 관심을 받고 있습니다. {category} 카테고리의 인기 상품들이 대폭 할인된 가격으로 만나볼 수 있는 절호의 기회입니다.</p>

<h3>🔥 주목해야 하는 이유</h3>
<p>최근 {category} 시장 트렌드를 보면, 소비자들의 관심이 급증하고 있습니다. 특히 품질 대비 가격이 합리적인 상품들에 대한 수요가 크게 늘어나고 있어, 이번 기획전은 스마트한 구매를 원하는 분들에게 최적의 타이밍입니다.</p>

<img src="{img2}" alt="{category} 트렌드 및 라이프스타일 이미지" style="width: 100%; max-width: 800px; height: 400px; object-fit: cover; border-radius: 8px; margin: 20px 0;" />

<h3>💰 특별 혜택 및 할인 정보</h3>
<p>이번 기획전에서는 다음과 같은 다양한 혜택을 제공합니다:</p>
<ul>
  <li>선택 상품 최대 50% 할인</li>
  <li>추가 쿠폰 및 적립금 혜택</li>
  <li>빠른 배송 서비스</li>
  <li>무료배송 혜택 (조건부)</li>
</ul>

<h3>🛍️ 현명한 구매 가이드</h3>
<p>기획전 기간 중 현명한 구매를 위한 팁을 알려드립니다:</p>
<ul>
  <li>리뷰가 많고 평점이 높은 상품 우선 선택</li>
  <li>가격 비교를 통한 최적 가격 확인</li>
  <li>배송 조건 및 반품/교환 정책 사전 확인</li>
  <li>쿠폰 및 적립금 활용으로 추가 절약</li>
</ul>

<h3>⏰ 놓치지 마세요!</h3>
<p>이런 특가 기회는 자주 오지 않습니다. {category} 상품 구매를 고려하고 계셨다면, 지금이 바로 그 때입니다. 재고 소진 전에 서둘러 확인해보세요!</p>

<p class="cta-section" style="background: #f8f9fa; padding: 20px; border-radius: 8px; text-align: center; margin: 20px 0;">
  <img src="{promo}" alt="{category} 프로모션 배너" style="width: 100%; max-width: 800px; border-radius: 8px; margin-bottom: 12px;" />
  <strong>🎉 지금 바로 특가 상품 확인하기!</strong><br>
  한정된 기간, 한정된 수량으로 진행되는 특별 기획전입니다.
</p>"#
    );

    let first_tag = if category.is_empty() {
        "일반".to_string()
    } else {
        category.to_string()
    };

    PostDraft {
        title: format!("{title} - 놓치면 후회할 특가 기회!"),
        content,
        excerpt: format!(
            "{title} 기획전에서 {category} 상품들을 특가로 만나보세요! 최대 50% 할인과 다양한 혜택이 준비되어 있습니다. 놓치면 후회할 기회, 지금 바로 확인해보세요."
        ),
        tags: vec![
            first_tag,
            "특가".to_string(),
            "할인".to_string(),
            "기획전".to_string(),
            "쇼핑".to_string(),
        ],
        meta_description: Some(format!(
            "{title} 기획전 완벽 가이드! {category} 상품 최대 50% 할인, 특별 혜택 총정리. 현명한 구매 팁과 추천 상품까지!"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_set() -> ImageSet {
        ImageSet {
            primary: "https://cdn.example.com/banner.jpg".to_string(),
            lifestyle: "https://cdn.example.com/life.jpg".to_string(),
            detail: "https://cdn.example.com/detail.jpg".to_string(),
            promotional: "https://cdn.example.com/promo.jpg".to_string(),
        }
    }

    #[test]
    fn composes_full_template_with_resolved_images() {
        let set = image_set();
        let draft = compose("겨울 패션 대전", "패션", Some(&set));

        assert_eq!(draft.title, "겨울 패션 대전 - 놓치면 후회할 특가 기회!");
        assert!(draft.content.contains("<h2>겨울 패션 대전 기획전 상세 리뷰</h2>"));
        assert!(draft.content.contains("https://cdn.example.com/life.jpg"));
        assert!(draft.content.contains("https://cdn.example.com/detail.jpg"));
        assert!(draft.content.contains("https://cdn.example.com/promo.jpg"));
        assert_eq!(draft.tags.len(), 5);
        assert_eq!(draft.tags[0], "패션");
    }

    #[test]
    fn degrades_to_timestamped_placeholders_without_images() {
        let draft = compose("주방용품 특가", "홈리빙", None);
        assert!(draft
            .content
            .contains("https://picsum.photos/800/400?random="));
    }

    #[test]
    fn empty_category_tags_default_to_general() {
        let draft = compose("특가", "", None);
        assert_eq!(draft.tags[0], "일반");
    }
}
