//! Deterministic Korean brief for the blog-post chat completion.

pub const SYSTEM_PROMPT: &str = "블로그 작가로서 매력적인 기획전 포스트를 JSON으로 작성하세요.";

/// Build the user prompt for a campaign. The response shape is pinned to
/// strict JSON so the parser can reject anything else.
pub fn build_content_brief(title: &str, category: &str, embed_image: Option<&str>) -> String {
    let image_line = match embed_image {
        Some(url) => format!("이미지 포함: <img src=\"{url}\" alt=\"관련 이미지\" />\n\n"),
        None => String::new(),
    };

    format!(
        r#"기획전: {title} ({category})

블로그 포스트 작성 요청:
- 제목: 50자 이내 SEO 최적화
- 본문: 600자 HTML (h2, p, ul 태그 사용)
- 발췌문: 100자 이내
- 태그: 3개
- 메타설명: 80자 이내

{image_line}JSON 응답:
{{
  "title": "제목",
  "content": "HTML 본문",
  "excerpt": "발췌문",
  "tags": ["태그1", "태그2", "태그3"],
  "metaDescription": "메타설명"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_names_campaign_and_category() {
        let brief = build_content_brief("겨울 패션 특가", "패션", None);
        assert!(brief.contains("기획전: 겨울 패션 특가 (패션)"));
        assert!(brief.contains("\"metaDescription\""));
        assert!(!brief.contains("이미지 포함"));
    }

    #[test]
    fn brief_embeds_supplied_image() {
        let brief = build_content_brief("특가", "일반", Some("https://cdn.example.com/a.jpg"));
        assert!(brief.contains(r#"<img src="https://cdn.example.com/a.jpg" alt="관련 이미지" />"#));
    }
}
