pub mod admin;
pub mod crawl;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use regex::Regex;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::AppState;

/// Blog list responses are fine slightly stale.
const BLOG_CACHE_CONTROL: &str = "public, s-maxage=120, stale-while-revalidate=300";

/// Picsum placeholder `<img>` tags inside a stored post body.
const PICSUM_IMG_TAG: &str = r#"<img[^>]+src="https://picsum\.photos[^"]*"[^>]*>"#;

const SRC_ATTR: &str = r#"src="[^"]*""#;

// --- Query structs ---

#[derive(Deserialize)]
pub struct CampaignsQuery {
    category: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[derive(Deserialize)]
pub struct BlogQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

// --- Helpers ---

pub(crate) fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

pub(crate) fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Swap the first two picsum placeholder images in a post body for the
/// stored content image URLs. Posts written before the image columns were
/// populated keep their placeholders.
fn inline_content_images(content: &str, first: &str, second: &str) -> String {
    let (Ok(img_re), Ok(src_re)) = (Regex::new(PICSUM_IMG_TAG), Regex::new(SRC_ATTR)) else {
        return content.to_string();
    };

    let mut index = 0;
    img_re
        .replace_all(content, |caps: &regex::Captures| {
            index += 1;
            let tag = &caps[0];
            match index {
                1 => src_re
                    .replace(tag, regex::NoExpand(&format!(r#"src="{first}""#)))
                    .into_owned(),
                2 => src_re
                    .replace(tag, regex::NoExpand(&format!(r#"src="{second}""#)))
                    .into_owned(),
                _ => tag.to_string(),
            }
        })
        .into_owned()
}

// --- Handlers ---

pub async fn api_campaigns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CampaignsQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20).min(100) as i64;
    let offset = params.offset.unwrap_or(0) as i64;
    let category = params.category.as_deref().filter(|c| *c != "all");

    match state.store.list_campaigns(category, limit, offset).await {
        Ok(campaigns) => {
            let count = campaigns.len();
            Json(serde_json::json!({
                "success": true,
                "data": campaigns,
                "count": count,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to list campaigns");
            server_error("Failed to fetch campaigns")
        }
    }
}

pub async fn api_campaign_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.store.get_active_campaign(uuid).await {
        Ok(Some(campaign)) => {
            let posts = state
                .store
                .list_posts_for_campaign(uuid)
                .await
                .unwrap_or_default();
            let mut val = serde_json::to_value(&campaign).unwrap_or_default();
            if let Some(obj) = val.as_object_mut() {
                obj.insert("content_posts".to_string(), serde_json::json!(posts));
            }
            Json(serde_json::json!({ "success": true, "data": val })).into_response()
        }
        Ok(None) => not_found("Campaign not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load campaign");
            server_error("Failed to fetch campaign")
        }
    }
}

pub async fn api_blog_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BlogQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(10).min(100) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    match state.store.list_posts(limit, offset).await {
        Ok(posts) => {
            let total = state.store.count_published_posts().await.unwrap_or_default();
            let count = posts.len();
            (
                [(header::CACHE_CONTROL, BLOG_CACHE_CONTROL)],
                Json(serde_json::json!({
                    "success": true,
                    "data": posts,
                    "count": count,
                    "total": total,
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to list blog posts");
            server_error("Failed to fetch blog posts")
        }
    }
}

pub async fn api_blog_post_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.store.get_post_by_slug(&slug).await {
        Ok(Some(post)) => {
            let stored_images = post
                .content_image_1_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .zip(
                    post.content_image_2_url
                        .as_deref()
                        .filter(|url| !url.is_empty()),
                );
            let content = match stored_images {
                Some((first, second)) => inline_content_images(&post.content, first, second),
                None => post.content.clone(),
            };

            let mut val = serde_json::to_value(&post).unwrap_or_default();
            if let Some(obj) = val.as_object_mut() {
                obj.insert("content".to_string(), serde_json::json!(content));
            }
            Json(serde_json::json!({ "success": true, "data": val })).into_response()
        }
        Ok(None) => not_found("Post not found"),
        Err(e) => {
            warn!(error = %e, "Failed to load blog post");
            server_error("Failed to fetch blog post")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inlines_the_first_two_picsum_images() {
        let content = concat!(
            r#"<h2>리뷰</h2>"#,
            r#"<img src="https://picsum.photos/seed/fashion1/800/400" alt="메인" />"#,
            r#"<p>본문</p>"#,
            r#"<img src="https://picsum.photos/seed/fashion2/800/400" alt="상세" />"#,
        );

        let rewritten = inline_content_images(
            content,
            "https://cdn.example.com/a.jpg",
            "https://cdn.example.com/b.jpg",
        );

        assert!(rewritten.contains(r#"src="https://cdn.example.com/a.jpg""#));
        assert!(rewritten.contains(r#"src="https://cdn.example.com/b.jpg""#));
        assert!(!rewritten.contains("picsum.photos"));
    }

    #[test]
    fn leaves_later_picsum_images_and_other_hosts_alone() {
        let content = concat!(
            r#"<img src="https://cdn.example.com/hero.jpg" />"#,
            r#"<img src="https://picsum.photos/seed/home1/800/400" />"#,
            r#"<img src="https://picsum.photos/seed/home2/800/400" />"#,
            r#"<img src="https://picsum.photos/seed/home3/800/400" />"#,
        );

        let rewritten = inline_content_images(
            content,
            "https://cdn.example.com/a.jpg",
            "https://cdn.example.com/b.jpg",
        );

        assert!(rewritten.contains(r#"src="https://cdn.example.com/hero.jpg""#));
        assert!(rewritten.contains(r#"src="https://cdn.example.com/a.jpg""#));
        assert!(rewritten.contains(r#"src="https://cdn.example.com/b.jpg""#));
        assert!(rewritten.contains(r#"src="https://picsum.photos/seed/home3/800/400""#));
    }

    #[test]
    fn content_without_placeholders_is_untouched() {
        let content = r#"<p>이미지 없는 본문</p>"#;
        let rewritten = inline_content_images(content, "https://a", "https://b");
        assert_eq!(rewritten, content);
    }
}
