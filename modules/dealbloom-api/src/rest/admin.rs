use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use dealbloom_content::{generate_post, generate_slug_now, resolve_images};
use dealbloom_store::{CampaignPatch, NewCampaign, NewContentPost, PostPatch};

use super::{not_found, server_error};
use crate::auth::AdminAuth;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateCampaignBody {
    title: Option<String>,
    image_url: Option<String>,
    partner_link: Option<String>,
    category: Option<String>,
}

// --- Campaigns ---

pub async fn api_admin_campaigns(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.store.list_all_campaigns().await {
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
            warn!(error = %e, "Failed to list campaigns for admin");
            server_error("Failed to fetch campaigns")
        }
    }
}

pub async fn api_admin_create_campaign(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCampaignBody>,
) -> impl IntoResponse {
    let (Some(title), Some(image_url), Some(partner_link)) = (
        body.title.filter(|s| !s.is_empty()),
        body.image_url.filter(|s| !s.is_empty()),
        body.partner_link.filter(|s| !s.is_empty()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "title, image_url and partner_link are required",
            })),
        )
            .into_response();
    };

    match state.store.find_campaign_id_by_title(&title).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "success": false,
                    "error": "A campaign with this title already exists",
                })),
            )
                .into_response();
        }
        Err(e) => {
            warn!(error = %e, "Campaign dedup lookup failed");
            return server_error("Failed to create campaign");
        }
    }

    let Some(id) = state
        .store
        .insert_campaign(NewCampaign {
            title: title.clone(),
            image_url: image_url.clone(),
            partner_link,
            category: body.category.clone(),
        })
        .await
    else {
        return server_error("Failed to create campaign");
    };

    // Content generation is best-effort; the campaign row is already in.
    publish_post_for(&state, id, &title, &image_url, body.category.as_deref()).await;

    let campaign = match state.store.get_active_campaign(id).await {
        Ok(campaign) => campaign,
        Err(e) => {
            warn!(error = %e, "Could not reload created campaign");
            None
        }
    };

    Json(serde_json::json!({
        "success": true,
        "message": "Campaign created and blog post generated",
        "data": campaign,
    }))
    .into_response()
}

pub async fn api_admin_update_campaign(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<CampaignPatch>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    if patch.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "No updatable fields in request",
            })),
        )
            .into_response();
    }

    match state.store.update_campaign(uuid, patch).await {
        Ok(Some(campaign)) => {
            Json(serde_json::json!({ "success": true, "data": campaign })).into_response()
        }
        Ok(None) => not_found("Campaign not found"),
        Err(e) => {
            warn!(error = %e, "Failed to update campaign");
            server_error("Failed to update campaign")
        }
    }
}

pub async fn api_admin_delete_campaign(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.store.delete_campaign(uuid).await {
        Ok(Some(campaign)) => {
            Json(serde_json::json!({ "success": true, "data": campaign })).into_response()
        }
        Ok(None) => not_found("Campaign not found"),
        Err(e) => {
            warn!(error = %e, "Failed to delete campaign");
            server_error("Failed to delete campaign")
        }
    }
}

// --- Content posts ---

pub async fn api_admin_posts(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.store.list_all_posts().await {
        Ok(posts) => {
            let count = posts.len();
            Json(serde_json::json!({
                "success": true,
                "data": posts,
                "count": count,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to list posts for admin");
            server_error("Failed to fetch blog posts")
        }
    }
}

pub async fn api_admin_update_post(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PostPatch>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    if patch.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "No updatable fields in request",
            })),
        )
            .into_response();
    }

    match state.store.update_post(uuid, patch).await {
        Ok(Some(post)) => {
            Json(serde_json::json!({ "success": true, "data": post })).into_response()
        }
        Ok(None) => not_found("Post not found"),
        Err(e) => {
            warn!(error = %e, "Failed to update post");
            server_error("Failed to update blog post")
        }
    }
}

pub async fn api_admin_delete_post(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.store.delete_post(uuid).await {
        Ok(Some(post)) => {
            Json(serde_json::json!({ "success": true, "data": post })).into_response()
        }
        Ok(None) => not_found("Post not found"),
        Err(e) => {
            warn!(error = %e, "Failed to delete post");
            server_error("Failed to delete blog post")
        }
    }
}

/// Generate and store the post for a freshly created campaign. Failure is
/// logged and absorbed; the campaign itself is already in.
async fn publish_post_for(
    state: &AppState,
    campaign_id: Uuid,
    title: &str,
    image_url: &str,
    category: Option<&str>,
) {
    let category = category.unwrap_or("일반");

    let images = resolve_images(&state.model, category, Some(image_url)).await;
    let content = generate_post(&state.model, title, category, &images).await;
    let from_fallback = content.is_fallback();
    let draft = content.into_post();

    let post = NewContentPost {
        campaign_id: Some(campaign_id),
        slug: generate_slug_now(&draft.title),
        title: draft.title,
        content: draft.content,
        excerpt: Some(draft.excerpt),
        featured_image_url: Some(images.primary),
        content_image_1_url: Some(images.lifestyle),
        content_image_2_url: Some(images.detail),
        tags: draft.tags,
        meta_description: draft.meta_description,
    };

    match state.store.insert_post(post).await {
        Some(post_id) => {
            info!(post_id = %post_id, fallback = from_fallback, "Generated post for new campaign");
        }
        None => {
            warn!(campaign_id = %campaign_id, "Campaign created but its post insert failed");
        }
    }
}
