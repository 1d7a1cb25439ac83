//! Integration tests for Store.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use dealbloom_store::{NewCampaign, NewContentPost, PostPatch, Store};
use sqlx::PgPool;
use uuid::Uuid;

/// Get a migrated test store, or skip if no test DB is available.
async fn test_store() -> Option<Store> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    let store = Store::new(pool);
    store.migrate().await.ok()?;
    Some(store)
}

/// Tests share one database and run in parallel, so every row they create is
/// scoped by a unique suffix instead of truncating between tests.
fn unique(label: &str) -> String {
    format!("{label} {}", Uuid::new_v4())
}

fn campaign(title: &str) -> NewCampaign {
    NewCampaign {
        title: title.to_string(),
        image_url: "https://example.com/banner.jpg".to_string(),
        partner_link: "https://partners.example.com/deal".to_string(),
        category: Some("패션".to_string()),
    }
}

fn post_for(campaign_id: Uuid, slug: &str) -> NewContentPost {
    NewContentPost {
        campaign_id: Some(campaign_id),
        title: "패션 기획전 리뷰".to_string(),
        content: "<h2>기획전 상세 리뷰</h2><p>소개</p>".to_string(),
        excerpt: Some("기획전 소개".to_string()),
        slug: slug.to_string(),
        featured_image_url: None,
        content_image_1_url: None,
        content_image_2_url: None,
        tags: vec!["특가".to_string(), "할인".to_string()],
        meta_description: Some("기획전 메타 설명".to_string()),
    }
}

// =========================================================================
// Campaign dedup
// =========================================================================

#[tokio::test]
async fn save_campaign_dedups_by_exact_title() {
    let Some(store) = test_store().await else {
        return;
    };
    let title = unique("Same Deal");

    let first = store.save_campaign(campaign(&title)).await.unwrap();
    assert!(first.newly_created);

    let second = store.save_campaign(campaign(&title)).await.unwrap();
    assert!(!second.newly_created);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn title_lookup_is_exact_not_normalized() {
    let Some(store) = test_store().await else {
        return;
    };
    let title = unique("Winter Sale");

    store.save_campaign(campaign(&title)).await.unwrap();

    let lowered = title.to_lowercase();
    let found = store.find_campaign_id_by_title(&lowered).await.unwrap();
    assert!(found.is_none());
}

// =========================================================================
// Content posts
// =========================================================================

#[tokio::test]
async fn has_post_gate_flips_after_insert() {
    let Some(store) = test_store().await else {
        return;
    };
    let saved = store
        .save_campaign(campaign(&unique("Spring Looks")))
        .await
        .unwrap();

    assert!(!store.has_post_for_campaign(saved.id).await.unwrap());

    let slug = unique("spring-looks");
    let post_id = store.insert_post(post_for(saved.id, &slug)).await;
    assert!(post_id.is_some());

    assert!(store.has_post_for_campaign(saved.id).await.unwrap());
}

#[tokio::test]
async fn inserted_posts_default_to_published() {
    let Some(store) = test_store().await else {
        return;
    };
    let saved = store
        .save_campaign(campaign(&unique("Beauty Week")))
        .await
        .unwrap();

    let slug = unique("beauty-week");
    store.insert_post(post_for(saved.id, &slug)).await;

    let post = store.get_post_by_slug(&slug).await.unwrap();
    assert!(post.is_some_and(|p| p.is_published));
}

#[tokio::test]
async fn duplicate_slug_insert_returns_none() {
    let Some(store) = test_store().await else {
        return;
    };
    let saved = store
        .save_campaign(campaign(&unique("Tech Deals")))
        .await
        .unwrap();

    let slug = unique("tech-deals");
    assert!(store.insert_post(post_for(saved.id, &slug)).await.is_some());
    assert!(store.insert_post(post_for(saved.id, &slug)).await.is_none());
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let Some(store) = test_store().await else {
        return;
    };
    let saved = store
        .save_campaign(campaign(&unique("Home Living")))
        .await
        .unwrap();

    let slug = unique("home-living");
    let id = store
        .insert_post(post_for(saved.id, &slug))
        .await
        .unwrap();

    let patch = PostPatch {
        is_published: Some(false),
        ..Default::default()
    };
    let updated = store.update_post(id, patch).await.unwrap().unwrap();

    assert!(!updated.is_published);
    assert_eq!(updated.title, "패션 기획전 리뷰");
    assert!(updated.updated_at >= updated.created_at);

    // Unpublished posts disappear from the public slug lookup.
    assert!(store.get_post_by_slug(&slug).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_campaign_detaches_posts() {
    let Some(store) = test_store().await else {
        return;
    };
    let saved = store
        .save_campaign(campaign(&unique("Flash Sale")))
        .await
        .unwrap();

    let slug = unique("flash-sale");
    store.insert_post(post_for(saved.id, &slug)).await;

    let deleted = store.delete_campaign(saved.id).await.unwrap();
    assert!(deleted.is_some());

    let post = store.get_post_by_slug(&slug).await.unwrap().unwrap();
    assert!(post.campaign_id.is_none());
}

#[tokio::test]
async fn update_missing_campaign_returns_none() {
    let Some(store) = test_store().await else {
        return;
    };

    let patch = dealbloom_store::CampaignPatch {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = store.update_campaign(Uuid::new_v4(), patch).await.unwrap();
    assert!(updated.is_none());
}
