// Postgres persistence for campaigns and their generated content posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

/// A row from the campaigns table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub partner_link: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A row from the content_posts table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContentPost {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub featured_image_url: Option<String>,
    pub content_image_1_url: Option<String>,
    pub content_image_2_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for inserting a new campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub image_url: String,
    pub partner_link: String,
    pub category: Option<String>,
}

/// Parameters for inserting a new content post.
#[derive(Debug, Clone)]
pub struct NewContentPost {
    pub campaign_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub featured_image_url: Option<String>,
    pub content_image_1_url: Option<String>,
    pub content_image_2_url: Option<String>,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
}

/// Result of a dedup-aware campaign save.
#[derive(Debug, Clone, Copy)]
pub struct SavedCampaign {
    pub id: Uuid,
    pub newly_created: bool,
}

/// Partial update for a campaign. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub partner_link: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl CampaignPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.partner_link.is_none()
            && self.category.is_none()
            && self.is_active.is_none()
    }
}

/// Partial update for a content post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.tags.is_none()
            && self.meta_description.is_none()
            && self.is_published.is_none()
    }
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| crate::error::StoreError::Database(e.into()))?;
        Ok(())
    }

    // =========================================================================
    // Campaigns: ingestion path
    // =========================================================================

    /// Exact-match title lookup. No normalization; the crawler relies on byte
    /// equality to decide whether a campaign was seen before.
    pub async fn find_campaign_id_by_title(&self, title: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM campaigns
            WHERE title = $1
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Insert a campaign. Logs a warning on failure rather than propagating;
    /// one bad row shouldn't abort the batch.
    pub async fn insert_campaign(&self, c: NewCampaign) -> Option<Uuid> {
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO campaigns (title, image_url, partner_link, category, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id
            "#,
        )
        .bind(&c.title)
        .bind(&c.image_url)
        .bind(&c.partner_link)
        .bind(&c.category)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(title = %c.title, error = %e, "Failed to insert campaign");
                None
            }
        }
    }

    /// Dedup-aware save: an existing title returns the existing row's id and
    /// never overwrites it; a new title is inserted.
    pub async fn save_campaign(&self, c: NewCampaign) -> Option<SavedCampaign> {
        match self.find_campaign_id_by_title(&c.title).await {
            Ok(Some(id)) => Some(SavedCampaign {
                id,
                newly_created: false,
            }),
            Ok(None) => self.insert_campaign(c).await.map(|id| SavedCampaign {
                id,
                newly_created: true,
            }),
            Err(e) => {
                warn!(title = %c.title, error = %e, "Campaign dedup lookup failed");
                None
            }
        }
    }

    // =========================================================================
    // Campaigns: read/admin path
    // =========================================================================

    /// Active campaigns, newest first. `category` of None (or "all" upstream)
    /// means unfiltered.
    pub async fn list_campaigns(
        &self,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Campaign>> {
        let rows = match category {
            Some(cat) => {
                sqlx::query_as::<_, Campaign>(
                    r#"
                    SELECT * FROM campaigns
                    WHERE is_active = TRUE AND category = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(cat)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Campaign>(
                    r#"
                    SELECT * FROM campaigns
                    WHERE is_active = TRUE
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// One active campaign by id. Inactive rows are treated as absent.
    pub async fn get_active_campaign(&self, id: Uuid) -> Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Every campaign regardless of active flag, newest first.
    pub async fn list_all_campaigns(&self) -> Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Apply a partial update. Returns the updated row, or None when the
    /// campaign doesn't exist. Absent fields keep their current value.
    pub async fn update_campaign(&self, id: Uuid, p: CampaignPatch) -> Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                title        = COALESCE($2, title),
                image_url    = COALESCE($3, image_url),
                partner_link = COALESCE($4, partner_link),
                category     = COALESCE($5, category),
                is_active    = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.title)
        .bind(&p.image_url)
        .bind(&p.partner_link)
        .bind(&p.category)
        .bind(p.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a campaign, returning the deleted row. Posts referencing it
    /// survive with campaign_id set to NULL.
    pub async fn delete_campaign(&self, id: Uuid) -> Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, Campaign>(
            r#"
            DELETE FROM campaigns
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // =========================================================================
    // Content posts
    // =========================================================================

    /// Whether a campaign already has generated content. Backs the
    /// at-most-one-post rule in the crawler.
    pub async fn has_post_for_campaign(&self, campaign_id: Uuid) -> Result<bool> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM content_posts
            WHERE campaign_id = $1
            LIMIT 1
            "#,
        )
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.is_some())
    }

    /// Insert a content post. Same warn-and-None contract as insert_campaign.
    pub async fn insert_post(&self, p: NewContentPost) -> Option<Uuid> {
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO content_posts
                (campaign_id, title, content, excerpt, slug,
                 featured_image_url, content_image_1_url, content_image_2_url,
                 tags, meta_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(p.campaign_id)
        .bind(&p.title)
        .bind(&p.content)
        .bind(&p.excerpt)
        .bind(&p.slug)
        .bind(&p.featured_image_url)
        .bind(&p.content_image_1_url)
        .bind(&p.content_image_2_url)
        .bind(&p.tags)
        .bind(&p.meta_description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(slug = %p.slug, error = %e, "Failed to insert content post");
                None
            }
        }
    }

    /// Published posts, newest first.
    pub async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<ContentPost>> {
        let rows = sqlx::query_as::<_, ContentPost>(
            r#"
            SELECT * FROM content_posts
            WHERE is_published = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total number of published posts.
    pub async fn count_published_posts(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM content_posts
            WHERE is_published = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// One published post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<ContentPost>> {
        let row = sqlx::query_as::<_, ContentPost>(
            r#"
            SELECT * FROM content_posts
            WHERE slug = $1 AND is_published = TRUE
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Posts belonging to a campaign, newest first.
    pub async fn list_posts_for_campaign(&self, campaign_id: Uuid) -> Result<Vec<ContentPost>> {
        let rows = sqlx::query_as::<_, ContentPost>(
            r#"
            SELECT * FROM content_posts
            WHERE campaign_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Every post regardless of publish state, newest first.
    pub async fn list_all_posts(&self) -> Result<Vec<ContentPost>> {
        let rows = sqlx::query_as::<_, ContentPost>(
            r#"
            SELECT * FROM content_posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Apply a partial update and bump updated_at. Returns the updated row,
    /// or None when the post doesn't exist.
    pub async fn update_post(&self, id: Uuid, p: PostPatch) -> Result<Option<ContentPost>> {
        let row = sqlx::query_as::<_, ContentPost>(
            r#"
            UPDATE content_posts SET
                title            = COALESCE($2, title),
                content          = COALESCE($3, content),
                excerpt          = COALESCE($4, excerpt),
                tags             = COALESCE($5, tags),
                meta_description = COALESCE($6, meta_description),
                is_published     = COALESCE($7, is_published),
                updated_at       = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&p.title)
        .bind(&p.content)
        .bind(&p.excerpt)
        .bind(&p.tags)
        .bind(&p.meta_description)
        .bind(p.is_published)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a post, returning the deleted row.
    pub async fn delete_post(&self, id: Uuid) -> Result<Option<ContentPost>> {
        let row = sqlx::query_as::<_, ContentPost>(
            r#"
            DELETE FROM content_posts
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
