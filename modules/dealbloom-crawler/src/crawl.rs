//! One full crawl-and-publish pass against the partner portal.

use std::fmt;

use browser_session::{BrowserSession, SessionConfig};
use dealbloom_content::{generate_post, generate_slug_now, resolve_images, ContentModel};
use dealbloom_store::{NewCampaign, NewContentPost, Store};
use tracing::{debug, info, warn};

use crate::error::{CrawlError, Result};
use crate::extract::{self, ExtractedCampaign};
use crate::{login, navigate};

/// Counters for one crawl pass. Every extracted item lands in exactly one
/// campaign bucket, and every persisted campaign in one post bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub items_extracted: usize,
    pub campaigns_new: usize,
    pub campaigns_existing: usize,
    pub campaigns_failed: usize,
    pub posts_generated: usize,
    pub posts_fallback: usize,
    pub posts_skipped: usize,
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Crawl Run Complete ===")?;
        writeln!(f, "Items extracted:     {}", self.items_extracted)?;
        writeln!(f, "Campaigns new:       {}", self.campaigns_new)?;
        writeln!(f, "Campaigns existing:  {}", self.campaigns_existing)?;
        writeln!(f, "Campaigns failed:    {}", self.campaigns_failed)?;
        writeln!(f, "Posts generated:     {}", self.posts_generated)?;
        writeln!(f, "Posts fallback:      {}", self.posts_fallback)?;
        writeln!(f, "Posts skipped:       {}", self.posts_skipped)?;
        Ok(())
    }
}

/// Drives a browser session through login, extraction and publication.
pub struct Crawler<M> {
    store: Store,
    model: M,
    email: Option<String>,
    password: Option<String>,
    headless: bool,
}

impl<M: ContentModel> Crawler<M> {
    pub fn new(
        store: Store,
        model: M,
        email: Option<String>,
        password: Option<String>,
        headless: bool,
    ) -> Self {
        Self {
            store,
            model,
            email,
            password,
            headless,
        }
    }

    /// Run one crawl pass. Fails fast on missing credentials, before any
    /// browser is launched; otherwise the session is closed no matter how
    /// the pass went.
    pub async fn run(&self) -> Result<CrawlStats> {
        let (Some(email), Some(password)) = (self.email.as_deref(), self.password.as_deref())
        else {
            return Err(CrawlError::MissingCredentials);
        };

        info!(headless = self.headless, "Starting crawl run");

        let mut session = BrowserSession::launch(SessionConfig {
            headless: self.headless,
            ..SessionConfig::default()
        })
        .await?;

        let result = self.run_inner(&session, email, password).await;

        session.close().await;

        result
    }

    async fn run_inner(
        &self,
        session: &BrowserSession,
        email: &str,
        password: &str,
    ) -> Result<CrawlStats> {
        let mut stats = CrawlStats::default();

        login::login(session, email, password).await?;
        navigate::navigate_to_events(session).await?;

        let page_url = session.current_url().await?;
        let html = session.content().await?;

        let candidates = extract::extract_campaigns(&html, &page_url);
        stats.items_extracted = candidates.len();
        info!(count = stats.items_extracted, "Extracted campaign candidates");

        for candidate in candidates {
            self.process_candidate(candidate, &mut stats).await;
        }

        Ok(stats)
    }

    /// Persist one candidate and, for first-sighted campaigns, generate and
    /// publish its post. Persistence and generation trouble is absorbed into
    /// the stats; only session-level failures abort a run.
    async fn process_candidate(&self, candidate: ExtractedCampaign, stats: &mut CrawlStats) {
        let ExtractedCampaign {
            title,
            image_url,
            partner_link,
            category,
        } = candidate;

        let saved = self
            .store
            .save_campaign(NewCampaign {
                title: title.clone(),
                image_url: image_url.clone(),
                partner_link,
                category: Some(category.clone()),
            })
            .await;

        let Some(saved) = saved else {
            stats.campaigns_failed += 1;
            return;
        };

        if !saved.newly_created {
            debug!(title = %title, "Campaign already known, leaving its content alone");
            stats.campaigns_existing += 1;
            stats.posts_skipped += 1;
            return;
        }
        stats.campaigns_new += 1;

        match self.store.has_post_for_campaign(saved.id).await {
            Ok(false) => {}
            Ok(true) => {
                info!(title = %title, "Campaign already has a post, skipping generation");
                stats.posts_skipped += 1;
                return;
            }
            Err(e) => {
                warn!(title = %title, error = %e, "Post lookup failed, skipping generation");
                stats.posts_skipped += 1;
                return;
            }
        }

        let images = resolve_images(&self.model, &category, Some(&image_url)).await;
        let content = generate_post(&self.model, &title, &category, &images).await;
        let from_fallback = content.is_fallback();
        let draft = content.into_post();

        let post = NewContentPost {
            campaign_id: Some(saved.id),
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

        match self.store.insert_post(post).await {
            Some(post_id) => {
                info!(title = %title, post_id = %post_id, fallback = from_fallback, "Published post");
                if from_fallback {
                    stats.posts_fallback += 1;
                } else {
                    stats.posts_generated += 1;
                }
            }
            None => stats.posts_skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display_lists_every_counter() {
        let stats = CrawlStats {
            items_extracted: 10,
            campaigns_new: 4,
            campaigns_existing: 5,
            campaigns_failed: 1,
            posts_generated: 3,
            posts_fallback: 1,
            posts_skipped: 6,
        };

        let rendered = stats.to_string();

        assert!(rendered.contains("=== Crawl Run Complete ==="));
        assert!(rendered.contains("Items extracted:     10"));
        assert!(rendered.contains("Campaigns existing:  5"));
        assert!(rendered.contains("Posts fallback:      1"));
    }
}
