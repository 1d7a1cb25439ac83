//! Pure extraction of campaign candidates from rendered events-page HTML.
//!
//! The partner portal is a React SPA with no stable markup contract, so
//! container selectors are tried from most to least specific and the first
//! one that matches anything wins. Items missing a title, image or link are
//! dropped without failing the batch.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Item-container selectors, most specific first. The first selector that
/// matches at least one element decides the candidate set.
const ITEM_SELECTORS: &[&str] = &[
    r#"[data-testid="event-item"]"#,
    ".event-item",
    ".promotion-item",
    ".campaign-item",
    r#"[class*="event"]"#,
    r#"[class*="promotion"]"#,
    r#"[class*="campaign"]"#,
];

/// Title sources inside an item, in preference order. The first element
/// found ends the search even when it carries no usable text.
const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    ".title",
    r#"[class*="title"]"#,
    "img",
];

/// Most candidates a single page contributes to one run.
const MAX_ITEMS: usize = 10;

const MAX_TITLE_CHARS: usize = 100;

const DEFAULT_CATEGORY: &str = "일반";

/// A campaign candidate lifted off the events page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCampaign {
    pub title: String,
    pub image_url: String,
    pub partner_link: String,
    pub category: String,
}

/// Extract up to [`MAX_ITEMS`] campaign candidates from a rendered page.
/// Relative links and image paths resolve against `page_url`. Never fails:
/// an unrecognizable page simply yields an empty batch.
pub fn extract_campaigns(html: &str, page_url: &str) -> Vec<ExtractedCampaign> {
    let Ok(base) = Url::parse(page_url) else {
        debug!(page_url, "Unparseable page URL, skipping extraction");
        return Vec::new();
    };

    let document = Html::parse_document(html);
    find_candidates(&document)
        .into_iter()
        .take(MAX_ITEMS)
        .filter_map(|el| extract_item(el, &base))
        .collect()
}

/// Container elements for the first strategy that matches, or every anchor
/// wrapping an image when no container selector hits.
fn find_candidates(document: &Html) -> Vec<ElementRef<'_>> {
    for item_selector in ITEM_SELECTORS {
        if let Ok(selector) = Selector::parse(item_selector) {
            let found: Vec<_> = document.select(&selector).collect();
            if !found.is_empty() {
                debug!(selector = item_selector, count = found.len(), "Campaign containers matched");
                return found;
            }
        }
    }

    let Ok(anchors) = Selector::parse("a") else {
        return Vec::new();
    };
    let Ok(images) = Selector::parse("img") else {
        return Vec::new();
    };
    document
        .select(&anchors)
        .filter(|a| a.select(&images).next().is_some())
        .collect()
}

fn extract_item(el: ElementRef<'_>, base: &Url) -> Option<ExtractedCampaign> {
    let title = extract_title(el)?;
    let image_url = extract_image(el, base)?;
    let partner_link = extract_link(el, base)?;

    Some(ExtractedCampaign {
        title: clamp_title(&title),
        image_url,
        partner_link,
        category: DEFAULT_CATEGORY.to_string(),
    })
}

/// Title from the first matching element in [`TITLE_SELECTORS`], preferring
/// a non-empty alt attribute over inner text.
fn extract_title(el: ElementRef<'_>) -> Option<String> {
    for title_selector in TITLE_SELECTORS {
        let Ok(selector) = Selector::parse(title_selector) else {
            continue;
        };
        if let Some(found) = el.select(&selector).next() {
            let title = match found.value().attr("alt").filter(|alt| !alt.is_empty()) {
                Some(alt) => alt.to_string(),
                None => found.text().collect::<String>().trim().to_string(),
            };
            return (!title.is_empty()).then_some(title);
        }
    }
    None
}

/// First image inside the item: `src` resolved against the page, with a raw
/// `data-src` backstop for lazy-loaded markup.
fn extract_image(el: ElementRef<'_>, base: &Url) -> Option<String> {
    let Ok(selector) = Selector::parse("img") else {
        return None;
    };
    let img = el.select(&selector).next()?;

    if let Some(src) = img.value().attr("src").filter(|src| !src.is_empty()) {
        if let Ok(resolved) = base.join(src) {
            return Some(resolved.to_string());
        }
    }
    img.value()
        .attr("data-src")
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

/// The item's own href when it is an anchor, else the first nested anchor.
fn extract_link(el: ElementRef<'_>, base: &Url) -> Option<String> {
    let href = if el.value().name() == "a" {
        el.value().attr("href")
    } else {
        let Ok(selector) = Selector::parse("a") else {
            return None;
        };
        el.select(&selector)
            .next()
            .and_then(|a| a.value().attr("href"))
    }?;

    base.join(href).ok().map(|url| url.to_string())
}

fn clamp_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let clamped: String = title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{clamped}...")
    } else {
        title.to_string()
    }
}
