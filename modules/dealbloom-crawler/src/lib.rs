//! Coupang Partners crawl pipeline.
//!
//! Drives a Chromium session through login and the promotions listing,
//! extracts campaign candidates from the rendered page, persists them and
//! generates a blog post for every campaign seen for the first time.

pub mod crawl;
pub mod error;
pub mod extract;
pub mod login;
pub mod navigate;

pub use crawl::{CrawlStats, Crawler};
pub use error::{CrawlError, Result};
pub use extract::{extract_campaigns, ExtractedCampaign};
