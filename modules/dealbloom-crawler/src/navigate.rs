//! Navigation to the promotions listing inside the signed-in portal.

use std::time::Duration;

use browser_session::BrowserSession;
use tracing::{info, warn};

use crate::error::{CrawlError, Result};

pub const EVENTS_URL: &str = "https://partners.coupang.com/#affiliate/ws/events";

/// Holds once the event list, or at least one item, is in the DOM.
const EVENTS_READY_PREDICATE: &str = r#"document.querySelector('[data-testid="event-list"], .event-list, .promotion-list') !== null || document.querySelectorAll('.event-item, .promotion-item').length > 0"#;

/// Hash routing means the document is "loaded" well before the app is.
const SPA_SETTLE: Duration = Duration::from_secs(5);

const EVENTS_TIMEOUT: Duration = Duration::from_secs(20);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

const SNIPPET_CHARS: usize = 1000;

/// Drive the session to the events page and wait for the SPA to render the
/// list. A failure captures `events-page-error.png` and logs the URL plus a
/// markup snippet before surfacing.
pub async fn navigate_to_events(session: &BrowserSession) -> Result<()> {
    info!(url = EVENTS_URL, "Opening events page");

    if let Err(e) = navigate_inner(session).await {
        if let Err(shot) = session.save_screenshot("events-page-error.png").await {
            warn!(error = %shot, "Could not capture events page screenshot");
        }
        log_page_state(session).await;
        return Err(CrawlError::NavigationFailed(e.to_string()));
    }

    info!("Events page ready");
    Ok(())
}

async fn navigate_inner(session: &BrowserSession) -> anyhow::Result<()> {
    session.goto(EVENTS_URL).await?;
    session.wait_for_navigation().await?;

    session.sleep(SPA_SETTLE).await;

    session
        .wait_until("event list markup", EVENTS_READY_PREDICATE, EVENTS_TIMEOUT, POLL_INTERVAL)
        .await?;

    Ok(())
}

/// Best-effort diagnostics for a page that never produced the event list.
async fn log_page_state(session: &BrowserSession) {
    match session.current_url().await {
        Ok(url) => warn!(url = %url, "Events page URL at failure"),
        Err(e) => warn!(error = %e, "Could not read events page URL"),
    }
    match session.content().await {
        Ok(html) => {
            let snippet: String = html.chars().take(SNIPPET_CHARS).collect();
            warn!(snippet = %snippet, "Events page markup at failure");
        }
        Err(e) => warn!(error = %e, "Could not read events page markup"),
    }
}
