//! Coupang Partners sign-in flow.

use std::time::Duration;

use browser_session::BrowserSession;
use tracing::{info, warn};

use crate::error::{CrawlError, Result};

const PARTNERS_HOME: &str = "https://partners.coupang.com/";

const LOGIN_LINK_SELECTORS: &[&str] = &[r#"a[href*="login"]"#, ".login"];
const EMAIL_SELECTORS: &[&str] = &[r#"input[type="email"]"#, r#"input[name="email"]"#];
const PASSWORD_SELECTORS: &[&str] = &[r#"input[type="password"]"#, r#"input[name="password"]"#];
const SUBMIT_SELECTORS: &[&str] = &[r#"button[type="submit"]"#, r#"input[type="submit"]"#];

/// Holds once the SPA has left the login flow for the signed-in portal.
const LOGGED_IN_PREDICATE: &str = r#"window.location.href.includes('partners.coupang.com') && !window.location.href.includes('login')"#;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Sign the session in to the partner portal. One attempt only; a failure
/// captures `login-error.png` next to the process before surfacing.
pub async fn login(session: &BrowserSession, email: &str, password: &str) -> Result<()> {
    info!("Logging in to Coupang Partners");

    if let Err(e) = login_inner(session, email, password).await {
        if let Err(shot) = session.save_screenshot("login-error.png").await {
            warn!(error = %shot, "Could not capture login failure screenshot");
        }
        return Err(CrawlError::LoginFailed(e.to_string()));
    }

    info!("Coupang Partners login complete");
    Ok(())
}

async fn login_inner(session: &BrowserSession, email: &str, password: &str) -> anyhow::Result<()> {
    session.goto(PARTNERS_HOME).await?;
    session.wait_for_navigation().await?;

    // The portal sometimes lands straight on the form; no link is fine.
    match session.click_first(LOGIN_LINK_SELECTORS).await {
        Ok(Some(selector)) => {
            info!(selector = %selector, "Followed login link");
            session.wait_for_navigation().await?;
        }
        Ok(None) => info!("No login link on the landing page, continuing"),
        Err(e) => warn!(error = %e, "Login link lookup failed, continuing"),
    }

    if session.fill_first(EMAIL_SELECTORS, email).await?.is_none() {
        anyhow::bail!("no email input on the login page");
    }
    if session.fill_first(PASSWORD_SELECTORS, password).await?.is_none() {
        anyhow::bail!("no password input on the login page");
    }

    // Small human pause before submitting.
    session.sleep(Duration::from_secs(1)).await;

    if session.click_first(SUBMIT_SELECTORS).await?.is_none() {
        anyhow::bail!("no submit control on the login page");
    }

    session
        .wait_until("signed-in portal URL", LOGGED_IN_PREDICATE, LOGIN_TIMEOUT, POLL_INTERVAL)
        .await?;

    // Let the signed-in shell settle before driving it.
    session.sleep(Duration::from_secs(3)).await;

    Ok(())
}
