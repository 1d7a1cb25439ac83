pub mod error;

pub use error::{Result, SessionError};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::warn;

const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
];

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en;q=0.8";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            accept: ACCEPT.to_string(),
        }
    }
}

/// A launched Chromium instance with a single working page.
///
/// The CDP event stream is drained by a background task; when that stream
/// ends the session is marked closed. `close()` is safe to call twice.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
    closed: Arc<AtomicBool>,
}

impl BrowserSession {
    pub async fn launch(config: SessionConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .args(CHROME_ARGS.to_vec());
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let closed = Arc::new(AtomicBool::new(false));
        let handler_task = spawn_handler_task(handler, Arc::clone(&closed));

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(config.user_agent.as_str()).await?;

        let headers = Headers::new(serde_json::json!({
            "Accept-Language": config.accept_language,
            "Accept": config.accept,
        }));
        page.execute(SetExtraHttpHeadersParams::new(headers)).await?;

        Ok(Self {
            browser,
            page,
            handler_task,
            closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    pub async fn wait_for_navigation(&self) -> Result<()> {
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Full rendered HTML of the current page.
    pub async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    pub async fn current_url(&self) -> Result<String> {
        self.evaluate("location.href").await
    }

    /// Run a JS expression and deserialize its result.
    pub async fn evaluate<T: DeserializeOwned>(&self, js: &str) -> Result<T> {
        let value = self.page.evaluate(js).await?;
        value
            .into_value::<T>()
            .map_err(|e| SessionError::Evaluate(e.to_string()))
    }

    /// Poll a JS boolean predicate until it holds or the deadline passes.
    pub async fn wait_until(
        &self,
        what: &str,
        js_predicate: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let ready: bool = self.evaluate(js_predicate).await.unwrap_or(false);
            if ready {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::Timeout {
                    what: what.to_string(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Set the value of the first element matching any selector in the chain.
    /// Returns the selector that matched, or `None` when nothing did.
    pub async fn fill_first(&self, selectors: &[&str], value: &str) -> Result<Option<String>> {
        let js = fill_script(selectors, value)?;
        self.evaluate(&js).await
    }

    /// Click the first element matching any selector in the chain.
    /// Returns the selector that matched, or `None` when nothing did.
    pub async fn click_first(&self, selectors: &[&str]) -> Result<Option<String>> {
        let js = click_script(selectors)?;
        self.evaluate(&js).await
    }

    /// Capture a full-page PNG screenshot to the given path.
    pub async fn save_screenshot(&self, path: impl AsRef<Path>) -> Result<()> {
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await?;
        Ok(())
    }

    /// Fixed pacing pause.
    pub async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Shut down the browser process, CDP connection and handler task.
    /// Calling this on an already-closed session is a no-op.
    pub async fn close(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Browser process wait failed");
        }
        self.handler_task.abort();
    }
}

fn spawn_handler_task(
    mut handler: chromiumoxide::Handler,
    closed: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            match event {
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "CDP handler event error");
                }
            }
        }
        closed.store(true, Ordering::SeqCst);
    })
}

fn fill_script(selectors: &[&str], value: &str) -> Result<String> {
    let selectors_json =
        serde_json::to_string(selectors).map_err(|e| SessionError::Evaluate(e.to_string()))?;
    let value_json =
        serde_json::to_string(value).map_err(|e| SessionError::Evaluate(e.to_string()))?;
    Ok(format!(
        r#"(() => {{
            const selectors = {selectors_json};
            const value = {value_json};
            for (const sel of selectors) {{
                const el = document.querySelector(sel);
                if (el) {{
                    el.focus();
                    el.value = value;
                    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return sel;
                }}
            }}
            return null;
        }})()"#
    ))
}

fn click_script(selectors: &[&str]) -> Result<String> {
    let selectors_json =
        serde_json::to_string(selectors).map_err(|e| SessionError::Evaluate(e.to_string()))?;
    Ok(format!(
        r#"(() => {{
            const selectors = {selectors_json};
            for (const sel of selectors) {{
                const el = document.querySelector(sel);
                if (el) {{
                    el.click();
                    return sel;
                }}
            }}
            return null;
        }})()"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_korean_desktop() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert!(config.user_agent.contains("Chrome/120"));
        assert!(config.accept_language.starts_with("ko-KR"));
    }

    #[test]
    fn fill_script_escapes_selector_quotes() {
        let js = fill_script(&[r#"input[name="email"]"#], "user@example.com").unwrap();
        assert!(js.contains(r#"input[name=\"email\"]"#));
        assert!(js.contains("user@example.com"));
    }

    #[test]
    fn click_script_lists_all_selectors() {
        let js = click_script(&["button[type=\"submit\"]", "input[type=\"submit\"]"]).unwrap();
        assert!(js.contains("button[type="));
        assert!(js.contains("input[type="));
        assert!(js.contains("el.click()"));
    }
}
