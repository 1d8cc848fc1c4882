//! Dynamic tier: render the page in a headless browser.
//!
//! Defines the `BrowserLauncher` and `BrowserSession` traits that abstract
//! over the browser engine (Chromium via chromiumoxide in production, fakes
//! in tests). Every [`DynamicFetcher::fetch`] call launches its own session
//! and closes it exactly once before returning, whatever happened in between.

pub mod chromium;

use crate::config::ScoutConfig;
use crate::error::ScoutError;
use crate::fetcher::PageSource;
use crate::types::{FetchMethod, FetchedPage};
use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Starts isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a fresh browser with nothing shared with earlier sessions.
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// One live browser, owned by a single render.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to a URL and wait for the load event.
    async fn navigate(&mut self, url: &str) -> Result<()>;
    /// Wait for script-driven DOM work to quiet down, for at most `budget`.
    async fn settle(&mut self, budget: Duration) -> Result<()>;
    /// Get the full rendered page HTML.
    async fn get_html(&mut self) -> Result<String>;
    /// Tear the browser down.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// The dynamic tier as a [`PageSource`].
#[derive(Clone)]
pub struct DynamicFetcher {
    launcher: Arc<dyn BrowserLauncher>,
    render_timeout: Duration,
    settle_timeout: Duration,
}

impl DynamicFetcher {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: &ScoutConfig) -> Self {
        Self {
            launcher,
            render_timeout: config.render_timeout,
            settle_timeout: config.settle_timeout,
        }
    }

    /// Build a fetcher backed by a real headless Chromium.
    pub fn chromium(config: &ScoutConfig) -> Self {
        Self::new(Arc::new(chromium::ChromiumLauncher::new(config)), config)
    }
}

#[async_trait]
impl PageSource for DynamicFetcher {
    fn method(&self) -> FetchMethod {
        FetchMethod::Dynamic
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScoutError> {
        let start = Instant::now();
        let limit_ms = self.render_timeout.as_millis();

        let mut session = match tokio::time::timeout(self.render_timeout, self.launcher.launch()).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => return Err(ScoutError::dynamic(url.as_str(), format!("{e:#}"))),
            Err(_) => {
                return Err(ScoutError::dynamic(
                    url.as_str(),
                    format!("browser launch timed out after {limit_ms}ms"),
                ))
            }
        };

        let outcome = AssertUnwindSafe(tokio::time::timeout(
            self.render_timeout,
            render(session.as_mut(), url.as_str(), self.settle_timeout),
        ))
        .catch_unwind()
        .await;

        if let Err(e) = session.close().await {
            warn!(url = %url, "failed to close browser session: {e:#}");
        }

        let html = match outcome {
            Ok(Ok(Ok(html))) => html,
            Ok(Ok(Err(e))) => return Err(ScoutError::dynamic(url.as_str(), format!("{e:#}"))),
            Ok(Err(_)) => {
                return Err(ScoutError::dynamic(
                    url.as_str(),
                    format!("render timed out after {limit_ms}ms"),
                ))
            }
            Err(panic) => {
                return Err(ScoutError::dynamic(
                    url.as_str(),
                    format!("browser session crashed: {}", panic_message(panic.as_ref())),
                ))
            }
        };

        debug!(
            url = %url,
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dynamic render complete"
        );

        Ok(FetchedPage {
            url: url.to_string(),
            html,
            method: FetchMethod::Dynamic,
        })
    }
}

async fn render(session: &mut dyn BrowserSession, url: &str, settle: Duration) -> Result<String> {
    session.navigate(url).await?;
    // A page that never goes idle is still worth reading.
    if let Err(e) = session.settle(settle).await {
        debug!(url, "settle heuristic failed: {e:#}");
    }
    session.get_html().await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
