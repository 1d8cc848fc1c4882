//! Static tier: a single HTTP GET via reqwest.
//!
//! Not a browser. Scripts are never executed, so pages that build their
//! forms client-side come back without them; that is a successful fetch.

use crate::config::ScoutConfig;
use crate::error::ScoutError;
use crate::types::{FetchMethod, FetchedPage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Something that can turn a URL into HTML.
///
/// Both fetch tiers implement this, which is also the seam tests use to
/// substitute counting fakes.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// The tier this source represents.
    fn method(&self) -> FetchMethod;
    /// Retrieve the page. Failures are already mapped to this tier's code.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScoutError>;
}

/// HTTP client for the static tier.
#[derive(Clone)]
pub struct StaticFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl StaticFetcher {
    /// Build a client sending a desktop-Chrome header set.
    pub fn new(config: &ScoutConfig) -> Result<Self, ScoutError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .timeout(config.static_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| ScoutError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.static_timeout,
        })
    }
}

#[async_trait]
impl PageSource for StaticFetcher {
    fn method(&self) -> FetchMethod {
        FetchMethod::Static
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScoutError> {
        let start = Instant::now();

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScoutError::fetch(url.as_str(), describe(&e, self.timeout)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScoutError::fetch(url.as_str(), format!("HTTP status {status}")));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| ScoutError::fetch(url.as_str(), describe(&e, self.timeout)))?;

        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "static fetch complete"
        );

        Ok(FetchedPage {
            url: url.to_string(),
            html,
            method: FetchMethod::Static,
        })
    }
}

fn describe(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("request timed out after {}ms", timeout.as_millis())
    } else {
        err.to_string()
    }
}
