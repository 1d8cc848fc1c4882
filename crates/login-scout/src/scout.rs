//! Fetch orchestration: cheap static tier first, browser fallback second.
//!
//! ```text
//! validate ─▶ static fetch ─▶ extract ─▶ found? ──yes──▶ result
//!                 │ error          │ none
//!                 └───────┬────────┘
//!                         ▼
//!               dynamic render ─▶ extract ─▶ found? ──yes──▶ result
//!                         │ error                 │ none
//!                         ▼                       ▼
//!                DYNAMIC_FETCH_ERROR      NO_LOGIN_ELEMENTS
//! ```

use crate::config::ScoutConfig;
use crate::error::ScoutError;
use crate::extractor::extract_login_elements;
use crate::fetcher::{PageSource, StaticFetcher};
use crate::renderer::DynamicFetcher;
use crate::types::ExtractionResult;
use crate::validate::validate_url;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the static tier contributed before the fallback ran.
enum StaticOutcome {
    Skipped,
    Failed(ScoutError),
    Empty,
}

/// The scrape entry point. Cheap to clone; clones share the tiers.
#[derive(Clone)]
pub struct Scout {
    static_source: Arc<dyn PageSource>,
    dynamic_source: Arc<dyn PageSource>,
}

impl Scout {
    pub fn new(static_source: Arc<dyn PageSource>, dynamic_source: Arc<dyn PageSource>) -> Self {
        Self {
            static_source,
            dynamic_source,
        }
    }

    /// reqwest for the static tier, headless Chromium for the fallback.
    pub fn from_config(config: &ScoutConfig) -> Result<Self, ScoutError> {
        Ok(Self::new(
            Arc::new(StaticFetcher::new(config)?),
            Arc::new(DynamicFetcher::chromium(config)),
        ))
    }

    /// Find login inputs on `url`.
    ///
    /// With `force_dynamic` the static tier is skipped entirely. Otherwise the
    /// browser is only started when the static fetch failed or found nothing.
    pub async fn scrape(&self, url: &str, force_dynamic: bool) -> Result<ExtractionResult, ScoutError> {
        let url = validate_url(url)?;

        let static_outcome = if force_dynamic {
            debug!(url = %url, "static tier skipped on request");
            StaticOutcome::Skipped
        } else {
            match self.static_source.fetch(&url).await {
                Ok(page) => {
                    let result = extract_login_elements(url.as_str(), &page.html);
                    if !result.is_empty() {
                        info!(url = %url, count = result.count(), method = %page.method, "login elements found");
                        return Ok(result);
                    }
                    debug!(url = %url, "static page has no login elements, falling back to browser");
                    StaticOutcome::Empty
                }
                Err(e) => {
                    warn!(url = %url, tier = %self.static_source.method(), "fetch failed, falling back to browser: {e}");
                    StaticOutcome::Failed(e)
                }
            }
        };

        let page = match self.dynamic_source.fetch(&url).await {
            Ok(page) => page,
            Err(e) => return Err(combine(e, &static_outcome)),
        };

        let result = extract_login_elements(url.as_str(), &page.html);
        if result.is_empty() {
            info!(url = %url, "no login elements after browser render");
            return Err(ScoutError::NoLoginElements(url.to_string()));
        }

        info!(url = %url, count = result.count(), method = %page.method, "login elements found");
        Ok(result)
    }
}

/// Fold the static outcome into the dynamic failure so one error tells the
/// whole story.
fn combine(dynamic: ScoutError, static_outcome: &StaticOutcome) -> ScoutError {
    let ScoutError::DynamicFetch { url, reason } = dynamic else {
        return dynamic;
    };
    let reason = match static_outcome {
        StaticOutcome::Skipped => reason,
        StaticOutcome::Failed(e) => format!("{reason} (static fetch failed: {})", static_reason(e)),
        StaticOutcome::Empty => format!("{reason} (static fetch found no login elements)"),
    };
    ScoutError::DynamicFetch { url, reason }
}

fn static_reason(err: &ScoutError) -> String {
    match err {
        ScoutError::Fetch { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
