//! Chromium-backed sessions using chromiumoxide.

use super::{BrowserLauncher, BrowserSession};
use crate::config::{ScoutConfig, ENV_CHROMIUM_PATH};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::debug;

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    // 1. Configured path
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 2. LOGIN_SCOUT_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(ENV_CHROMIUM_PATH) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 3. System PATH
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches one headless Chromium process per session.
pub struct ChromiumLauncher {
    chromium_path: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(config: &ScoutConfig) -> Self {
        Self {
            chromium_path: config.chromium_path.clone(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let chrome_path = find_chromium(self.chromium_path.as_deref()).with_context(|| {
            format!("Chromium not found. Install Chrome or Chromium, or set {ENV_CHROMIUM_PATH}.")
        })?;

        // Fresh profile per session; removed when the session is closed.
        let profile = tempfile::Builder::new()
            .prefix("login-scout-profile-")
            .tempdir()
            .context("failed to create browser profile directory")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile.path())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(&mut browser, handler_task).await;
                return Err(e).context("failed to create new page");
            }
        };

        debug!(profile = %profile.path().display(), "Chromium session started");

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            profile,
        }))
    }
}

/// A launched browser with its single tab.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile: TempDir,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| anyhow!("navigation failed: {e}"))?;
        // Wait for page to be loaded
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn settle(&mut self, budget: Duration) -> Result<()> {
        let result = self
            .page
            .evaluate(settle_script(budget))
            .await
            .context("settle script failed")?;

        let info: serde_json::Value = result
            .into_value()
            .map_err(|e| anyhow!("failed to convert settle result: {e:?}"))?;

        debug!(
            idle = info.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
            ready_state = info.get("readyState").and_then(|v| v.as_str()).unwrap_or("?"),
            waited_ms = info.get("waitedMs").and_then(|v| v.as_u64()).unwrap_or(0),
            "page settle finished"
        );
        Ok(())
    }

    async fn get_html(&mut self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;

        let html: String = result
            .into_value()
            .map_err(|e| anyhow!("failed to convert HTML result: {e:?}"))?;

        Ok(html)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
            profile,
        } = *self;

        let _ = page.close().await;
        let closed = browser.close().await.map(|_| ());
        if closed.is_err() {
            let _ = browser.kill().await;
        }
        let _ = browser.wait().await;
        handler_task.abort();
        drop(profile);

        closed.context("failed to close Chromium")
    }
}

async fn shutdown(browser: &mut Browser, handler_task: JoinHandle<()>) {
    if browser.close().await.is_err() {
        let _ = browser.kill().await;
    }
    let _ = browser.wait().await;
    handler_task.abort();
}

/// Resolves once `document.readyState` is `complete` and no new resource
/// entries appeared for a second, or when `budget` runs out.
fn settle_script(budget: Duration) -> String {
    let budget_ms = budget.as_millis().min(u128::from(u64::MAX)) as u64;
    format!(
        r#"(async () => {{
            const timeoutMs = {budget_ms};
            const idleMs = 1000;
            const interval = 250;
            const count = () => {{
                try {{ return performance.getEntriesByType('resource').length; }} catch (_) {{ return 0; }}
            }};

            const start = Date.now();
            let lastCount = count();
            let stableMs = 0;

            while (Date.now() - start < timeoutMs) {{
                await new Promise(r => setTimeout(r, interval));
                const curCount = count();
                if (document.readyState === 'complete' && curCount === lastCount) {{
                    stableMs += interval;
                    if (stableMs >= idleMs) {{
                        return {{ ok: true, readyState: document.readyState, waitedMs: Date.now() - start }};
                    }}
                }} else {{
                    stableMs = 0;
                }}
                lastCount = curCount;
            }}

            return {{ ok: false, readyState: document.readyState, waitedMs: Date.now() - start }};
        }})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::PageSource;
    use crate::renderer::DynamicFetcher;
    use std::sync::Arc;

    #[test]
    fn test_settle_script_embeds_budget() {
        let script = settle_script(Duration::from_millis(4200));
        assert!(script.contains("const timeoutMs = 4200;"));
    }

    #[test]
    fn test_explicit_missing_path_is_not_used() {
        let missing = Path::new("/definitely/not/a/chrome/binary");
        assert_ne!(find_chromium(Some(missing)).as_deref(), Some(missing));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_renders_script_built_form() {
        let config = ScoutConfig::default();
        let fetcher = DynamicFetcher::new(Arc::new(ChromiumLauncher::new(&config)), &config);
        let url = url::Url::parse(
            "data:text/html,<div id=f></div><script>document.getElementById('f').innerHTML='<input type=password name=pw>'</script>",
        )
        .unwrap();

        let page = fetcher.fetch(&url).await.expect("render failed");
        assert!(page.html.contains(r#"<input type="password" name="pw">"#));
    }
}
