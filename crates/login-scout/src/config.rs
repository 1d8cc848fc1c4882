//! Runtime configuration: timeouts, browser location, output file.
//!
//! Values resolve as explicit setting, then environment, then default.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Chrome desktop user agent sent by the static fetcher.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36";

/// Output file used by the CLI when nothing else is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "login_elements.json";

const ENV_STATIC_TIMEOUT_MS: &str = "LOGIN_SCOUT_STATIC_TIMEOUT_MS";
const ENV_RENDER_TIMEOUT_MS: &str = "LOGIN_SCOUT_RENDER_TIMEOUT_MS";
const ENV_SETTLE_MS: &str = "LOGIN_SCOUT_SETTLE_MS";
/// Explicit Chromium binary, checked before `PATH`.
pub const ENV_CHROMIUM_PATH: &str = "LOGIN_SCOUT_CHROMIUM_PATH";
const ENV_OUTPUT: &str = "LOGIN_SCOUT_OUTPUT";

/// Settings shared by both fetch tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutConfig {
    /// Bound on the whole static GET, including the body read.
    pub static_timeout: Duration,
    /// Bound on browser launch, and separately on navigate + settle + capture.
    pub render_timeout: Duration,
    /// Longest the renderer waits for the DOM to go quiet after load.
    pub settle_timeout: Duration,
    pub user_agent: String,
    /// Chromium binary; discovered on `PATH` when unset.
    pub chromium_path: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            static_timeout: Duration::from_secs(10),
            render_timeout: Duration::from_secs(30),
            settle_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chromium_path: None,
        }
    }
}

impl ScoutConfig {
    /// Defaults overlaid with `LOGIN_SCOUT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(d) = millis(&lookup, ENV_STATIC_TIMEOUT_MS) {
            config.static_timeout = d;
        }
        if let Some(d) = millis(&lookup, ENV_RENDER_TIMEOUT_MS) {
            config.render_timeout = d;
        }
        if let Some(d) = millis(&lookup, ENV_SETTLE_MS) {
            config.settle_timeout = d;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|p| !p.trim().is_empty()) {
            config.chromium_path = Some(PathBuf::from(path));
        }

        config
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!("ignoring {key}={raw:?}: expected a positive number of milliseconds");
            None
        }
    }
}

/// Resolve the CLI output file.
pub fn resolve_output_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(ENV_OUTPUT) {
        if !env_path.trim().is_empty() {
            return PathBuf::from(env_path);
        }
    }

    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::from_lookup(|_| None);
        assert_eq!(config, ScoutConfig::default());
        assert_eq!(config.static_timeout, Duration::from_secs(10));
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ScoutConfig::from_lookup(lookup_from(&[
            (ENV_STATIC_TIMEOUT_MS, "2500"),
            (ENV_RENDER_TIMEOUT_MS, " 60000 "),
            (ENV_SETTLE_MS, "750"),
            (ENV_CHROMIUM_PATH, "/opt/chrome/chrome"),
        ]));
        assert_eq!(config.static_timeout, Duration::from_millis(2500));
        assert_eq!(config.render_timeout, Duration::from_secs(60));
        assert_eq!(config.settle_timeout, Duration::from_millis(750));
        assert_eq!(config.chromium_path, Some(PathBuf::from("/opt/chrome/chrome")));
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let config = ScoutConfig::from_lookup(lookup_from(&[
            (ENV_STATIC_TIMEOUT_MS, "soon"),
            (ENV_RENDER_TIMEOUT_MS, "0"),
            (ENV_CHROMIUM_PATH, "   "),
        ]));
        assert_eq!(config, ScoutConfig::default());
    }

    #[test]
    fn test_explicit_output_wins() {
        assert_eq!(
            resolve_output_path(Some("/tmp/out.json")),
            PathBuf::from("/tmp/out.json")
        );
    }
}
