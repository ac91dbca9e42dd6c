// Suite configuration
//
// Where the application under test lives, which browser to drive, and the
// default time budgets. Loaded from a JSON file and/or `E2E_*` environment
// variables; every field has a default so an empty source is valid.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default ngx-admin dev server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/";

/// Default UI Testing Playground address
pub const DEFAULT_PLAYGROUND_URL: &str = "http://uitestingplayground.com/";

/// Default timeout for auto-retrying assertions (5 seconds, matching Playwright)
pub const DEFAULT_ASSERTION_TIMEOUT_MS: u64 = 5_000;

/// Default timeout for a whole test (30 seconds, matching Playwright Test)
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 30_000;

/// Browser engine to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    /// Parses a browser name (case-insensitive).
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(Error::Config(format!(
                "unknown browser '{}', expected chromium, firefox or webkit",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

/// Suite configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Root of the ngx-admin application
    pub base_url: String,
    /// Root of the UI Testing Playground
    pub playground_url: String,
    /// Browser engine
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Slow every engine operation down by this many milliseconds
    pub slow_mo_ms: Option<f64>,
    /// Default action timeout; `None` keeps the engine default
    pub action_timeout_ms: Option<u64>,
    /// Timeout for auto-retrying assertions
    pub assertion_timeout_ms: u64,
    /// Budget for a whole test
    pub test_timeout_ms: u64,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            playground_url: DEFAULT_PLAYGROUND_URL.to_string(),
            browser: BrowserKind::default(),
            headless: true,
            slow_mo_ms: None,
            action_timeout_ms: None,
            assertion_timeout_ms: DEFAULT_ASSERTION_TIMEOUT_MS,
            test_timeout_ms: DEFAULT_TEST_TIMEOUT_MS,
        }
    }
}

impl E2eConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `E2E_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by `E2E_*` variable names.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("E2E_BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = lookup("E2E_PLAYGROUND_URL") {
            self.playground_url = url;
        }
        if let Some(browser) = lookup("E2E_BROWSER") {
            self.browser = BrowserKind::parse(&browser)?;
        }
        if let Some(headless) = lookup("E2E_HEADLESS") {
            self.headless = parse_bool("E2E_HEADLESS", &headless)?;
        }
        if let Some(ms) = lookup("E2E_SLOW_MO_MS") {
            self.slow_mo_ms = Some(parse_number::<f64>("E2E_SLOW_MO_MS", &ms)?);
        }
        if let Some(ms) = lookup("E2E_ACTION_TIMEOUT_MS") {
            self.action_timeout_ms = Some(parse_number("E2E_ACTION_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = lookup("E2E_ASSERTION_TIMEOUT_MS") {
            self.assertion_timeout_ms = parse_number("E2E_ASSERTION_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("E2E_TEST_TIMEOUT_MS") {
            self.test_timeout_ms = parse_number("E2E_TEST_TIMEOUT_MS", &ms)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Points both applications at the same host (used with the fixture server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.playground_url = url.clone();
        self.base_url = url;
        self
    }

    /// Checks that both URLs parse.
    pub fn validate(&self) -> Result<()> {
        parse_url("base_url", &self.base_url)?;
        parse_url("playground_url", &self.playground_url)?;
        Ok(())
    }

    /// Resolves `path` against the application root.
    pub fn app_url(&self, path: &str) -> Result<String> {
        join(&self.base_url, "base_url", path)
    }

    /// Resolves `path` against the playground root.
    pub fn playground(&self, path: &str) -> Result<String> {
        join(&self.playground_url, "playground_url", path)
    }

    pub fn assertion_timeout(&self) -> Duration {
        Duration::from_millis(self.assertion_timeout_ms)
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::Config(format!("{} '{}' is not a valid URL: {}", field, raw, e)))
}

fn join(root: &str, field: &str, path: &str) -> Result<String> {
    let mut base = parse_url(field, root)?;
    // Treat the root as a directory so relative paths append instead of replace
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(path.trim_start_matches('/'))
        .map(String::from)
        .map_err(|e| Error::Config(format!("cannot join '{}' onto {}: {}", path, root, e)))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{} must be a boolean, got '{}'", key, other))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, raw)))
}
