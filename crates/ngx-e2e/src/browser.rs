// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Playwright-backed page capability
//
// `BrowserSession` owns the Playwright driver and one browser; every call to
// `new_page()` opens a fresh browser context so tests never share cookies,
// storage or navigation state. `BrowserPage` / `BrowserLocator` adapt
// playwright-rs to the `PageHandle` / `ElementLocator` contract.

use crate::config::{BrowserKind, E2eConfig};
use crate::error::{Error, Result};
use crate::page::{
    ActionOptions, DialogAction, DialogEvent, DialogHandler, ElementLocator, LoadState,
    PageHandle,
};
use crate::selector::Selector;
use crate::wait::{DEFAULT_POLL_INTERVAL, poll_until};
use async_trait::async_trait;
use playwright_rs::LaunchOptions;
use playwright_rs::protocol::{
    Browser, BrowserContext, CheckOptions, ClickOptions, FillOptions, HoverOptions,
    KeyboardOptions, Page, Playwright,
};
use std::time::{Duration, Instant};

/// Quiet period after which the network counts as idle
const NETWORK_IDLE_WINDOW: Duration = Duration::from_millis(500);

const RESOURCE_NAMES_JS: &str =
    "() => performance.getEntriesByType('resource').map(entry => entry.name)";

const LOAD_PROGRESS_JS: &str = "() => [document.readyState, \
     performance.getEntriesByType('resource').length, \
     window.__ngxE2eInflight || 0]";

// Resource timing entries only appear once a request finishes, so fetch and
// XHR calls still on the wire are counted here
const INFLIGHT_TRACKER_JS: &str = r#"(() => {
    if (window.__ngxE2eInflight !== undefined) return;
    window.__ngxE2eInflight = 0;
    const start = () => { window.__ngxE2eInflight += 1; };
    const done = () => { window.__ngxE2eInflight = Math.max(0, window.__ngxE2eInflight - 1); };
    if (window.fetch) {
        const fetch = window.fetch;
        window.fetch = function (...args) {
            start();
            return fetch.apply(this, args).finally(done);
        };
    }
    const send = XMLHttpRequest.prototype.send;
    XMLHttpRequest.prototype.send = function (...args) {
        start();
        this.addEventListener('loadend', done, { once: true });
        return send.apply(this, args);
    };
})();"#;

const COMPUTED_STYLE_JS: &str = r#"([selector, index, property]) => {
    const all = document.querySelectorAll(selector);
    const element = all[index < 0 ? all.length + index : index];
    return element ? getComputedStyle(element).getPropertyValue(property) : null;
}"#;

/// Snapshot of page loading, as read by `LOAD_PROGRESS_JS`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadProgress {
    ready_state: String,
    resources: usize,
    inflight: usize,
}

/// Decides when the network has gone quiet.
///
/// Idle means the document is complete, no fetch/XHR is in flight and the
/// resource count has not moved for `NETWORK_IDLE_WINDOW`.
#[derive(Debug, Default)]
struct IdleTracker {
    // (resource count, when the quiet period started)
    quiet_since: Option<(usize, Instant)>,
}

impl IdleTracker {
    fn observe(&mut self, progress: &LoadProgress, now: Instant) -> bool {
        let busy = progress.inflight > 0;
        let since = match self.quiet_since {
            Some((count, since)) if count == progress.resources && !busy => since,
            _ => {
                self.quiet_since = if busy {
                    None
                } else {
                    Some((progress.resources, now))
                };
                now
            }
        };
        !busy
            && progress.ready_state == "complete"
            && now.duration_since(since) >= NETWORK_IDLE_WINDOW
    }
}

/// A running Playwright driver plus one launched browser.
pub struct BrowserSession {
    playwright: Playwright,
    browser: Browser,
    action_timeout: Option<Duration>,
    assertion_timeout: Duration,
}

impl BrowserSession {
    /// Starts Playwright and launches the configured browser.
    pub async fn launch(config: &E2eConfig) -> Result<Self> {
        let playwright = Playwright::launch().await?;

        let mut options = LaunchOptions::new().headless(config.headless);
        if let Some(ms) = config.slow_mo_ms {
            options = options.slow_mo(ms);
        }

        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let browser = browser_type
            .launch_with_options(options)
            .await
            .map_err(|e| Error::from(e).context(format!("launching {}", config.browser.name())))?;

        tracing::info!(
            browser = config.browser.name(),
            version = browser.version(),
            headless = config.headless,
            "Browser launched"
        );

        Ok(Self {
            playwright,
            browser,
            action_timeout: config.action_timeout(),
            assertion_timeout: config.assertion_timeout(),
        })
    }

    /// Opens a page in a new, isolated browser context.
    pub async fn new_page(&self) -> Result<BrowserPage> {
        let context = self.browser.new_context().await?;
        context.add_init_script(INFLIGHT_TRACKER_JS).await?;
        let page = context.new_page().await?;
        tracing::debug!("Opened page in fresh context");
        Ok(BrowserPage {
            page,
            context,
            action_timeout: self.action_timeout,
            assertion_timeout: self.assertion_timeout,
        })
    }

    /// Closes the browser and every context it owns, then stops the driver.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        tracing::info!("Browser closed");
        Ok(())
    }
}

/// One page (tab) inside its own browser context.
#[derive(Clone)]
pub struct BrowserPage {
    page: Page,
    context: BrowserContext,
    action_timeout: Option<Duration>,
    assertion_timeout: Duration,
}

impl BrowserPage {
    /// Closes this page's context. The session stays usable.
    pub async fn close(&self) -> Result<()> {
        self.context.close().await?;
        tracing::debug!("Closed page context");
        Ok(())
    }

    async fn resource_names(&self) -> Result<Vec<String>> {
        Ok(self.page.evaluate::<(), Vec<String>>(RESOURCE_NAMES_JS, None).await?)
    }

    async fn load_progress(&self) -> Result<LoadProgress> {
        let (ready_state, resources, inflight) = self
            .page
            .evaluate::<(), (String, usize, usize)>(LOAD_PROGRESS_JS, None)
            .await?;
        Ok(LoadProgress {
            ready_state,
            resources,
            inflight,
        })
    }
}

#[async_trait]
impl PageHandle for BrowserPage {
    type Locator = BrowserLocator;

    async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "Navigating");
        self.page
            .goto(url, None)
            .await
            .map_err(|e| Error::from(e).context(format!("navigating to {}", url)))?;
        Ok(())
    }

    fn url(&self) -> String {
        self.page.url()
    }

    fn locator(&self, selector: Selector) -> BrowserLocator {
        BrowserLocator {
            page: self.page.clone(),
            selector,
            action_timeout: self.action_timeout,
            assertion_timeout: self.assertion_timeout,
        }
    }

    async fn on_dialog(&self, handler: DialogHandler) -> Result<()> {
        self.page
            .on_dialog(move |dialog| {
                let handler = handler.clone();
                async move {
                    let event = DialogEvent {
                        kind: dialog.type_().to_string(),
                        message: dialog.message().to_string(),
                        default_value: dialog.default_value().to_string(),
                    };
                    let action = handler(&event);
                    tracing::debug!(kind = %event.kind, message = %event.message, ?action, "Dialog");
                    match action {
                        DialogAction::Accept(text) => dialog.accept(text.as_deref()).await,
                        DialogAction::Dismiss => dialog.dismiss().await,
                    }
                }
            })
            .await?;
        Ok(())
    }

    async fn wait_for_response(&self, url_pattern: &str, timeout: Duration) -> Result<()> {
        let pattern = glob::Pattern::new(url_pattern)
            .map_err(|e| Error::InvalidArgument(format!("Invalid URL pattern: {}", e)))?;
        let pattern = &pattern;

        let outcome = poll_until(timeout, DEFAULT_POLL_INTERVAL, move || async move {
            let names = self.resource_names().await?;
            Ok((names.iter().any(|name| pattern.matches(name)), ()))
        })
        .await?;

        if outcome.is_matched() {
            tracing::debug!(url_pattern, "Response received");
            Ok(())
        } else {
            Err(Error::Timeout(format!(
                "waiting for response matching '{}' after {:?}",
                url_pattern, timeout
            )))
        }
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        let mut idle = IdleTracker::default();

        loop {
            let progress = self.load_progress().await?;
            let reached = match state {
                LoadState::DomContentLoaded => progress.ready_state != "loading",
                LoadState::Load => progress.ready_state == "complete",
                LoadState::NetworkIdle => idle.observe(&progress, Instant::now()),
            };

            if reached {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(Error::Timeout(format!(
                    "waiting for load state {:?} (document is '{}', {} requests in flight) after {:?}",
                    state, progress.ready_state, progress.inflight, timeout
                )));
            }
            tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        }
    }
}

/// Lazy locator bound to a page; re-resolved on every operation.
#[derive(Clone)]
pub struct BrowserLocator {
    page: Page,
    selector: Selector,
    action_timeout: Option<Duration>,
    assertion_timeout: Duration,
}

impl BrowserLocator {
    async fn resolve(&self) -> playwright_rs::Locator {
        self.page.locator(&self.selector.render()).await
    }

    /// Caller options, falling back to the session-wide action timeout.
    fn effective(&self, options: Option<ActionOptions>) -> Option<ActionOptions> {
        match (options, self.action_timeout) {
            (Some(mut options), Some(default)) => {
                options.timeout.get_or_insert(default);
                Some(options)
            }
            (Some(options), None) => Some(options),
            (None, Some(default)) => Some(ActionOptions::builder().timeout(default).build()),
            (None, None) => None,
        }
    }

    fn click_options(&self, options: Option<ActionOptions>) -> Option<ClickOptions> {
        let options = self.effective(options)?;
        let mut builder = ClickOptions::builder();
        if let Some(force) = options.force {
            builder = builder.force(force);
        }
        if let Some(ms) = options.timeout_ms() {
            builder = builder.timeout(ms);
        }
        Some(builder.build())
    }

    fn fill_options(&self, options: Option<ActionOptions>) -> Option<FillOptions> {
        let options = self.effective(options)?;
        let mut builder = FillOptions::builder();
        if let Some(force) = options.force {
            builder = builder.force(force);
        }
        if let Some(ms) = options.timeout_ms() {
            builder = builder.timeout(ms);
        }
        Some(builder.build())
    }

    fn check_options(&self, options: Option<ActionOptions>) -> Option<CheckOptions> {
        let options = self.effective(options)?;
        let mut builder = CheckOptions::builder();
        if let Some(force) = options.force {
            builder = builder.force(force);
        }
        if let Some(ms) = options.timeout_ms() {
            builder = builder.timeout(ms);
        }
        Some(builder.build())
    }

    fn hover_options(&self, options: Option<ActionOptions>) -> Option<HoverOptions> {
        let options = self.effective(options)?;
        let mut builder = HoverOptions::builder();
        if let Some(force) = options.force {
            builder = builder.force(force);
        }
        if let Some(ms) = options.timeout_ms() {
            builder = builder.timeout(ms);
        }
        Some(builder.build())
    }
}

#[async_trait]
impl ElementLocator for BrowserLocator {
    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn with_selector(&self, selector: Selector) -> Self {
        Self {
            page: self.page.clone(),
            selector,
            action_timeout: self.action_timeout,
            assertion_timeout: self.assertion_timeout,
        }
    }

    fn assertion_timeout(&self) -> Option<Duration> {
        Some(self.assertion_timeout)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.resolve().await.count().await?)
    }

    async fn click(&self, options: Option<ActionOptions>) -> Result<()> {
        tracing::debug!(selector = %self.selector, "click");
        let options = self.click_options(options);
        Ok(self.resolve().await.click(options).await?)
    }

    async fn fill(&self, value: &str, options: Option<ActionOptions>) -> Result<()> {
        tracing::debug!(selector = %self.selector, value, "fill");
        let options = self.fill_options(options);
        Ok(self.resolve().await.fill(value, options).await?)
    }

    async fn clear(&self, options: Option<ActionOptions>) -> Result<()> {
        let options = self.fill_options(options);
        Ok(self.resolve().await.clear(options).await?)
    }

    async fn press_sequentially(&self, text: &str, delay: Duration) -> Result<()> {
        tracing::debug!(selector = %self.selector, text, ?delay, "press_sequentially");
        let locator = self.resolve().await;
        locator.click(self.click_options(None)).await?;
        let options = KeyboardOptions::builder()
            .delay(delay.as_millis() as f64)
            .build();
        Ok(self.page.keyboard().type_text(text, Some(options)).await?)
    }

    async fn check(&self, options: Option<ActionOptions>) -> Result<()> {
        tracing::debug!(selector = %self.selector, "check");
        let options = self.check_options(options);
        Ok(self.resolve().await.check(options).await?)
    }

    async fn uncheck(&self, options: Option<ActionOptions>) -> Result<()> {
        tracing::debug!(selector = %self.selector, "uncheck");
        let options = self.check_options(options);
        Ok(self.resolve().await.uncheck(options).await?)
    }

    async fn hover(&self, options: Option<ActionOptions>) -> Result<()> {
        tracing::debug!(selector = %self.selector, "hover");
        let options = self.hover_options(options);
        Ok(self.resolve().await.hover(options).await?)
    }

    async fn text_content(&self) -> Result<Option<String>> {
        Ok(self.resolve().await.text_content().await?)
    }

    async fn inner_text(&self) -> Result<String> {
        Ok(self.resolve().await.inner_text().await?)
    }

    async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.resolve().await.get_attribute(name).await?)
    }

    async fn input_value(&self) -> Result<String> {
        Ok(self.resolve().await.input_value(None).await?)
    }

    async fn is_checked(&self) -> Result<bool> {
        Ok(self.resolve().await.is_checked().await?)
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.resolve().await.is_visible().await?)
    }

    async fn css_value(&self, property: &str) -> Result<String> {
        let (css, index) = self
            .selector
            .as_css()
            .ok_or_else(|| Error::UnsupportedSelector {
                operation: "computed style".to_string(),
                selector: self.selector.render(),
            })?;

        let value: Option<String> = self
            .page
            .evaluate(COMPUTED_STYLE_JS, Some(&(css, index, property)))
            .await?;
        value.ok_or_else(|| Error::ElementNotFound(self.selector.render()))
    }
}
