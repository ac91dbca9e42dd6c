// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Page capability
//
// The contract page objects and assertions are written against. The
// Playwright-backed implementation lives in `browser`; unit tests use an
// in-memory page. Everything here only describes *what* a page handle can
// do: locating, auto-waiting and retrying stay inside the engine.

use crate::error::Result;
use crate::selector::{Filter, Selector};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Options shared by element actions (click, fill, check, hover).
///
/// See: <https://playwright.dev/docs/api/class-locator#locator-click>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOptions {
    /// Whether to bypass actionability checks (visible, stable, enabled)
    pub force: Option<bool>,
    /// Maximum time to wait for the element to become actionable
    pub timeout: Option<Duration>,
}

impl ActionOptions {
    /// Create a new builder for ActionOptions
    pub fn builder() -> ActionOptionsBuilder {
        ActionOptionsBuilder::default()
    }

    /// Shorthand for `force: true`, used on visually hidden native inputs.
    pub fn forced() -> Self {
        Self::builder().force(true).build()
    }

    /// Timeout in milliseconds, as the protocol expects it
    pub(crate) fn timeout_ms(&self) -> Option<f64> {
        self.timeout.map(|t| t.as_millis() as f64)
    }
}

/// Builder for ActionOptions
#[derive(Debug, Clone, Default)]
pub struct ActionOptionsBuilder {
    force: Option<bool>,
    timeout: Option<Duration>,
}

impl ActionOptionsBuilder {
    /// Bypass actionability checks
    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    /// Override the action timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the ActionOptions
    pub fn build(self) -> ActionOptions {
        ActionOptions {
            force: self.force,
            timeout: self.timeout,
        }
    }
}

/// Document load milestones a page can wait for.
///
/// See: <https://playwright.dev/docs/api/class-page#page-wait-for-load-state>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// `load` event fired
    Load,
    /// `DOMContentLoaded` event fired
    DomContentLoaded,
    /// No new network activity for at least 500 ms
    NetworkIdle,
}

/// Element states a locator can wait for.
///
/// See: <https://playwright.dev/docs/api/class-locator#locator-wait-for>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// At least one match is present in the DOM
    Attached,
    /// No match is present in the DOM
    Detached,
    /// A match is present and visible
    Visible,
    /// No match is visible (absent or hidden)
    Hidden,
}

/// A JavaScript dialog raised by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogEvent {
    /// Dialog type: `alert`, `confirm`, `prompt` or `beforeunload`
    pub kind: String,
    /// Message shown in the dialog
    pub message: String,
    /// Default prompt value (empty for other dialog types)
    pub default_value: String,
}

/// What to do with a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    /// Accept, optionally entering prompt text
    Accept(Option<String>),
    /// Dismiss (cancel)
    Dismiss,
}

/// Synchronous dialog handler. Must be registered before the action that
/// raises the dialog; a dialog without a handler blocks the page.
pub type DialogHandler = Arc<dyn Fn(&DialogEvent) -> DialogAction + Send + Sync>;

/// Records every dialog the page raises and answers each with a fixed action.
#[derive(Clone)]
pub struct DialogRecorder {
    events: Arc<Mutex<Vec<DialogEvent>>>,
    action: DialogAction,
}

impl DialogRecorder {
    /// Recorder that accepts every dialog.
    pub fn accepting() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            action: DialogAction::Accept(None),
        }
    }

    /// Recorder that dismisses every dialog.
    pub fn dismissing() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            action: DialogAction::Dismiss,
        }
    }

    /// The handler to register with [`PageHandle::on_dialog`].
    pub fn handler(&self) -> DialogHandler {
        let events = Arc::clone(&self.events);
        let action = self.action.clone();
        Arc::new(move |event: &DialogEvent| {
            events.lock().push(event.clone());
            action.clone()
        })
    }

    /// Dialogs seen so far, in order.
    pub fn events(&self) -> Vec<DialogEvent> {
        self.events.lock().clone()
    }

    /// Messages of the dialogs seen so far.
    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }
}

/// Handle to one browsing context.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Locator type produced by this page
    type Locator: ElementLocator;

    /// Navigates to `url` and waits for the load event.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current page URL.
    fn url(&self) -> String;

    /// Creates a lazy locator; nothing is resolved until it is used.
    fn locator(&self, selector: Selector) -> Self::Locator;

    /// Registers a dialog handler for the rest of the page's lifetime.
    async fn on_dialog(&self, handler: DialogHandler) -> Result<()>;

    /// Waits until a response for a URL matching the `url_pattern` glob has
    /// been received.
    async fn wait_for_response(&self, url_pattern: &str, timeout: Duration) -> Result<()>;

    /// Waits until the document reaches `state`.
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()>;

    /// Sleeps unconditionally. Prefer a condition-based wait.
    async fn wait_for_timeout(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deferred, re-resolvable reference to zero or more elements.
#[async_trait]
pub trait ElementLocator: Clone + Send + Sync + Sized + 'static {
    /// The selector this locator resolves
    fn selector(&self) -> &Selector;

    /// Same page, different selector
    fn with_selector(&self, selector: Selector) -> Self;

    /// Default timeout for `expect(..)` on this locator, when the page
    /// carries one (from `E2eConfig::assertion_timeout_ms`).
    fn assertion_timeout(&self) -> Option<Duration> {
        None
    }

    /// Sub-locator scoped to this locator's matches.
    fn locator(&self, child: Selector) -> Self {
        self.with_selector(self.selector().clone().then(child))
    }

    /// First match.
    fn first(&self) -> Self {
        self.with_selector(self.selector().clone().first())
    }

    /// Last match.
    fn last(&self) -> Self {
        self.with_selector(self.selector().clone().last())
    }

    /// Match at `index` (0-based).
    fn nth(&self, index: i32) -> Self {
        self.with_selector(self.selector().clone().nth(index))
    }

    /// Narrows the matches.
    fn filter(&self, filter: Filter) -> Self {
        self.with_selector(self.selector().clone().filter(filter))
    }

    /// Number of current matches.
    async fn count(&self) -> Result<usize>;

    /// One locator per current match.
    async fn all(&self) -> Result<Vec<Self>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i as i32)).collect())
    }

    /// Clicks the element.
    async fn click(&self, options: Option<ActionOptions>) -> Result<()>;

    /// Replaces the input value.
    async fn fill(&self, value: &str, options: Option<ActionOptions>) -> Result<()>;

    /// Clears the input value.
    async fn clear(&self, options: Option<ActionOptions>) -> Result<()>;

    /// Focuses the element and types `text` one key at a time, pausing
    /// `delay` between keystrokes.
    async fn press_sequentially(&self, text: &str, delay: Duration) -> Result<()>;

    /// Ensures a checkbox or radio is checked.
    async fn check(&self, options: Option<ActionOptions>) -> Result<()>;

    /// Ensures a checkbox is unchecked.
    async fn uncheck(&self, options: Option<ActionOptions>) -> Result<()>;

    /// Hovers the pointer over the element.
    async fn hover(&self, options: Option<ActionOptions>) -> Result<()>;

    /// Raw `textContent` of the element.
    async fn text_content(&self) -> Result<Option<String>>;

    /// Rendered text of the element.
    async fn inner_text(&self) -> Result<String>;

    /// `textContent` of every match, in document order.
    async fn all_text_contents(&self) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for item in self.all().await? {
            texts.push(item.text_content().await?.unwrap_or_default());
        }
        Ok(texts)
    }

    /// Attribute value, `None` when the attribute is absent.
    async fn get_attribute(&self, name: &str) -> Result<Option<String>>;

    /// Current value of an input, textarea or select.
    async fn input_value(&self) -> Result<String>;

    /// Checked state of a checkbox or radio.
    async fn is_checked(&self) -> Result<bool>;

    /// Whether the element is visible right now (no waiting).
    async fn is_visible(&self) -> Result<bool>;

    /// Computed value of a CSS property, e.g. `background-color`.
    async fn css_value(&self, property: &str) -> Result<String>;

    /// Waits until the locator reaches `state`.
    async fn wait_for(&self, state: ElementState, timeout: Duration) -> Result<()> {
        let selector = self.selector().render();
        let this = self;
        let outcome = crate::wait::poll_until(
            timeout,
            crate::wait::DEFAULT_POLL_INTERVAL,
            move || async move {
                let count = this.count().await?;
                let reached = match state {
                    ElementState::Attached => count > 0,
                    ElementState::Detached => count == 0,
                    ElementState::Visible => count > 0 && this.first().is_visible().await?,
                    ElementState::Hidden => count == 0 || !this.first().is_visible().await?,
                };
                Ok((reached, count))
            },
        )
        .await?;

        if outcome.is_matched() {
            Ok(())
        } else {
            Err(crate::error::Error::Timeout(format!(
                "waiting for '{}' to be {:?} (matched {} element(s)) after {:?}",
                selector,
                state,
                outcome.into_value(),
                timeout
            )))
        }
    }
}
