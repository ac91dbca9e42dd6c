// In-memory page for unit tests
//
// Elements are keyed by their rendered selector string, so a test seeds
// exactly the selectors the code under test will ask for. Actions are
// logged in order and may trigger hooks that mutate other elements,
// which is enough to model menus that expand or tables that lose a row.

use crate::error::{Error, Result};
use crate::page::{
    ActionOptions, DialogAction, DialogEvent, DialogHandler, ElementLocator, LoadState,
    PageHandle,
};
use crate::selector::Selector;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub text: String,
    pub value: String,
    pub checked: bool,
    pub visible: bool,
    pub count: usize,
    pub attributes: HashMap<String, String>,
    pub css: HashMap<String, String>,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            value: String::new(),
            checked: false,
            visible: true,
            count: 1,
            attributes: HashMap::new(),
            css: HashMap::new(),
        }
    }
}

type Hook = Arc<dyn Fn(&FakePage) + Send + Sync>;

#[derive(Default)]
struct State {
    url: String,
    elements: HashMap<String, FakeElement>,
    actions: Vec<String>,
    hooks: HashMap<String, Hook>,
    dialog_handlers: Vec<DialogHandler>,
    responses: Vec<String>,
    assertion_timeout: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an element.
    pub fn insert(&self, selector: impl Into<Selector>, init: impl FnOnce(&mut FakeElement)) {
        let mut element = FakeElement::default();
        init(&mut element);
        self.state
            .lock()
            .elements
            .insert(selector.into().render(), element);
    }

    /// Adds a list: the bare selector counts `texts.len()` matches and each
    /// `nth=i` resolves to one item.
    pub fn insert_list(&self, selector: impl Into<Selector>, texts: &[&str]) {
        let selector = selector.into();
        let mut state = self.state.lock();
        state.elements.insert(
            selector.render(),
            FakeElement {
                count: texts.len(),
                ..FakeElement::default()
            },
        );
        for (i, text) in texts.iter().enumerate() {
            state.elements.insert(
                selector.clone().nth(i as i32).render(),
                FakeElement {
                    text: text.to_string(),
                    ..FakeElement::default()
                },
            );
        }
    }

    pub fn update(&self, selector: impl Into<Selector>, change: impl FnOnce(&mut FakeElement)) {
        let key = selector.into().render();
        if let Some(element) = self.state.lock().elements.get_mut(&key) {
            change(element);
        }
    }

    pub fn remove(&self, selector: impl Into<Selector>) {
        self.state.lock().elements.remove(&selector.into().render());
    }

    pub fn element(&self, selector: impl Into<Selector>) -> Option<FakeElement> {
        self.state
            .lock()
            .elements
            .get(&selector.into().render())
            .cloned()
    }

    /// Runs `hook` whenever `action` ("click", "hover", ...) hits `selector`.
    pub fn on(
        &self,
        action: &str,
        selector: impl Into<Selector>,
        hook: impl Fn(&FakePage) + Send + Sync + 'static,
    ) {
        let key = format!("{} {}", action, selector.into().render());
        self.state.lock().hooks.insert(key, Arc::new(hook));
    }

    /// Every action performed so far, as `"<action> <selector>"`.
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    /// Default timeout every `expect(..)` on this page starts from.
    pub fn set_assertion_timeout(&self, timeout: Duration) {
        self.state.lock().assertion_timeout = Some(timeout);
    }

    /// Simulates a completed network response.
    pub fn respond(&self, url: &str) {
        self.state.lock().responses.push(url.to_string());
    }

    /// Simulates the page raising a dialog; returns the handlers' last answer.
    pub fn raise_dialog(&self, kind: &str, message: &str) -> Option<DialogAction> {
        let handlers = self.state.lock().dialog_handlers.clone();
        let event = DialogEvent {
            kind: kind.to_string(),
            message: message.to_string(),
            default_value: String::new(),
        };
        handlers.iter().map(|h| h(&event)).last()
    }

    fn record(&self, action: &str, key: &str) {
        let hook = {
            let mut state = self.state.lock();
            state.actions.push(format!("{} {}", action, key));
            state.hooks.get(&format!("{} {}", action, key)).cloned()
        };
        if let Some(hook) = hook {
            hook(self);
        }
    }

    fn with_element<T>(&self, key: &str, read: impl FnOnce(&mut FakeElement) -> T) -> Result<T> {
        let mut state = self.state.lock();
        let resolved = resolve_key(&state.elements, key)
            .ok_or_else(|| Error::ElementNotFound(key.to_string()))?;
        let element = state
            .elements
            .get_mut(&resolved)
            .ok_or_else(|| Error::ElementNotFound(key.to_string()))?;
        Ok(read(element))
    }
}

// `X >> nth=0` and `X >> nth=-1` fall back to a single `X`
fn resolve_key(elements: &HashMap<String, FakeElement>, key: &str) -> Option<String> {
    if elements.contains_key(key) {
        return Some(key.to_string());
    }
    for suffix in [" >> nth=0", " >> nth=-1"] {
        if let Some(base) = key.strip_suffix(suffix) {
            if elements.get(base).is_some_and(|e| e.count == 1) {
                return Some(base.to_string());
            }
        }
    }
    None
}

#[async_trait]
impl PageHandle for FakePage {
    type Locator = FakeLocator;

    async fn goto(&self, url: &str) -> Result<()> {
        self.state.lock().url = url.to_string();
        self.record("goto", url);
        Ok(())
    }

    fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    fn locator(&self, selector: Selector) -> FakeLocator {
        FakeLocator {
            page: self.clone(),
            selector,
        }
    }

    async fn on_dialog(&self, handler: DialogHandler) -> Result<()> {
        self.state.lock().dialog_handlers.push(handler);
        Ok(())
    }

    async fn wait_for_response(&self, url_pattern: &str, timeout: Duration) -> Result<()> {
        let pattern = glob::Pattern::new(url_pattern)
            .map_err(|e| Error::InvalidArgument(format!("Invalid URL pattern: {}", e)))?;
        let state = &self.state;
        let pattern = &pattern;
        let outcome = crate::wait::poll_until(timeout, Duration::from_millis(5), move || async move {
            let seen = state.lock().responses.iter().any(|url| pattern.matches(url));
            Ok((seen, ()))
        })
        .await?;
        if outcome.is_matched() {
            Ok(())
        } else {
            Err(Error::Timeout(format!("no response matching '{}'", url_pattern)))
        }
    }

    async fn wait_for_load_state(&self, _state: LoadState, _timeout: Duration) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeLocator {
    page: FakePage,
    selector: Selector,
}

impl FakeLocator {
    fn key(&self) -> String {
        self.selector.render()
    }

    fn act(&self, action: &str) -> Result<()> {
        let key = self.key();
        self.page.with_element(&key, |_| ())?;
        self.page.record(action, &key);
        Ok(())
    }
}

#[async_trait]
impl ElementLocator for FakeLocator {
    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn with_selector(&self, selector: Selector) -> Self {
        Self {
            page: self.page.clone(),
            selector,
        }
    }

    fn assertion_timeout(&self) -> Option<Duration> {
        self.page.state.lock().assertion_timeout
    }

    async fn count(&self) -> Result<usize> {
        let state = self.page.state.lock();
        Ok(resolve_key(&state.elements, &self.key())
            .and_then(|k| state.elements.get(&k).map(|e| e.count))
            .unwrap_or(0))
    }

    async fn click(&self, _options: Option<ActionOptions>) -> Result<()> {
        self.act("click")
    }

    async fn fill(&self, value: &str, _options: Option<ActionOptions>) -> Result<()> {
        self.page
            .with_element(&self.key(), |e| e.value = value.to_string())?;
        self.act("fill")
    }

    async fn clear(&self, _options: Option<ActionOptions>) -> Result<()> {
        self.page.with_element(&self.key(), |e| e.value.clear())?;
        self.act("clear")
    }

    async fn press_sequentially(&self, text: &str, _delay: Duration) -> Result<()> {
        self.page.with_element(&self.key(), |e| e.value.push_str(text))?;
        self.act("type")
    }

    async fn check(&self, _options: Option<ActionOptions>) -> Result<()> {
        self.page.with_element(&self.key(), |e| e.checked = true)?;
        self.act("check")
    }

    async fn uncheck(&self, _options: Option<ActionOptions>) -> Result<()> {
        self.page.with_element(&self.key(), |e| e.checked = false)?;
        self.act("uncheck")
    }

    async fn hover(&self, _options: Option<ActionOptions>) -> Result<()> {
        self.act("hover")
    }

    async fn text_content(&self) -> Result<Option<String>> {
        self.page.with_element(&self.key(), |e| Some(e.text.clone()))
    }

    async fn inner_text(&self) -> Result<String> {
        self.page.with_element(&self.key(), |e| e.text.clone())
    }

    async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        self.page
            .with_element(&self.key(), |e| e.attributes.get(name).cloned())
    }

    async fn input_value(&self) -> Result<String> {
        self.page.with_element(&self.key(), |e| e.value.clone())
    }

    async fn is_checked(&self) -> Result<bool> {
        self.page.with_element(&self.key(), |e| e.checked)
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self
            .page
            .with_element(&self.key(), |e| e.visible)
            .unwrap_or(false))
    }

    async fn css_value(&self, property: &str) -> Result<String> {
        self.page.with_element(&self.key(), |e| {
            e.css.get(property).cloned().unwrap_or_default()
        })
    }
}
