// UI Testing Playground AJAX page object
//
// The trigger button fires a request that the server answers after a
// delay; only then is the success label added to the page.

use crate::config::E2eConfig;
use crate::error::Result;
use crate::page::{ElementLocator, PageHandle};
use crate::selector::Selector;
use std::time::Duration;

/// Path of the AJAX page under the playground root
pub const AJAX_PATH: &str = "ajax";
/// Path of the delayed data endpoint
pub const AJAX_DATA_PATH: &str = "ajaxdata";
/// Label text once the data arrived
pub const SUCCESS_TEXT: &str = "Data loaded with AJAX get request.";
/// Trigger button label
pub const TRIGGER_TEXT: &str = "Button Triggering AJAX Request";

pub struct AjaxPage<'a, P: PageHandle> {
    page: &'a P,
    config: &'a E2eConfig,
}

impl<'a, P: PageHandle> AjaxPage<'a, P> {
    pub fn new(page: &'a P, config: &'a E2eConfig) -> Self {
        Self { page, config }
    }

    /// Loads the AJAX page.
    pub async fn open(&self) -> Result<()> {
        self.page.goto(&self.config.playground(AJAX_PATH)?).await
    }

    /// Clicks the trigger button. Returns as soon as the click lands; the
    /// response arrives later.
    pub async fn trigger_request(&self) -> Result<()> {
        tracing::debug!("Triggering AJAX request");
        self.page
            .locator(Selector::text(TRIGGER_TEXT))
            .click(None)
            .await
    }

    /// First success label (`.bg-success`).
    pub fn success_label(&self) -> P::Locator {
        self.page.locator(Selector::css(".bg-success")).first()
    }

    /// Absolute URL of the data endpoint.
    pub fn ajax_data_url(&self) -> Result<String> {
        self.config.playground(AJAX_DATA_PATH)
    }

    /// Waits for the data endpoint's response.
    pub async fn wait_for_data(&self, timeout: Duration) -> Result<()> {
        self.page
            .wait_for_response(&self.ajax_data_url()?, timeout)
            .await
    }
}
