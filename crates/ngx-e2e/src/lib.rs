//! ngx-e2e: End-to-end tests for the ngx-admin UI showcase, on Playwright
//!
//! This crate provides the page objects, locator builder and assertions the
//! integration suites are written with. Page objects and assertions are
//! generic over the [`PageHandle`] / [`ElementLocator`] capability traits;
//! [`BrowserSession`] supplies the Playwright-backed implementation.
//!
//! # Examples
//!
//! ## Navigating with a page object
//!
//! ```ignore
//! use ngx_e2e::{BrowserSession, E2eConfig, NavigationPage, PageHandle};
//!
//! #[tokio::main]
//! async fn main() -> ngx_e2e::Result<()> {
//!     let config = E2eConfig::from_env()?;
//!     let session = BrowserSession::launch(&config).await?;
//!     let page = session.new_page().await?;
//!
//!     page.goto(&config.app_url("")?).await?;
//!     NavigationPage::new(&page).form_layouts_page().await?;
//!
//!     session.close().await
//! }
//! ```
//!
//! ## Locators and assertions
//!
//! ```ignore
//! use ngx_e2e::{ElementLocator, PageHandle, Selector, SoftAssertions, expect, verify_eq};
//!
//! let basic_form = page.locator(Selector::css("nb-card").has_text("Basic form"));
//! let email = basic_form.locator(Selector::role("textbox").name("Email"));
//!
//! // Immediate: read once, compare once
//! email.fill("Uma@musume.com", None).await?;
//! verify_eq("email value", email.input_value().await?, "Uma@musume.com")?;
//!
//! // Auto-retrying: poll until it matches or the timeout elapses
//! expect(email.clone()).to_have_value("Uma@musume.com").await?;
//!
//! // Soft: record the failure, keep going, fail at the end
//! let soft = SoftAssertions::new();
//! let button = basic_form.locator(Selector::css("button"));
//! soft.check(expect(button.clone()).to_have_text("Submit123").await);
//! button.click(None).await?;
//! soft.finish()?;
//! ```

mod assertions;
mod browser;
pub mod config;
mod error;
pub mod page;
pub mod pages;
pub mod selector;
pub mod wait;

#[cfg(test)]
mod testing;

// Re-export the Playwright-backed capability
pub use browser::{BrowserLocator, BrowserPage, BrowserSession};

// Re-export error types
pub use error::{Error, FailureKind, Result};

// Re-export assertions API
pub use assertions::{
    DEFAULT_ASSERTION_TIMEOUT, Expectation, SoftAssertions, expect, verify, verify_contains,
    verify_eq,
};

// Re-export configuration
pub use config::{BrowserKind, E2eConfig};

// Re-export the page capability
pub use page::{
    ActionOptions, DialogAction, DialogEvent, DialogHandler, DialogRecorder, ElementLocator,
    ElementState, LoadState, PageHandle,
};

// Re-export selectors
pub use selector::{Filter, Selector, TextMatch};

// Re-export waiting helpers
pub use wait::{PollOutcome, TestTimeouts, poll_until};

// Re-export page objects
pub use pages::{
    AjaxPage, Column, DatepickerPage, FormLayoutsPage, HeaderPage, MenuRoute, NavigationPage,
    SmartTablePage, TargetDate, Theme,
};
