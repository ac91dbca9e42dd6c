// Header page object (theme switcher)

use crate::error::Result;
use crate::page::{ElementLocator, PageHandle};
use crate::selector::{Filter, Selector};
use std::fmt;

const THEME_SELECT: &str = "ngx-header nb-select";
const THEME_OPTIONS: &str = "nb-option-list nb-option";
const LAYOUT_HEADER: &str = "nb-layout-header";

/// Themes offered by the header dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
    Cosmic,
    Corporate,
}

impl Theme {
    /// Every theme, in dropdown order.
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Cosmic, Theme::Corporate];

    /// Option label.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Cosmic => "Cosmic",
            Theme::Corporate => "Corporate",
        }
    }

    /// Computed `background-color` of `nb-layout-header` under this theme.
    pub fn header_background(&self) -> &'static str {
        match self {
            Theme::Light | Theme::Corporate => "rgb(255, 255, 255)",
            Theme::Dark => "rgb(34, 43, 69)",
            Theme::Cosmic => "rgb(50, 50, 89)",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct HeaderPage<'a, P: PageHandle> {
    page: &'a P,
}

impl<'a, P: PageHandle> HeaderPage<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self { page }
    }

    /// The theme dropdown.
    pub fn theme_select(&self) -> P::Locator {
        self.page.locator(Selector::css(THEME_SELECT))
    }

    /// Options of the open dropdown.
    pub fn option_list(&self) -> P::Locator {
        self.page.locator(Selector::css(THEME_OPTIONS))
    }

    /// The layout header whose background follows the theme.
    pub fn header(&self) -> P::Locator {
        self.page.locator(Selector::css(LAYOUT_HEADER))
    }

    pub async fn open_theme_menu(&self) -> Result<()> {
        self.theme_select().click(None).await
    }

    /// Option labels, trimmed. The dropdown must be open.
    pub async fn theme_options(&self) -> Result<Vec<String>> {
        Ok(self
            .option_list()
            .all_text_contents()
            .await?
            .into_iter()
            .map(|text| text.trim().to_string())
            .collect())
    }

    /// Opens the dropdown and picks `theme`.
    pub async fn select_theme(&self, theme: Theme) -> Result<()> {
        tracing::debug!(%theme, "Switching theme");
        self.open_theme_menu().await?;
        self.option_list()
            .filter(Filter::HasText(theme.label().to_string()))
            .click(None)
            .await
    }

    /// Current computed header `background-color`.
    pub async fn header_background(&self) -> Result<String> {
        self.header().css_value("background-color").await
    }
}
