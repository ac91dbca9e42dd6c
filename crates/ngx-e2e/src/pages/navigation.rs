// Sidebar navigation page object

use crate::error::Result;
use crate::page::{ElementLocator, PageHandle};
use crate::selector::Selector;
use std::fmt;

/// Sidebar menu container
pub const SIDEBAR_MENU: &str = "nb-sidebar nb-menu";

/// A section reachable from the sidebar menu: a group title and the item
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuRoute {
    FormLayouts,
    Datepicker,
    Toastr,
    Tooltip,
    SmartTable,
}

impl MenuRoute {
    /// Every route, in menu order.
    pub const ALL: [MenuRoute; 5] = [
        MenuRoute::FormLayouts,
        MenuRoute::Datepicker,
        MenuRoute::Toastr,
        MenuRoute::Tooltip,
        MenuRoute::SmartTable,
    ];

    /// Title of the collapsible menu group.
    pub fn group(&self) -> &'static str {
        match self {
            MenuRoute::FormLayouts | MenuRoute::Datepicker => "Forms",
            MenuRoute::Toastr | MenuRoute::Tooltip => "Modal & Overlays",
            MenuRoute::SmartTable => "Tables & Data",
        }
    }

    /// Visible label of the menu item.
    pub fn item(&self) -> &'static str {
        match self {
            MenuRoute::FormLayouts => "Form Layouts",
            MenuRoute::Datepicker => "Datepicker",
            MenuRoute::Toastr => "Toastr",
            MenuRoute::Tooltip => "Tooltip",
            MenuRoute::SmartTable => "Smart Table",
        }
    }

    /// Labels clicked, in order, to reach the section.
    pub fn labels(&self) -> [&'static str; 2] {
        [self.group(), self.item()]
    }

    /// Looks a route up by item label or kebab-case name (`form-layouts`).
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|route| route.item().to_ascii_lowercase() == wanted)
    }
}

impl fmt::Display for MenuRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.group(), self.item())
    }
}

/// Named navigation through the sidebar.
///
/// Holds a borrowed page handle and nothing else. Each method ends on its
/// destination section whatever section was active before: a group title
/// toggles its submenu, so it is only clicked while collapsed. Whether the
/// destination actually rendered is left to the caller to assert.
///
/// ```ignore
/// page.goto(&config.app_url("")?).await?;
/// let navigate_to = NavigationPage::new(&page);
/// navigate_to.form_layouts_page().await?;
/// ```
pub struct NavigationPage<'a, P: PageHandle> {
    page: &'a P,
}

impl<'a, P: PageHandle> NavigationPage<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self { page }
    }

    /// Forms → Form Layouts
    pub async fn form_layouts_page(&self) -> Result<()> {
        self.navigate(MenuRoute::FormLayouts).await
    }

    /// Forms → Datepicker
    pub async fn datepicker_page(&self) -> Result<()> {
        self.navigate(MenuRoute::Datepicker).await
    }

    /// Modal & Overlays → Toastr
    pub async fn toastr_page(&self) -> Result<()> {
        self.navigate(MenuRoute::Toastr).await
    }

    /// Modal & Overlays → Tooltip
    pub async fn tooltip_page(&self) -> Result<()> {
        self.navigate(MenuRoute::Tooltip).await
    }

    /// Tables & Data → Smart Table
    pub async fn smart_table_page(&self) -> Result<()> {
        self.navigate(MenuRoute::SmartTable).await
    }

    /// Expands the route's group if needed, then clicks its item.
    pub async fn navigate(&self, route: MenuRoute) -> Result<()> {
        tracing::debug!(%route, "Navigating via sidebar");
        self.expand_group(route.group()).await?;
        self.page.locator(menu_item(route.item())).click(None).await
    }

    async fn expand_group(&self, title: &str) -> Result<()> {
        let group = self.page.locator(menu_group(title));
        let expanded = group.get_attribute("aria-expanded").await?;
        if expanded.as_deref() == Some("true") {
            tracing::trace!(group = title, "Menu group already expanded");
            return Ok(());
        }
        group.click(None).await
    }
}

/// Collapsible group link; carries `aria-expanded`.
pub fn menu_group(title: &str) -> Selector {
    Selector::css(SIDEBAR_MENU).then(Selector::title(title).exact())
}

/// Item link, matched by its exact visible label inside the sidebar.
pub fn menu_item(label: &str) -> Selector {
    Selector::css(SIDEBAR_MENU).then(Selector::text(label).exact())
}
