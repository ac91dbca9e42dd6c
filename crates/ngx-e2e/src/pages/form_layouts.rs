// Forms → Form Layouts page object

use crate::error::Result;
use crate::page::{ActionOptions, ElementLocator, PageHandle};
use crate::selector::Selector;

/// Card title of the grid form
pub const USING_THE_GRID: &str = "Using the Grid";
/// Card title of the inline form
pub const INLINE_FORM: &str = "Inline form";
/// Card title of the basic form
pub const BASIC_FORM: &str = "Basic form";

/// Form cards on the Form Layouts section.
///
/// Radio buttons and checkboxes there are Nebular components whose native
/// inputs are visually hidden, so checking them always uses
/// [`ActionOptions::forced`].
pub struct FormLayoutsPage<'a, P: PageHandle> {
    page: &'a P,
}

impl<'a, P: PageHandle> FormLayoutsPage<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self { page }
    }

    /// `nb-card` whose text contains `title`.
    pub fn card(&self, title: &str) -> P::Locator {
        self.page.locator(Selector::css("nb-card").has_text(title))
    }

    /// The "Using the Grid" card.
    pub fn using_the_grid(&self) -> P::Locator {
        self.card(USING_THE_GRID)
    }

    /// The "Basic form" card.
    pub fn basic_form(&self) -> P::Locator {
        self.card(BASIC_FORM)
    }

    /// The "Inline form" card.
    pub fn inline_form(&self) -> P::Locator {
        self.card(INLINE_FORM)
    }

    /// Fills the grid form, picks the radio labelled `option` and signs in.
    pub async fn submit_using_the_grid(
        &self,
        email: &str,
        password: &str,
        option: &str,
    ) -> Result<()> {
        tracing::debug!(email, option, "Submitting the grid form");
        let form = self.using_the_grid();
        form.locator(textbox("Email")).fill(email, None).await?;
        form.locator(textbox("Password")).fill(password, None).await?;
        form.locator(Selector::role("radio").name(option))
            .check(Some(ActionOptions::forced()))
            .await?;
        form.locator(Selector::role("button").name("Sign in"))
            .click(None)
            .await
    }

    /// Fills the inline form, optionally ticks "Remember me" and submits.
    pub async fn submit_inline_form(&self, name: &str, email: &str, remember_me: bool) -> Result<()> {
        tracing::debug!(name, email, remember_me, "Submitting the inline form");
        let form = self.inline_form();
        form.locator(Selector::placeholder("Jane Doe"))
            .fill(name, None)
            .await?;
        form.locator(Selector::placeholder("Email"))
            .fill(email, None)
            .await?;
        if remember_me {
            form.locator(Selector::role("checkbox"))
                .check(Some(ActionOptions::forced()))
                .await?;
        }
        form.locator(Selector::role("button")).click(None).await
    }
}

/// Text input by accessible name.
pub fn textbox(name: &str) -> Selector {
    Selector::role("textbox").name(name)
}
