// Tables & Data → Smart Table page object

use crate::error::Result;
use crate::page::{DialogRecorder, ElementLocator, PageHandle};
use crate::selector::Selector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Text shown in place of rows when a filter matches nothing
pub const NO_DATA_TEXT: &str = "No data found";

/// Message of the delete confirmation dialog
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete?";

/// Time the table takes to apply a filter after typing
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Editable data columns, in display order after the actions column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    FirstName,
    LastName,
    Username,
    Email,
    Age,
}

impl Column {
    /// Placeholder of the column's editor and filter inputs.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::FirstName => "First Name",
            Column::LastName => "Last Name",
            Column::Username => "Username",
            Column::Email => "E-mail",
            Column::Age => "Age",
        }
    }

    /// Index of the column's `td` within a row (0 is the actions cell).
    pub fn cell_index(&self) -> i32 {
        match self {
            Column::Id => 1,
            Column::FirstName => 2,
            Column::LastName => 3,
            Column::Username => 4,
            Column::Email => 5,
            Column::Age => 6,
        }
    }
}

/// The smart table: inline edit, delete with confirmation, filters, paging.
pub struct SmartTablePage<'a, P: PageHandle> {
    page: &'a P,
    dialogs: DialogRecorder,
    dialogs_armed: AtomicBool,
}

impl<'a, P: PageHandle> SmartTablePage<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self {
            page,
            dialogs: DialogRecorder::accepting(),
            dialogs_armed: AtomicBool::new(false),
        }
    }

    pub fn table(&self) -> P::Locator {
        self.page.locator(Selector::role("table"))
    }

    /// Row containing `email` anywhere in its text.
    pub fn row_by_email(&self, email: &str) -> P::Locator {
        self.page.locator(row_by_email(email))
    }

    /// Row whose ID cell is exactly `id`.
    pub fn row_by_id(&self, id: &str) -> P::Locator {
        self.page.locator(row_by_id(id))
    }

    /// `column` cell of the row with ID `id`.
    pub fn cell_by_id(&self, id: &str, column: Column) -> P::Locator {
        self.row_by_id(id)
            .locator(Selector::css("td"))
            .nth(column.cell_index())
    }

    /// Deletes the row containing `email`, accepting the confirmation.
    pub async fn delete_row_by_email(&self, email: &str) -> Result<()> {
        tracing::debug!(email, "Deleting table row");
        self.accept_dialogs().await?;
        self.table()
            .locator(Selector::css("tr").has_text(email))
            .locator(Selector::css(".nb-trash"))
            .click(None)
            .await
    }

    /// Messages of the confirmation dialogs accepted so far.
    pub fn dialog_messages(&self) -> Vec<String> {
        self.dialogs.messages()
    }

    /// Edits one cell of the row containing `email` and saves.
    pub async fn edit_row_by_email(&self, email: &str, column: Column, value: &str) -> Result<()> {
        tracing::debug!(email, ?column, value, "Editing table row");
        self.edit(self.row_by_email(email), column, value).await
    }

    /// Edits one cell of the row with ID `id` and saves. The row must be
    /// on the current page.
    pub async fn edit_row_by_id(&self, id: &str, column: Column, value: &str) -> Result<()> {
        tracing::debug!(id, ?column, value, "Editing table row");
        self.edit(self.row_by_id(id), column, value).await
    }

    /// Clicks page `number` in the pagination bar.
    pub async fn go_to_page(&self, number: u32) -> Result<()> {
        self.page
            .locator(
                Selector::css(".ng2-smart-pagination-nav")
                    .then(Selector::text(number.to_string()).exact()),
            )
            .click(None)
            .await
    }

    /// Types `age` into the Age filter and waits for the table to settle.
    pub async fn filter_by_age(&self, age: &str) -> Result<()> {
        tracing::debug!(age, "Filtering table by age");
        self.page
            .locator(Selector::css("input-filter").then(Selector::placeholder(Column::Age.placeholder())))
            .fill(age, None)
            .await?;
        self.page.wait_for_timeout(FILTER_DEBOUNCE).await;
        Ok(())
    }

    /// Age cell of every row currently shown; empty when nothing matches.
    pub async fn ages_shown(&self) -> Result<Vec<String>> {
        if self.shows_no_data().await? {
            return Ok(Vec::new());
        }
        let mut ages = Vec::new();
        for row in self.page.locator(Selector::css("tbody tr")).all().await? {
            let age = row.locator(Selector::css("td")).last().text_content().await?;
            ages.push(age.unwrap_or_default().trim().to_string());
        }
        Ok(ages)
    }

    /// Whether the table shows the empty-result placeholder.
    pub async fn shows_no_data(&self) -> Result<bool> {
        let text = self.table().text_content().await?.unwrap_or_default();
        Ok(text.contains(NO_DATA_TEXT))
    }

    async fn edit(&self, row: P::Locator, column: Column, value: &str) -> Result<()> {
        row.locator(Selector::css(".nb-edit")).click(None).await?;
        let editor = self
            .page
            .locator(Selector::css("input-editor").then(Selector::placeholder(column.placeholder())));
        editor.clear(None).await?;
        editor.fill(value, None).await?;
        self.page
            .locator(Selector::css(".nb-checkmark"))
            .click(None)
            .await
    }

    async fn accept_dialogs(&self) -> Result<()> {
        if !self.dialogs_armed.swap(true, Ordering::SeqCst) {
            self.page.on_dialog(self.dialogs.handler()).await?;
        }
        Ok(())
    }
}

/// `row` role named by `email`.
pub fn row_by_email(email: &str) -> Selector {
    Selector::role("row").name(email)
}

/// `row` role whose second cell (ID) is exactly `id`. The accessible name
/// alone is ambiguous when another cell (e.g. Age) shows the same number.
pub fn row_by_id(id: &str) -> Selector {
    Selector::role("row")
        .name(id)
        .has(Selector::css("td").nth(1).then(Selector::text(id).exact()))
}
