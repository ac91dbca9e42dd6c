// Forms → Datepicker page object

use crate::error::{Error, Result};
use crate::page::{ElementLocator, PageHandle};
use crate::selector::Selector;
use chrono::{Datelike, Days, Local, NaiveDate};
use std::cmp::Ordering;

/// Placeholder of the "Common Datepicker" input
pub const FORM_PICKER: &str = "Form Picker";

const VIEW_MODE: &str = "nb-calendar-view-mode";
const NEXT_MONTH: &str = r#"nb-calendar-pageable-navigation [data-name="chevron-right"]"#;
const PREV_MONTH: &str = r#"nb-calendar-pageable-navigation [data-name="chevron-left"]"#;
// Greyed-out days of the adjacent months carry `bounding-month`
const DAY_CELL: &str = ".day-cell:not(.bounding-month)";

// Upper bound on month clicks before giving up (twenty years)
const MAX_MONTH_STEPS: usize = 240;

/// A calendar date and the strings the datepicker shows for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate {
    date: NaiveDate,
}

impl TargetDate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Today (local time) plus `days`.
    pub fn from_today_plus(days: u64) -> Result<Self> {
        Self::from_date_plus(Local::now().date_naive(), days)
    }

    /// `start` plus `days`.
    pub fn from_date_plus(start: NaiveDate, days: u64) -> Result<Self> {
        start
            .checked_add_days(Days::new(days))
            .map(Self::new)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("{} + {} days is out of range", start, days))
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Day of month without padding, e.g. `"7"`.
    pub fn day(&self) -> String {
        self.date.format("%-d").to_string()
    }

    /// Calendar header for the target month, e.g. `"March 2027"`.
    pub fn month_year_header(&self) -> String {
        self.date.format("%B %Y").to_string()
    }

    /// Text the input shows once the date is picked, e.g. `"Mar 7, 2027"`.
    pub fn input_text(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    fn first_of_month(&self) -> Option<NaiveDate> {
        self.date.with_day(1)
    }
}

/// Parses a calendar header such as `"March 2027"` into the first of that month.
pub fn parse_month_header(header: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", header.trim()), "%d %B %Y").map_err(|e| {
        Error::InvalidArgument(format!(
            "unrecognised calendar header '{}': {}",
            header.trim(),
            e
        ))
    })
}

pub struct DatepickerPage<'a, P: PageHandle> {
    page: &'a P,
}

impl<'a, P: PageHandle> DatepickerPage<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self { page }
    }

    /// The "Form Picker" input.
    pub fn input(&self) -> P::Locator {
        self.page.locator(Selector::placeholder(FORM_PICKER))
    }

    /// Picks the date `days` from today. Returns the text the input should
    /// now show.
    pub async fn select_date_from_today(&self, days: u64) -> Result<String> {
        let target = TargetDate::from_today_plus(days)?;
        self.select_date(&target).await?;
        Ok(target.input_text())
    }

    /// Opens the calendar, pages to the target month in whichever direction
    /// it lies and clicks the day.
    ///
    /// The calendar reopens on the last picked month, so the target can be
    /// before or after what is shown.
    pub async fn select_date(&self, target: &TargetDate) -> Result<()> {
        tracing::debug!(date = %target.date(), "Selecting date in calendar");
        self.input().click(None).await?;

        let wanted = target.first_of_month().ok_or_else(|| {
            Error::InvalidArgument(format!("no first of month for {}", target.date()))
        })?;
        let header = self.page.locator(Selector::css(VIEW_MODE));
        let mut steps = 0;
        loop {
            let shown = header.text_content().await?.unwrap_or_default();
            let shown = parse_month_header(&shown)?;
            let button = match shown.cmp(&wanted) {
                Ordering::Equal => break,
                Ordering::Less => NEXT_MONTH,
                Ordering::Greater => PREV_MONTH,
            };
            if steps == MAX_MONTH_STEPS {
                return Err(Error::ElementNotFound(format!(
                    "calendar never reached '{}' (last shown '{}')",
                    target.month_year_header(),
                    shown.format("%B %Y")
                )));
            }
            self.page.locator(Selector::css(button)).click(None).await?;
            steps += 1;
        }
        tracing::trace!(steps, "Calendar at target month");

        self.page
            .locator(day_cell(&target.day()))
            .click(None)
            .await
    }
}

/// Current-month day cell showing exactly `day`.
pub fn day_cell(day: &str) -> Selector {
    Selector::css(DAY_CELL).then(Selector::text(day).exact())
}
