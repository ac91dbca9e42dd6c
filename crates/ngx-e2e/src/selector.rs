// Selector - typed locator descriptions
//
// Builds the selector strings Playwright resolves on the server side.
// Each user-facing query (text, role, label, placeholder, test id, title)
// renders to the same `internal:` engine syntax the official clients emit,
// so resolution semantics (case-insensitive substring vs exact match) stay
// identical to `page.getByText()` and friends.
//
// See: <https://playwright.dev/docs/locators>

use std::fmt;

/// How a text-like query compares against the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Case-insensitive substring match, whitespace normalized
    #[default]
    Substring,
    /// Case-sensitive full-string match
    Exact,
}

impl TextMatch {
    fn suffix(self) -> &'static str {
        match self {
            TextMatch::Substring => "i",
            TextMatch::Exact => "s",
        }
    }
}

/// A single query that selects elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// CSS selector (Playwright's CSS extensions such as `:text-is()` included)
    Css(String),
    /// XPath expression
    XPath(String),
    /// Visible text
    Text(String, TextMatch),
    /// ARIA role with an optional accessible name
    Role {
        role: String,
        name: Option<String>,
        matching: TextMatch,
    },
    /// Associated `<label>` text or `aria-label`
    Label(String, TextMatch),
    /// `placeholder` attribute
    Placeholder(String, TextMatch),
    /// `data-testid` attribute (always exact)
    TestId(String),
    /// `title` attribute
    Title(String, TextMatch),
}

/// Narrowing applied to an existing selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Keep elements containing the given text somewhere inside
    HasText(String),
    /// Keep elements containing a descendant matching the selector
    Has(Selector),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Query(Query),
    Nth(i32),
    Filter(Filter),
    Parent,
}

/// Chainable, engine-independent description of a locator.
///
/// ```ignore
/// let email = Selector::css("nb-card")
///     .has_text("Using the Grid")
///     .then(Selector::role("textbox").name("Email"));
/// assert_eq!(
///     email.render(),
///     r#"nb-card >> internal:has-text="Using the Grid"i >> internal:role=textbox[name="Email"i]"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    steps: Vec<Step>,
}

impl Selector {
    fn query(query: Query) -> Self {
        Self {
            steps: vec![Step::Query(query)],
        }
    }

    /// Selects by CSS selector.
    pub fn css(css: impl Into<String>) -> Self {
        Self::query(Query::Css(css.into()))
    }

    /// Selects by XPath. Not recommended: ties tests to DOM structure.
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::query(Query::XPath(xpath.into()))
    }

    /// Selects by visible text (case-insensitive substring).
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-text>
    pub fn text(text: impl Into<String>) -> Self {
        Self::query(Query::Text(text.into(), TextMatch::Substring))
    }

    /// Selects by ARIA role. Chain [`Selector::name`] to match the accessible name.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-role>
    pub fn role(role: impl Into<String>) -> Self {
        Self::query(Query::Role {
            role: role.into(),
            name: None,
            matching: TextMatch::Substring,
        })
    }

    /// Selects form controls by their label text.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-label>
    pub fn label(text: impl Into<String>) -> Self {
        Self::query(Query::Label(text.into(), TextMatch::Substring))
    }

    /// Selects inputs by placeholder.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-placeholder>
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::query(Query::Placeholder(text.into(), TextMatch::Substring))
    }

    /// Selects by `data-testid`.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-test-id>
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::query(Query::TestId(id.into()))
    }

    /// Selects by `title` attribute.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-title>
    pub fn title(text: impl Into<String>) -> Self {
        Self::query(Query::Title(text.into(), TextMatch::Substring))
    }

    /// Sets the accessible name of the trailing role query.
    ///
    /// Has no effect when the last step is not a role query.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        if let Some(Step::Query(Query::Role { name: slot, .. })) = self.steps.last_mut() {
            *slot = Some(name.into());
        }
        self
    }

    /// Switches the trailing text-like query to exact, case-sensitive matching.
    pub fn exact(mut self) -> Self {
        if let Some(Step::Query(query)) = self.steps.last_mut() {
            match query {
                Query::Text(_, m)
                | Query::Label(_, m)
                | Query::Placeholder(_, m)
                | Query::Title(_, m)
                | Query::Role { matching: m, .. } => *m = TextMatch::Exact,
                Query::Css(_) | Query::XPath(_) | Query::TestId(_) => {}
            }
        }
        self
    }

    /// Scopes `child` to the subtree of the elements matched so far.
    pub fn then(mut self, child: Selector) -> Self {
        self.steps.extend(child.steps);
        self
    }

    /// Picks the element at `index` (0-based; negative counts from the end).
    pub fn nth(mut self, index: i32) -> Self {
        self.steps.push(Step::Nth(index));
        self
    }

    /// Picks the first matching element.
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Picks the last matching element.
    pub fn last(self) -> Self {
        self.nth(-1)
    }

    /// Keeps elements that contain `text`.
    pub fn has_text(self, text: impl Into<String>) -> Self {
        self.filter(Filter::HasText(text.into()))
    }

    /// Keeps elements with a descendant matching `inner`.
    pub fn has(self, inner: Selector) -> Self {
        self.filter(Filter::Has(inner))
    }

    /// Applies a [`Filter`].
    pub fn filter(mut self, filter: Filter) -> Self {
        self.steps.push(Step::Filter(filter));
        self
    }

    /// Moves to the parent element of each match.
    pub fn parent(mut self) -> Self {
        self.steps.push(Step::Parent);
        self
    }

    /// Renders the selector to Playwright's selector-string syntax.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(render_step)
            .collect::<Vec<_>>()
            .join(" >> ")
    }

    /// Returns an equivalent plain CSS selector when every step is CSS.
    ///
    /// Used for reads that run inside the page (computed styles), where only
    /// `document.querySelectorAll` is available. A trailing `nth` is kept as
    /// the index into the match list.
    pub fn as_css(&self) -> Option<(String, i32)> {
        let mut parts = Vec::new();
        let mut index = 0;
        let last = self.steps.len().checked_sub(1)?;
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Query(Query::Css(css)) if !is_extended_css(css) => parts.push(css.clone()),
                Step::Nth(n) if i == last => index = *n,
                _ => return None,
            }
        }
        Some((parts.join(" "), index))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Selector::css(css)
    }
}

fn render_step(step: &Step) -> String {
    match step {
        Step::Query(query) => render_query(query),
        Step::Nth(index) => format!("nth={}", index),
        Step::Filter(Filter::HasText(text)) => {
            format!("internal:has-text={}", escape_text(text, TextMatch::Substring))
        }
        Step::Filter(Filter::Has(inner)) => {
            format!("internal:has={}", json_string(&inner.render()))
        }
        Step::Parent => "xpath=..".to_string(),
    }
}

fn render_query(query: &Query) -> String {
    match query {
        Query::Css(css) => css.clone(),
        Query::XPath(xpath) => format!("xpath={}", xpath),
        Query::Text(text, m) => format!("internal:text={}", escape_text(text, *m)),
        Query::Role {
            role,
            name,
            matching,
        } => match name {
            Some(name) => format!(
                "internal:role={}[name={}]",
                role,
                escape_attribute(name, *matching)
            ),
            None => format!("internal:role={}", role),
        },
        Query::Label(text, m) => format!("internal:label={}", escape_text(text, *m)),
        Query::Placeholder(text, m) => {
            format!("internal:attr=[placeholder={}]", escape_attribute(text, *m))
        }
        Query::TestId(id) => format!(
            "internal:testid=[data-testid={}]",
            escape_attribute(id, TextMatch::Exact)
        ),
        Query::Title(text, m) => format!("internal:attr=[title={}]", escape_attribute(text, *m)),
    }
}

fn json_string(value: &str) -> String {
    // Serializing a &str cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

fn escape_text(text: &str, matching: TextMatch) -> String {
    format!("{}{}", json_string(text), matching.suffix())
}

fn escape_attribute(value: &str, matching: TextMatch) -> String {
    format!(
        "\"{}\"{}",
        value.replace('\\', "\\\\").replace('"', "\\\""),
        matching.suffix()
    )
}

// Playwright-only pseudo classes that querySelectorAll rejects
fn is_extended_css(css: &str) -> bool {
    [":text", ":has-text", ":visible", ":nth-match", ":right-of", ":left-of"]
        .iter()
        .any(|ext| css.contains(ext))
}
