// Assertions - immediate, auto-retrying and soft
//
// - `verify_*` read a value once and compare it.
// - `expect(locator)` re-reads the element until it matches or times out,
//   for state produced asynchronously (AJAX responses, animations).
// - `SoftAssertions` collects failures and lets the test keep going.
//
// See: https://playwright.dev/docs/test-assertions

use crate::error::{Error, Result};
use crate::page::ElementLocator;
use crate::wait::{DEFAULT_POLL_INTERVAL, poll_until};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::Duration;

/// Default timeout for assertions (5 seconds, matching Playwright)
pub const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates an expectation for a locator with auto-retry behavior.
///
/// Assertions will retry until they pass or timeout (default: 5 seconds).
///
/// ```ignore
/// let button = page.locator(Selector::css("nb-card").has_text("Basic form").then("button".into()));
/// expect(button.clone()).to_have_text("Submit").await?;
/// expect(page.locator(Selector::css(".bg-success")).first())
///     .with_timeout(Duration::from_secs(20))
///     .to_have_text("Data loaded with AJAX get request.")
///     .await?;
/// ```
pub fn expect<L: ElementLocator>(locator: L) -> Expectation<L> {
    Expectation::new(locator)
}

/// Expectation wraps a locator and provides assertion methods with auto-retry.
pub struct Expectation<L> {
    locator: L,
    timeout: Duration,
    poll_interval: Duration,
    negate: bool,
}

// to_* methods consume self, matching Playwright's chained expect API
#[allow(clippy::wrong_self_convention)]
impl<L: ElementLocator> Expectation<L> {
    pub(crate) fn new(locator: L) -> Self {
        let timeout = locator
            .assertion_timeout()
            .unwrap_or(DEFAULT_ASSERTION_TIMEOUT);
        Self {
            locator,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            negate: false,
        }
    }

    /// Sets a custom timeout for this assertion.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom poll interval for this assertion.
    ///
    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Negates the assertion.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Shared retry loop: `read` fetches the current value, `matches` decides
    /// whether it satisfies the (non-negated) expectation, `describe` renders
    /// the expectation for the failure message.
    async fn retry<T, R, M>(self, describe: &str, mut read: R, matches: M) -> Result<()>
    where
        T: Debug,
        R: AsyncReader<L, T>,
        M: Fn(&T) -> bool,
    {
        let selector = self.locator.selector().render();
        let negate = self.negate;
        let locator = &self.locator;
        let matches = &matches;

        let outcome = poll_until(self.timeout, self.poll_interval, move || {
            let current = read.read(locator);
            async move {
                let value = current.await?;
                let hit = matches(&value);
                Ok((hit != negate, value))
            }
        })
        .await?;

        if outcome.is_matched() {
            return Ok(());
        }

        let actual = outcome.into_value();
        let message = if negate {
            format!(
                "Expected '{}' NOT {}, but it did after {:?}",
                selector, describe, self.timeout
            )
        } else {
            format!(
                "Expected '{}' {}, but was {:?} after {:?}",
                selector, describe, actual, self.timeout
            )
        };
        tracing::debug!(%selector, "{}", message);
        Err(Error::AssertionTimeout(message))
    }

    /// Asserts that the element is visible.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-visible>
    pub async fn to_be_visible(self) -> Result<()> {
        self.retry("to be visible", Visible, |v: &bool| *v).await
    }

    /// Asserts that the element is hidden (absent or not visible).
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-hidden>
    pub async fn to_be_hidden(self) -> Result<()> {
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_visible().await
    }

    /// Asserts that the element has the specified text (exact match, trimmed).
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-text>
    pub async fn to_have_text(self, expected: &str) -> Result<()> {
        let expected = expected.trim().to_string();
        let describe = format!("to have text '{}'", expected);
        self.retry(&describe, InnerText, move |actual: &String| {
            actual.trim() == expected
        })
        .await
    }

    /// Asserts that the matches have exactly these texts, in order.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-text>
    pub async fn to_have_texts(self, expected: &[&str]) -> Result<()> {
        let expected: Vec<String> = expected.iter().map(|s| s.trim().to_string()).collect();
        let describe = format!("to have texts {:?}", expected);
        self.retry(&describe, AllTexts, move |actual: &Vec<String>| {
            actual.len() == expected.len()
                && actual.iter().zip(&expected).all(|(a, e)| a.trim() == e)
        })
        .await
    }

    /// Asserts that the element's text matches the regex pattern.
    pub async fn to_have_text_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        let describe = format!("to match pattern '{}'", pattern);
        self.retry(&describe, InnerText, move |actual: &String| {
            re.is_match(actual.trim())
        })
        .await
    }

    /// Asserts that the element contains the specified text (substring match).
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-contain-text>
    pub async fn to_contain_text(self, expected: &str) -> Result<()> {
        let expected = expected.to_string();
        let describe = format!("to contain text '{}'", expected);
        self.retry(&describe, InnerText, move |actual: &String| {
            actual.contains(expected.as_str())
        })
        .await
    }

    /// Asserts that the input element has the specified value.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-value>
    pub async fn to_have_value(self, expected: &str) -> Result<()> {
        let expected = expected.to_string();
        let describe = format!("to have value '{}'", expected);
        self.retry(&describe, InputValue, move |actual: &String| *actual == expected)
            .await
    }

    /// Asserts that the input element's value matches the regex pattern.
    pub async fn to_have_value_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        let describe = format!("to have value matching '{}'", pattern);
        self.retry(&describe, InputValue, move |actual: &String| re.is_match(actual))
            .await
    }

    /// Asserts that the checkbox or radio is checked.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-checked>
    pub async fn to_be_checked(self) -> Result<()> {
        self.retry("to be checked", Checked, |v: &bool| *v).await
    }

    /// Asserts that the checkbox or radio is unchecked.
    pub async fn to_be_unchecked(self) -> Result<()> {
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_checked().await
    }

    /// Asserts that the element has the attribute with the given value.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-attribute>
    pub async fn to_have_attribute(self, name: &str, expected: &str) -> Result<()> {
        let expected = expected.to_string();
        let describe = format!("to have attribute {}='{}'", name, expected);
        self.retry(
            &describe,
            Attribute(name.to_string()),
            move |actual: &Option<String>| actual.as_deref() == Some(expected.as_str()),
        )
        .await
    }

    /// Asserts that the element's computed CSS property has the given value.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-css>
    pub async fn to_have_css(self, property: &str, expected: &str) -> Result<()> {
        let expected = expected.to_string();
        let describe = format!("to have CSS {}: {}", property, expected);
        self.retry(&describe, Css(property.to_string()), move |actual: &String| {
            *actual == expected
        })
        .await
    }

    /// Asserts the number of matching elements.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-count>
    pub async fn to_have_count(self, expected: usize) -> Result<()> {
        let describe = format!("to have count {}", expected);
        self.retry(&describe, Count, move |actual: &usize| *actual == expected)
            .await
    }
}

fn compile(pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern).map_err(|e| Error::InvalidArgument(format!("Invalid regex: {}", e)))
}

// Readers turn a locator into a boxed future of the value under test. They
// exist so one retry loop can serve every matcher without naming the
// locator's future types.
type ReadFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = Result<T>> + Send + 'a>>;

trait AsyncReader<L, T> {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, T>;
}

struct Visible;
struct Checked;
struct InnerText;
struct AllTexts;
struct InputValue;
struct Count;
struct Attribute(String);
struct Css(String);

impl<L: ElementLocator> AsyncReader<L, bool> for Visible {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, bool> {
        locator.is_visible()
    }
}

impl<L: ElementLocator> AsyncReader<L, bool> for Checked {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, bool> {
        locator.is_checked()
    }
}

impl<L: ElementLocator> AsyncReader<L, String> for InnerText {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, String> {
        locator.inner_text()
    }
}

impl<L: ElementLocator> AsyncReader<L, Vec<String>> for AllTexts {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, Vec<String>> {
        locator.all_text_contents()
    }
}

impl<L: ElementLocator> AsyncReader<L, String> for InputValue {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, String> {
        locator.input_value()
    }
}

impl<L: ElementLocator> AsyncReader<L, usize> for Count {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, usize> {
        locator.count()
    }
}

impl<L: ElementLocator> AsyncReader<L, Option<String>> for Attribute {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, Option<String>> {
        let name = self.0.clone();
        Box::pin(async move { locator.get_attribute(&name).await })
    }
}

impl<L: ElementLocator> AsyncReader<L, String> for Css {
    fn read<'a>(&mut self, locator: &'a L) -> ReadFuture<'a, String> {
        let property = self.0.clone();
        Box::pin(async move { locator.css_value(&property).await })
    }
}

/// Immediate assertion: fails unless `actual == expected`.
pub fn verify_eq<A, E>(subject: &str, actual: A, expected: E) -> Result<()>
where
    A: PartialEq<E> + Debug,
    E: Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(Error::AssertionMismatch {
            subject: subject.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Immediate assertion: fails unless some item of `items` equals `expected`.
pub fn verify_contains<S: AsRef<str>>(subject: &str, items: &[S], expected: &str) -> Result<()> {
    if items.iter().any(|item| item.as_ref() == expected) {
        Ok(())
    } else {
        Err(Error::AssertionMismatch {
            subject: subject.to_string(),
            expected: format!("an item equal to {:?}", expected),
            actual: format!(
                "{:?}",
                items.iter().map(|i| i.as_ref()).collect::<Vec<_>>()
            ),
        })
    }
}

/// Immediate assertion: fails unless `condition` holds.
pub fn verify(subject: &str, condition: bool) -> Result<()> {
    verify_eq(subject, condition, true)
}

/// Collects assertion failures without stopping the test.
///
/// ```ignore
/// let soft = SoftAssertions::new();
/// soft.check(expect(button.clone()).to_have_text("Submit123").await);
/// button.click(None).await?;   // still runs
/// soft.finish()?;               // fails here, listing every recorded failure
/// ```
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Mutex<Vec<Error>>,
}

impl SoftAssertions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `result` if it is a failure. Returns whether it passed.
    pub fn check(&self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Soft assertion failed");
                self.failures.lock().push(err);
                false
            }
        }
    }

    /// Number of failures recorded so far.
    pub fn failure_count(&self) -> usize {
        self.failures.lock().len()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Ends the soft block: `Ok` when nothing failed, otherwise every
    /// recorded failure in order.
    pub fn finish(self) -> Result<()> {
        let failures = self.failures.into_inner();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::SoftAssertions(failures))
        }
    }
}
