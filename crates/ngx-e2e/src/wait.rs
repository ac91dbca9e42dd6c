// Polling and time budgets
//
// `poll_until` is the single retry loop behind auto-retrying assertions and
// condition waits. `TestTimeouts` carries the per-test budget the original
// suites tune with `test.slow()` and `testInfo.setTimeout()`.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default polling interval for retrying reads (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default budget for a whole test (30 seconds, matching Playwright Test)
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Multiplier applied by [`TestTimeouts::slow`]
pub const SLOW_MULTIPLIER: u32 = 3;

/// Result of a polling loop: the last observed value and whether it matched.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The probe reported a match
    Matched(T),
    /// The timeout elapsed; holds the last observed value
    TimedOut(T),
}

impl<T> PollOutcome<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, PollOutcome::Matched(_))
    }

    pub fn into_value(self) -> T {
        match self {
            PollOutcome::Matched(v) | PollOutcome::TimedOut(v) => v,
        }
    }
}

/// Runs `probe` until it reports a match or `timeout` elapses.
///
/// The probe is always called at least once, even with a zero timeout.
/// Probe errors abort the loop immediately.
pub async fn poll_until<T, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<PollOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(bool, T)>>,
{
    let start = Instant::now();

    loop {
        let (matched, value) = probe().await?;

        if matched {
            return Ok(PollOutcome::Matched(value));
        }

        if start.elapsed() >= timeout {
            return Ok(PollOutcome::TimedOut(value));
        }

        tokio::time::sleep(interval).await;
    }
}

/// Time budget for one test.
///
/// ```ignore
/// let mut timeouts = TestTimeouts::from_config(&config);
/// timeouts.slow();
/// timeouts.run("Timeouts", async { /* steps */ Ok(()) }).await?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestTimeouts {
    budget: Duration,
}

impl Default for TestTimeouts {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_TIMEOUT)
    }
}

impl TestTimeouts {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Budget taken from `E2eConfig::test_timeout`.
    pub fn from_config(config: &crate::config::E2eConfig) -> Self {
        Self::new(config.test_timeout())
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Replaces the budget.
    pub fn set(&mut self, budget: Duration) -> &mut Self {
        self.budget = budget;
        self
    }

    /// Adds `extra` on top of the current budget.
    pub fn extend(&mut self, extra: Duration) -> &mut Self {
        self.budget += extra;
        self
    }

    /// Marks the test as slow, tripling its budget.
    pub fn slow(&mut self) -> &mut Self {
        self.budget *= SLOW_MULTIPLIER;
        self
    }

    /// Runs the test body, failing with [`Error::TestTimeout`] once the
    /// budget is exhausted.
    pub async fn run<T, Fut>(&self, name: &str, body: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.budget, body).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(test = name, budget = ?self.budget, "Test timed out");
                Err(Error::TestTimeout {
                    name: name.to_string(),
                    budget: self.budget,
                })
            }
        }
    }
}
