// Condition polling - bounded retry-until-true for external UI state
//
// Every test in the suite waits on externally driven state: an element
// appearing, a route change, the persisted auth record, a spied network
// call. The browser offers no change notification to the test process, so
// all of those reduce to one primitive: evaluate a read-only probe until it
// reports ready or a wall-clock budget runs out.

use std::future::Future;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default timeout for waits (10 seconds, matching the suite's historical budget)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default polling interval (300ms)
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);

/// Outcome of a single probe evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<T> {
    /// The condition holds; carries the satisfying value.
    Ready(T),
    /// Not yet; the poller re-evaluates after the poll interval.
    Pending,
}

impl<T> Poll<T> {
    /// Returns the satisfying value, or `None` when pending.
    pub fn ready(self) -> Option<T> {
        match self {
            Poll::Ready(value) => Some(value),
            Poll::Pending => None,
        }
    }
}

/// Per-invocation polling configuration.
///
/// A policy lives for exactly one wait call; nothing carries over between
/// invocations.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Maximum wall-clock time to keep polling. Must be non-zero.
    pub timeout: Duration,
    /// Fixed delay between probe evaluations. No backoff: the browser has
    /// bounded, low-variance latency per check.
    pub interval: Duration,
    /// Treat probe errors as "not yet" instead of aborting the wait.
    /// DOM queries racing a render are expected to fail transiently.
    pub tolerate_errors: bool,
}

impl PollPolicy {
    /// Creates a policy with the given timeout and interval.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero; a zero budget can never observe anything.
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        assert!(!timeout.is_zero(), "poll timeout must be non-zero");
        Self {
            timeout,
            interval,
            tolerate_errors: true,
        }
    }

    /// Policy with a custom timeout and the default interval.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_INTERVAL)
    }

    /// Propagate probe errors immediately instead of retrying them.
    pub fn strict(mut self) -> Self {
        self.tolerate_errors = false;
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_INTERVAL)
    }
}

/// Polls `probe` until it reports [`Poll::Ready`] or the policy's timeout
/// elapses.
///
/// The probe must be read-only with respect to the state it reports on:
/// re-evaluating it must not change what subsequent evaluations observe.
/// The first `Ready` value is returned immediately, with no trailing delay.
/// On timeout the error carries the condition description, the configured
/// budget, the elapsed time, and the last probe error seen while tolerating
/// errors - callers are expected to dump a diagnostic snapshot before
/// failing the test.
///
/// Evaluations are strictly sequential; the only suspension point is the
/// sleep between polls. Overrun past the budget is bounded by one interval.
pub async fn wait_until<T, F, Fut>(probe: F, policy: PollPolicy, what: &str) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Poll<T>>>,
{
    let start = Instant::now();
    let mut last_error: Option<String> = None;

    loop {
        match probe().await {
            Ok(Poll::Ready(value)) => {
                debug!(target = "rly.wait", condition = what, elapsed = ?start.elapsed(), "condition satisfied");
                return Ok(value);
            }
            Ok(Poll::Pending) => {}
            Err(err) if policy.tolerate_errors => {
                last_error = Some(err.to_string());
            }
            Err(err) => return Err(err),
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            warn!(
                target = "rly.wait",
                condition = what,
                timeout = ?policy.timeout,
                last_error = ?last_error,
                "condition never satisfied"
            );
            return Err(Error::WaitTimeout {
                condition: what.to_string(),
                timeout: policy.timeout,
                elapsed,
                last_error,
            });
        }

        tokio::time::sleep(policy.interval).await;
    }
}

/// Boolean convenience wrapper over [`wait_until`].
pub async fn wait_for<F, Fut>(predicate: F, policy: PollPolicy, what: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    wait_until(
        || {
            let check = predicate();
            async move {
                Ok(if check.await? {
                    Poll::Ready(())
                } else {
                    Poll::Pending
                })
            }
        },
        policy,
        what,
    )
    .await
}

/// A boxed probe, for composing heterogeneous conditions in one wait.
pub type BoxProbe<'a, T> = Box<dyn Fn() -> BoxFuture<'a, Result<Poll<T>>> + Send + Sync + 'a>;

/// Boxes a probe closure for use with [`wait_until_any`].
pub fn probe<'a, T, F, Fut>(f: F) -> BoxProbe<'a, T>
where
    F: Fn() -> Fut + Send + Sync + 'a,
    Fut: Future<Output = Result<Poll<T>>> + Send + 'a,
{
    Box::new(move || f().boxed())
}

/// Short-circuiting OR composition: satisfied as soon as any branch is.
///
/// Branches are evaluated in order within each round, but all of them are
/// read-only so the order carries no meaning. Returns the index of the
/// satisfied branch alongside its value. Under a tolerant policy a failing
/// branch is skipped for the round; under a strict policy its error aborts
/// the wait.
pub async fn wait_until_any<T>(
    probes: &[BoxProbe<'_, T>],
    policy: PollPolicy,
    what: &str,
) -> Result<(usize, T)> {
    let tolerate = policy.tolerate_errors;
    wait_until(
        || async move {
            for (index, branch) in probes.iter().enumerate() {
                match branch().await {
                    Ok(Poll::Ready(value)) => return Ok(Poll::Ready((index, value))),
                    Ok(Poll::Pending) => {}
                    Err(_) if tolerate => {}
                    Err(err) => return Err(err),
                }
            }
            Ok(Poll::Pending)
        },
        policy,
        what,
    )
    .await
}

/// How a two-phase wait was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery<T> {
    /// The primary wait observed the condition on its own.
    Direct(T),
    /// The primary wait timed out; the corrective action ran and the
    /// bounded retry then observed the condition.
    Recovered(T),
}

impl<T> Recovery<T> {
    pub fn into_inner(self) -> T {
        match self {
            Recovery::Direct(value) | Recovery::Recovered(value) => value,
        }
    }

    pub fn was_recovered(&self) -> bool {
        matches!(self, Recovery::Recovered(_))
    }
}

/// Best-effort wait, then a deterministic fallback.
///
/// Runs a primary bounded wait; if (and only if) it times out, performs the
/// side-effecting `corrective` action once and re-waits under `retry_policy`.
/// This is never an unbounded retry loop, and the caller can see - and
/// report - whether recovery was needed. Probe errors in strict mode abort
/// without running the corrective action.
pub async fn wait_with_fallback<T, P, PFut, C, CFut>(
    probe: P,
    policy: PollPolicy,
    corrective: C,
    retry_policy: PollPolicy,
    what: &str,
) -> Result<Recovery<T>>
where
    P: Fn() -> PFut,
    PFut: Future<Output = Result<Poll<T>>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<()>>,
{
    match wait_until(&probe, policy, what).await {
        Ok(value) => Ok(Recovery::Direct(value)),
        Err(Error::WaitTimeout { .. }) => {
            warn!(
                target = "rly.wait",
                condition = what,
                "primary wait timed out; applying corrective action"
            );
            corrective().await?;
            wait_until(&probe, retry_policy, what)
                .await
                .map(Recovery::Recovered)
        }
        Err(err) => Err(err),
    }
}
