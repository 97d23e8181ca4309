//! Shared fixtures for the E2E tests.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use rly::{BrowserSession, SuiteConfig};

pub struct TestEnv {
    pub config: SuiteConfig,
    pub session: BrowserSession,
}

impl TestEnv {
    /// Opens a fresh browser session for one test.
    ///
    /// Returns `None` when the environment provides no WebDriver endpoint
    /// (plain `cargo test` without a browser stack), so callers skip with
    /// `let Some(env) = TestEnv::setup().await else { return };`.
    pub async fn setup() -> Option<TestEnv> {
        rly::logging::init_logging(0);

        if !SuiteConfig::is_enabled() {
            eprintln!("skipping E2E test: E2E_WEBDRIVER_URL not set");
            return None;
        }

        let config = SuiteConfig::from_env().expect("suite configuration should be valid");
        let session = BrowserSession::open(config.clone())
            .await
            .expect("webdriver session should start");

        Some(TestEnv { config, session })
    }

    /// Runs one test body against a fresh environment, closing the browser
    /// session afterwards no matter how the body exits. A panicking
    /// assertion must not leak a live WebDriver session.
    pub async fn run<F>(test: F)
    where
        F: AsyncFnOnce(&TestEnv),
    {
        let Some(env) = TestEnv::setup().await else { return };
        guarded(env, test, |env| async move {
            if let Err(err) = env.session.quit().await {
                eprintln!("failed to close browser session: {err}");
            }
        })
        .await;
    }

    /// Fails the test with a message and the current page state.
    pub async fn fail_with_snapshot(&self, message: &str) {
        let snapshot = self.session.snapshot().await;
        panic!("{message}\n--- page state ---\n{snapshot}");
    }
}

// Runs the body, always awaits the teardown, then rethrows any body panic.
async fn guarded<E, F, C, Fut>(env: E, body: F, teardown: C)
where
    F: AsyncFnOnce(&E),
    C: FnOnce(E) -> Fut,
    Fut: Future<Output = ()>,
{
    let outcome = AssertUnwindSafe(body(&env)).catch_unwind().await;
    teardown(env).await;
    if let Err(payload) = outcome {
        std::panic::resume_unwind(payload);
    }
}
