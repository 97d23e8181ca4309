//! Scoped in-page call instrumentation.
//!
//! A [`CallSpy`] wraps `window.fetch` with a counter for calls whose URL
//! contains a pattern. Installing a spy resets its counter, so every test
//! owns its instrumentation state explicitly; nothing survives navigation
//! or leaks between tests. Reading the counter is side-effect free, which
//! lets waits poll it.

use serde_json::json;
use tracing::debug;

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::wait::{self, Poll, PollPolicy};

const INSTALL_SNIPPET: &str = r#"
(function (slot, pattern) {
    window.__rlySpyCounts = window.__rlySpyCounts || {};
    window.__rlySpyPatterns = window.__rlySpyPatterns || {};
    window.__rlySpyCounts[slot] = 0;
    window.__rlySpyPatterns[slot] = pattern;
    if (!window.__rlySpyInstalled) {
        window.__rlySpyInstalled = true;
        var original = window.fetch.bind(window);
        window.fetch = function (input, init) {
            var url = typeof input === 'string' ? input : (input && input.url) || '';
            for (var key in window.__rlySpyPatterns) {
                if (url.indexOf(window.__rlySpyPatterns[key]) !== -1) {
                    window.__rlySpyCounts[key] += 1;
                }
            }
            return original(input, init);
        };
    }
})(arguments[0], arguments[1]);
"#;

/// Counts in-page `fetch` calls whose URL contains a pattern.
pub struct CallSpy {
    slot: String,
    pattern: String,
}

impl CallSpy {
    /// Installs (or re-installs, resetting the count) a spy on the current
    /// page. Must run after navigation; the wrapper does not survive a
    /// page load.
    pub async fn install(session: &BrowserSession, name: &str, url_pattern: &str) -> Result<Self> {
        session
            .execute_json(INSTALL_SNIPPET, vec![json!(name), json!(url_pattern)])
            .await?;
        debug!(target = "rly.spy", spy = name, pattern = url_pattern, "spy installed");
        Ok(Self {
            slot: name.to_string(),
            pattern: url_pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of matching calls observed since installation.
    pub async fn calls(&self, session: &BrowserSession) -> Result<u64> {
        let count = session
            .execute_json(
                "return (window.__rlySpyCounts || {})[arguments[0]] || 0;",
                vec![json!(self.slot)],
            )
            .await?;
        Ok(count.as_u64().unwrap_or(0))
    }

    /// Waits until at least one matching call has fired, returning the
    /// count observed at that point.
    pub async fn wait_for_call(
        &self,
        session: &BrowserSession,
        policy: PollPolicy,
    ) -> Result<u64> {
        wait::wait_until(
            || async move {
                let count = self.calls(session).await?;
                Ok(if count > 0 {
                    Poll::Ready(count)
                } else {
                    Poll::Pending
                })
            },
            policy,
            &format!("fetch call matching '{}'", self.pattern),
        )
        .await
    }
}
