//! Environment-driven configuration for a suite run.
//!
//! Mirrors the knobs the suite has always taken from the environment:
//! `E2E_BASE_URL` for the frontend under test, `E2E_WEBDRIVER_URL` for the
//! chromedriver endpoint, `E2E_HEADLESS` to run headful locally.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::wait::{DEFAULT_INTERVAL, PollPolicy};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_WINDOW: (u32, u32) = (1280, 800);

const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(25);
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Base URL of the frontend under test.
    pub base_url: String,
    /// WebDriver endpoint (chromedriver).
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub page_load_timeout: Duration,
    /// Default budget for element/state waits.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl SuiteConfig {
    /// Reads configuration from the environment, validating URLs.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("E2E_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let webdriver_url =
            env::var("E2E_WEBDRIVER_URL").unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string());

        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid E2E_BASE_URL '{base_url}': {e}")))?;
        Url::parse(&webdriver_url).map_err(|e| {
            Error::Config(format!("invalid E2E_WEBDRIVER_URL '{webdriver_url}': {e}"))
        })?;

        let headless = env::var("E2E_HEADLESS").map_or(true, |v| parse_bool(&v));
        let window_size = env::var("E2E_WINDOW")
            .ok()
            .and_then(|v| parse_window(&v))
            .unwrap_or(DEFAULT_WINDOW);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            webdriver_url,
            headless,
            window_size,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_INTERVAL,
        })
    }

    /// Whether the environment provides a browser stack at all.
    ///
    /// The suite opts in through `E2E_WEBDRIVER_URL`; without it the E2E
    /// tests skip instead of failing on an unreachable driver.
    pub fn is_enabled() -> bool {
        env::var("E2E_WEBDRIVER_URL").is_ok()
    }

    /// Absolute URL for a path on the frontend under test.
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            return format!("{}/", self.base_url);
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Default polling policy for this run.
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.wait_timeout, self.poll_interval)
    }
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_window(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
