use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The only error the poller raises itself: the condition never became
    /// true within budget.
    #[error("timed out waiting for {condition} after {elapsed:?} (budget {timeout:?})")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
        elapsed: Duration,
        /// Last probe error seen while polling under a tolerant policy.
        last_error: Option<String>,
    },

    #[error("webdriver: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("config: {0}")]
    Config(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
