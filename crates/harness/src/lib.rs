// rly: harness for the Resourcely end-to-end UI suite.
//
// The core is the condition poller in `wait`; everything else is glue
// between it and the browser: session management, the persisted auth
// record, and in-page call instrumentation.

pub mod auth;
pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod spy;
pub mod wait;

pub use browser::{BrowserSession, DiagnosticSnapshot};
pub use config::SuiteConfig;
pub use error::{Error, Result};
pub use wait::{Poll, PollPolicy, Recovery, wait_for, wait_until, wait_until_any, wait_with_fallback};
