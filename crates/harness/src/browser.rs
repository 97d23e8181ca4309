//! WebDriver session wrapper.
//!
//! One session per test, created from [`SuiteConfig`] and torn down with
//! [`BrowserSession::quit`]. Element and state helpers are all built on the
//! condition poller in [`crate::wait`], with element-not-found treated as
//! transient under the tolerant policy.

use std::fmt;

use serde_json::Value;
use thirtyfour::prelude::*;
use tracing::{debug, info};

use crate::config::SuiteConfig;
use crate::error::Result;
use crate::wait::{self, Poll};

pub struct BrowserSession {
    driver: WebDriver,
    config: SuiteConfig,
}

impl BrowserSession {
    /// Opens a fresh Chrome session against the configured WebDriver
    /// endpoint.
    pub async fn open(config: SuiteConfig) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_arg("--headless=new")?;
            caps.add_arg("--disable-gpu")?;
        }
        let (width, height) = config.window_size;
        caps.add_arg(&format!("--window-size={width},{height}"))?;

        info!(
            target = "rly.browser",
            webdriver = %config.webdriver_url,
            headless = config.headless,
            "starting browser session"
        );
        let driver = WebDriver::new(&config.webdriver_url, caps).await?;
        driver.set_page_load_timeout(config.page_load_timeout).await?;

        Ok(Self { driver, config })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Navigates to a path on the frontend under test.
    pub async fn goto(&self, path: &str) -> Result<()> {
        let url = self.config.url_for(path);
        debug!(target = "rly.browser", %url, "navigate");
        self.driver.goto(&url).await?;
        Ok(())
    }

    /// Path component of the current URL, e.g. `/login`.
    pub async fn current_path(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.path().to_string())
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.driver.title().await?)
    }

    /// Full rendered page text, empty before the body exists.
    pub async fn body_text(&self) -> Result<String> {
        let text = self
            .execute_json("return document.body ? document.body.innerText : '';", Vec::new())
            .await?;
        Ok(text.as_str().unwrap_or_default().to_string())
    }

    /// Whether the document has finished (or nearly finished) loading.
    pub async fn document_ready(&self) -> Result<bool> {
        let state = self
            .execute_json("return document.readyState;", Vec::new())
            .await?;
        Ok(matches!(state.as_str(), Some("complete") | Some("interactive")))
    }

    /// Runs a script in the page and returns its JSON result.
    pub async fn execute_json(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.driver.execute(script, args).await?.json().clone())
    }

    /// Waits for an element matching the CSS selector to exist.
    pub async fn wait_for_element(&self, css: &str) -> Result<WebElement> {
        self.wait_for_located(By::Css(css), &format!("element '{css}'"))
            .await
    }

    /// Waits for an element matching an arbitrary locator to exist.
    pub async fn wait_for_located(&self, by: By, what: &str) -> Result<WebElement> {
        let by = &by;
        wait::wait_until(
            || async move { Ok(Poll::Ready(self.driver.find(by.clone()).await?)) },
            self.config.policy(),
            what,
        )
        .await
    }

    /// Waits for a located element to be displayed and enabled, scrolled
    /// into view so a click lands on it.
    pub async fn wait_for_clickable(&self, by: By, what: &str) -> Result<WebElement> {
        let by = &by;
        wait::wait_until(
            || async move {
                let element = self.driver.find(by.clone()).await?;
                if element.is_displayed().await? && element.is_enabled().await? {
                    element.scroll_into_view().await?;
                    Ok(Poll::Ready(element))
                } else {
                    Ok(Poll::Pending)
                }
            },
            self.config.policy(),
            what,
        )
        .await
    }

    /// Clicks a button by its visible text. The admin pages carry no stable
    /// ids on their buttons, so they are addressed by normalized text; label
    /// variants cover buttons whose text changes while pending.
    pub async fn click_button(&self, labels: &[&str]) -> Result<()> {
        let button = self
            .wait_for_clickable(
                By::XPath(text_xpath("//button", labels)),
                &format!("button '{}'", labels.join("' or '")),
            )
            .await?;
        button.click().await?;
        Ok(())
    }

    /// Clicks a tab (or tab-like button) by its visible text.
    pub async fn click_tab(&self, label: &str) -> Result<()> {
        let xpath = format!(
            "//*[(self::button or @role='tab') and normalize-space(.)='{label}']"
        );
        let tab = self
            .wait_for_clickable(By::XPath(xpath), &format!("tab '{label}'"))
            .await?;
        tab.click().await?;
        Ok(())
    }

    /// Waits for a dialog whose content carries the given title text.
    pub async fn wait_for_dialog(&self, title: &str) -> Result<()> {
        let xpath = format!("//div[@role='dialog']//*[normalize-space(.)='{title}']");
        self.wait_for_located(By::XPath(xpath), &format!("dialog '{title}'"))
            .await?;
        Ok(())
    }

    /// Clicks a button inside the open dialog by its visible text.
    pub async fn click_dialog_button(&self, labels: &[&str]) -> Result<()> {
        let button = self
            .wait_for_clickable(
                By::XPath(text_xpath("//div[@role='dialog']//button", labels)),
                &format!("dialog button '{}'", labels.join("' or '")),
            )
            .await?;
        button.click().await?;
        Ok(())
    }

    /// Waits for the dialog with the given title to be gone.
    pub async fn wait_for_dialog_closed(&self, title: &str) -> Result<()> {
        let xpath = format!("//div[@role='dialog']//*[normalize-space(.)='{title}']");
        let xpath = &xpath;
        wait::wait_for(
            || async move {
                Ok(self
                    .driver
                    .find_all(By::XPath(xpath.clone()))
                    .await?
                    .is_empty())
            },
            self.config.policy(),
            &format!("dialog '{title}' closed"),
        )
        .await
    }

    /// Waits for an element matching the CSS selector to be displayed.
    pub async fn wait_for_visible(&self, css: &str) -> Result<WebElement> {
        wait::wait_until(
            || async move {
                let element = self.driver.find(By::Css(css)).await?;
                Ok(if element.is_displayed().await? {
                    Poll::Ready(element)
                } else {
                    Poll::Pending
                })
            },
            self.config.policy(),
            &format!("visible element '{css}'"),
        )
        .await
    }

    /// Waits for the page text to contain `needle`.
    pub async fn wait_for_text(&self, needle: &str) -> Result<()> {
        wait::wait_for(
            || async move { Ok(self.body_text().await?.contains(needle)) },
            self.config.policy(),
            &format!("page text containing '{needle}'"),
        )
        .await
    }

    /// Clears and types into the input matching the CSS selector.
    pub async fn fill(&self, css: &str, value: &str) -> Result<()> {
        let input = self.wait_for_visible(css).await?;
        input.clear().await?;
        input.send_keys(value).await?;
        Ok(())
    }

    /// Clicks the first visible element matching the CSS selector.
    pub async fn click(&self, css: &str) -> Result<()> {
        let element = self.wait_for_visible(css).await?;
        element.click().await?;
        Ok(())
    }

    /// Clicks the form-scoped submit button, as the frontend renders one
    /// form per auth page.
    pub async fn submit_form(&self) -> Result<()> {
        let form = self.wait_for_element("form").await?;
        let button = form.find(By::Css("button[type='submit']")).await?;
        button.click().await?;
        Ok(())
    }

    /// Best-effort snapshot of observable page state, for timeout
    /// diagnostics. Never fails; unavailable fields are marked as such.
    pub async fn snapshot(&self) -> DiagnosticSnapshot {
        let url = match self.driver.current_url().await {
            Ok(url) => url.to_string(),
            Err(_) => "<unavailable>".to_string(),
        };
        let title = self
            .driver
            .title()
            .await
            .unwrap_or_else(|_| "<unavailable>".to_string());
        let body = self.body_text().await.unwrap_or_default();

        DiagnosticSnapshot {
            url,
            title,
            body_snippet: truncate(&body, SNIPPET_LIMIT),
        }
    }

    pub async fn quit(self) -> Result<()> {
        debug!(target = "rly.browser", "closing browser session");
        self.driver.quit().await?;
        Ok(())
    }
}

const SNIPPET_LIMIT: usize = 500;

/// Observable page state captured when a wait times out.
#[derive(Debug, Clone)]
pub struct DiagnosticSnapshot {
    pub url: String,
    pub title: String,
    pub body_snippet: String,
}

impl fmt::Display for DiagnosticSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "url:   {}", self.url)?;
        writeln!(f, "title: {}", self.title)?;
        write!(f, "body:  {}", self.body_snippet)
    }
}

// Matches any of the labels by normalized visible text. Labels are suite
// constants; none contain XPath quote characters.
fn text_xpath(prefix: &str, labels: &[&str]) -> String {
    let clauses: Vec<String> = labels
        .iter()
        .map(|label| format!("normalize-space(.)='{label}'"))
        .collect();
    format!("{prefix}[{}]", clauses.join(" or "))
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}…")
    }
}
