//! Environment checks run before a suite invocation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use rly::SuiteConfig;
use tracing::info;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Verifies the frontend and the WebDriver endpoint answer, so a failing
/// test run can be told apart from a missing environment.
pub async fn run() -> Result<()> {
    let config = SuiteConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(CHECK_TIMEOUT)
        .build()
        .context("building http client")?;

    let frontend_ok = check_frontend(&client, &config).await;
    let webdriver_ok = check_webdriver(&client, &config).await;

    if !(frontend_ok && webdriver_ok) {
        bail!("environment is not ready for an E2E run");
    }
    println!("environment ready: frontend and webdriver both answer");
    Ok(())
}

async fn check_frontend(client: &reqwest::Client, config: &SuiteConfig) -> bool {
    match client.get(config.url_for("/")).send().await {
        Ok(response) => {
            let ok = response.status().is_success();
            report("frontend", &config.base_url, ok, None);
            ok
        }
        Err(err) => {
            report("frontend", &config.base_url, false, Some(&err.to_string()));
            false
        }
    }
}

async fn check_webdriver(client: &reqwest::Client, config: &SuiteConfig) -> bool {
    let status_url = format!("{}/status", config.webdriver_url.trim_end_matches('/'));
    match client.get(&status_url).send().await {
        Ok(response) => {
            let ready = response
                .json::<serde_json::Value>()
                .await
                .map(|status| status["value"]["ready"] == true)
                .unwrap_or(false);
            report("webdriver", &config.webdriver_url, ready, None);
            ready
        }
        Err(err) => {
            report("webdriver", &config.webdriver_url, false, Some(&err.to_string()));
            false
        }
    }
}

fn report(what: &str, endpoint: &str, ok: bool, detail: Option<&str>) {
    info!(target = "rly", what, %endpoint, ok, "doctor check");
    match (ok, detail) {
        (true, _) => println!("ok:   {what} at {endpoint}"),
        (false, Some(detail)) => println!("FAIL: {what} at {endpoint} ({detail})"),
        (false, None) => println!("FAIL: {what} at {endpoint}"),
    }
}

/// Prints the configuration a test run would use.
pub fn print_config() -> Result<()> {
    let config = SuiteConfig::from_env()?;
    println!("base_url:          {}", config.base_url);
    println!("webdriver_url:     {}", config.webdriver_url);
    println!("headless:          {}", config.headless);
    println!(
        "window_size:       {}x{}",
        config.window_size.0, config.window_size.1
    );
    println!("page_load_timeout: {:?}", config.page_load_timeout);
    println!("wait_timeout:      {:?}", config.wait_timeout);
    println!("poll_interval:     {:?}", config.poll_interval);
    println!("enabled:           {}", SuiteConfig::is_enabled());
    Ok(())
}
