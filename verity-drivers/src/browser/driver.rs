use crate::browser::args::build_browser_arguments;
use anyhow::{Context, Result};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

/// Settings for opening one browser session.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// WebDriver endpoint, e.g. `http://localhost:9515` for chromedriver.
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    /// Page-load timeout handed to the browser itself.
    pub page_load_timeout: Duration,
}

/// Thin wrapper around a `fantoccini` WebDriver client. Each value owns one
/// browser session; call [`VerityDriver::close`] to release it.
pub struct VerityDriver {
    client: Client,
}

impl VerityDriver {
    /// Start a new session on the WebDriver service named in `opts`.
    pub async fn connect(opts: &DriverOptions) -> Result<Self> {
        let mut caps = Capabilities::new();
        let args = build_browser_arguments(&opts.user_agent, opts.headless);
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&opts.webdriver_url)
            .await
            .with_context(|| format!("failed to open WebDriver session at {}", opts.webdriver_url))?;

        let driver = Self { client };
        let timeouts = TimeoutConfiguration::new(None, Some(opts.page_load_timeout), None);
        if let Err(e) = driver.client.update_timeouts(timeouts).await {
            tracing::debug!(
                target: "browser.driver",
                error = %e,
                "page-load timeout not accepted by driver"
            );
        }

        tracing::debug!(
            target: "browser.driver",
            webdriver = %opts.webdriver_url,
            headless = opts.headless,
            "session opened"
        );
        Ok(driver)
    }

    /// Navigate to `url` and return the rendered DOM as HTML.
    pub async fn render(&self, url: &str) -> Result<String> {
        self.client
            .goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))?;
        self.client
            .source()
            .await
            .context("reading page source failed")
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        tracing::debug!(target: "browser.driver", "session closed");
        Ok(())
    }
}
