//! Chromium-backed page renderer
//!
//! Launches a Chromium instance through the DevTools protocol so that entries
//! populated by client-side script are present in the markup we read.

use crate::config::BrowserConfig;
use crate::crawler::fetcher::{PageFetcher, SessionCookie};
use crate::url::PageAddress;
use crate::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Renders pages in a single Chromium tab
pub struct BrowserFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
}

impl BrowserFetcher {
    /// Launches Chromium and opens a blank tab
    pub async fn launch(config: &BrowserConfig) -> Result<Self, FetchError> {
        Self::try_launch(config)
            .await
            .map_err(|e| FetchError::Browser(format!("{:#}", e)))
    }

    async fn try_launch(config: &BrowserConfig) -> anyhow::Result<Self> {
        let mut builder = ChromeConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(Duration::from_secs(config.timeout_secs))
            .arg(format!("--lang={}", config.locale))
            .arg("--disable-blink-features=AutomationControlled");
        if !config.headless {
            builder = builder.with_head();
        }
        let chrome_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        tracing::info!(
            "Launching browser (headless: {}, window {}x{})",
            config.headless,
            config.window_width,
            config.window_height
        );
        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .context("Failed to launch browser")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;
        page.set_user_agent(config.user_agent.as_str())
            .await
            .context("Failed to set user agent")?;

        Ok(Self {
            browser,
            handler,
            page,
        })
    }
}

fn browser_error(context: &str, error: impl std::fmt::Display) -> FetchError {
    FetchError::Browser(format!("{}: {}", context, error))
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn inject_cookies(&mut self, cookies: &[SessionCookie]) -> Result<(), FetchError> {
        let params = cookies
            .iter()
            .map(|cookie| {
                CookieParam::builder()
                    .name(cookie.name.clone())
                    .value(cookie.value.clone())
                    .domain(cookie.domain.clone())
                    .path(cookie.path.clone())
                    .build()
                    .map_err(|e| FetchError::Cookie(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.page
            .set_cookies(params)
            .await
            .map_err(|e| browser_error("Failed to add cookies", e))?;
        Ok(())
    }

    async fn navigate(
        &mut self,
        address: &PageAddress,
        referer: &str,
    ) -> Result<String, FetchError> {
        let params = NavigateParams::builder()
            .url(address.as_str())
            .referrer(referer)
            .build()
            .map_err(|e| browser_error("Invalid navigation", e))?;

        self.page
            .goto(params)
            .await
            .map_err(|e| browser_error(&format!("Failed to navigate to {}", address), e))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| browser_error(&format!("Failed to load {}", address), e))?;

        self.render(address).await
    }

    async fn render(&mut self, address: &PageAddress) -> Result<String, FetchError> {
        self.page
            .content()
            .await
            .map_err(|e| browser_error(&format!("Failed to read {}", address), e))
    }

    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
    }
}

impl Drop for BrowserFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
