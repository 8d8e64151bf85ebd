use crate::url::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Main configuration structure for the harvester
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub selectors: ExtractionProfile,
}

impl Config {
    /// Returns the host cookies are scoped to
    ///
    /// Falls back to the host of the base URL when no domain is configured.
    pub fn cookie_domain(&self) -> String {
        if let Some(domain) = &self.harvest.cookie_domain {
            return domain.clone();
        }

        ::url::Url::parse(&self.harvest.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Crawl loop behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HarvestConfig {
    /// Site origin every topic is resolved against
    pub base_url: String,

    /// Where the JSON array of entries is written
    pub output_path: String,

    /// Maximum number of pages to visit; zero or unset means unbounded
    pub max_pages: Option<u32>,

    /// Pause before each navigation after the first (milliseconds)
    pub delay_ms: u64,

    /// Pause between the first navigation and reading its markup (milliseconds)
    pub settle_ms: u64,

    /// Domain injected cookies are scoped to
    pub cookie_domain: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_path: "entries.json".to_string(),
            max_pages: None,
            delay_ms: 1200,
            settle_ms: 800,
            cookie_domain: None,
        }
    }
}

/// Rendering configuration shared by the HTTP and browser renderers
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Render through a Chromium instance instead of plain HTTP
    pub enabled: bool,

    /// Hide the browser window
    pub headless: bool,

    /// User agent sent with every request
    pub user_agent: String,

    /// Value of the Accept-Language header
    pub locale: String,

    /// Browser window width in pixels
    pub window_width: u32,

    /// Browser window height in pixels
    pub window_height: u32,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "browser"),
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            locale: "tr-TR".to_string(),
            window_width: 1366,
            window_height: 800,
            timeout_secs: 30,
        }
    }
}

/// Ordered CSS selector alternatives used to find entries and pagination
///
/// Within each list the first selector that matches anything wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionProfile {
    /// Selectors for entry containers
    pub containers: Vec<String>,

    /// Attribute on the container holding the entry identity
    pub id_attribute: String,

    /// Selectors for the author link
    pub author: Vec<String>,

    /// Selectors for the date link, which also carries the permalink
    pub date: Vec<String>,

    /// Selectors for the entry body
    pub content: Vec<String>,

    /// Selectors for the next-page link
    pub next_page: Vec<String>,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            containers: owned(&["li[data-id]", "li[class*=stream-item]"]),
            id_attribute: "data-id".to_string(),
            author: owned(&["a.entry-author", "a[data-author]"]),
            date: owned(&["a.entry-date", "a.permalink"]),
            content: owned(&[".content", ".entry-content"]),
            next_page: owned(&["a[rel=\"next\"]", "div.pager a.next"]),
        }
    }
}
