//! Page rendering collaborator
//!
//! This module defines the `PageFetcher` trait the crawl loop drives, the
//! plain HTTP implementation of it, and cookie header parsing:
//! - Building HTTP clients with the configured user agent and locale
//! - GET requests carrying the referer and injected session cookies
//! - Error classification for failed navigations

use crate::config::BrowserConfig;
use crate::url::PageAddress;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE, REFERER};
use reqwest::Client;
use std::time::Duration;

/// A cookie to be sent with every navigation to its domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl SessionCookie {
    /// Returns true if this cookie applies to the given host
    pub fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{}", domain))
    }
}

/// Splits a single-line `Cookie` header into session cookies
///
/// Pairs are separated by `;` and split on the first `=`. Pairs without `=`
/// are skipped. Every cookie is scoped to `domain` and the root path.
///
/// # Example
///
/// ```
/// use sozluk_harvester::crawler::parse_cookie_header;
///
/// let cookies = parse_cookie_header("a=1; broken; b=x=y", "eksisozluk.com");
/// assert_eq!(cookies.len(), 2);
/// assert_eq!(cookies[1].value, "x=y");
/// ```
pub fn parse_cookie_header(header: &str, domain: &str) -> Vec<SessionCookie> {
    header
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            Some(SessionCookie {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
                domain: domain.to_string(),
                path: "/".to_string(),
            })
        })
        .collect()
}

/// Renders pages for the crawl loop
///
/// Implementations keep one "current page": `navigate` loads an address,
/// `render` returns the markup of the loaded page once client-side content
/// had a chance to settle.
#[async_trait]
pub trait PageFetcher: Send {
    /// Installs session cookies for subsequent navigations
    async fn inject_cookies(&mut self, cookies: &[SessionCookie]) -> Result<(), FetchError>;

    /// Loads an address with the given referer and returns its markup
    async fn navigate(
        &mut self,
        address: &PageAddress,
        referer: &str,
    ) -> Result<String, FetchError>;

    /// Returns the current markup of an address
    async fn render(&mut self, address: &PageAddress) -> Result<String, FetchError>;

    /// Pauses for the given duration
    async fn wait(&mut self, duration: Duration);

    /// Releases any resources held by the renderer
    async fn close(&mut self) {}
}

/// Builds an HTTP client with the configured identity
///
/// # Example
///
/// ```no_run
/// use sozluk_harvester::config::BrowserConfig;
/// use sozluk_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&config.locale) {
        Ok(locale) => {
            headers.insert(ACCEPT_LANGUAGE, locale);
        }
        Err(_) => tracing::warn!("Ignoring invalid locale '{}'", config.locale),
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renders pages with plain HTTP requests
///
/// No script runs, so this only sees what the server sends in the document.
pub struct HttpFetcher {
    client: Client,
    cookies: Vec<SessionCookie>,
    loaded: Option<(PageAddress, String)>,
}

impl HttpFetcher {
    pub fn new(config: &BrowserConfig) -> Result<Self, FetchError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            cookies: Vec::new(),
            loaded: None,
        }
    }

    /// Builds the `Cookie` header value for an address, if any cookie applies
    fn cookie_header_for(&self, address: &PageAddress) -> Option<String> {
        let host = address.host()?;
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|cookie| cookie.matches_host(&host))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    async fn get(
        &self,
        address: &PageAddress,
        referer: Option<&str>,
    ) -> Result<String, FetchError> {
        let url = address.as_str();
        let mut request = self.client.get(url);

        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        if let Some(cookies) = self.cookie_header_for(address) {
            request = request.header(COOKIE, cookies);
        }

        let response = request.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn inject_cookies(&mut self, cookies: &[SessionCookie]) -> Result<(), FetchError> {
        for cookie in cookies {
            if cookie.name.is_empty() {
                return Err(FetchError::Cookie("cookie name cannot be empty".to_string()));
            }
            let pair = format!("{}={}", cookie.name, cookie.value);
            if HeaderValue::from_str(&pair).is_err() {
                return Err(FetchError::Cookie(format!(
                    "'{}' is not a valid header value",
                    cookie.name
                )));
            }
        }

        for cookie in cookies {
            self.cookies.retain(|existing| existing.name != cookie.name);
            self.cookies.push(cookie.clone());
        }

        Ok(())
    }

    async fn navigate(
        &mut self,
        address: &PageAddress,
        referer: &str,
    ) -> Result<String, FetchError> {
        tracing::debug!("GET {} (referer {})", address, referer);
        let markup = self.get(address, Some(referer)).await?;
        self.loaded = Some((address.clone(), markup.clone()));
        Ok(markup)
    }

    async fn render(&mut self, address: &PageAddress) -> Result<String, FetchError> {
        if let Some((loaded, markup)) = &self.loaded {
            if loaded == address {
                return Ok(markup.clone());
            }
        }

        let markup = self.get(address, None).await?;
        self.loaded = Some((address.clone(), markup.clone()));
        Ok(markup)
    }

    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header(" a=1 ; b = two ;c=", "eksisozluk.com");
        assert_eq!(
            cookies,
            vec![
                SessionCookie {
                    name: "a".to_string(),
                    value: "1".to_string(),
                    domain: "eksisozluk.com".to_string(),
                    path: "/".to_string(),
                },
                SessionCookie {
                    name: "b".to_string(),
                    value: "two".to_string(),
                    domain: "eksisozluk.com".to_string(),
                    path: "/".to_string(),
                },
                SessionCookie {
                    name: "c".to_string(),
                    value: String::new(),
                    domain: "eksisozluk.com".to_string(),
                    path: "/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let cookies = parse_cookie_header("novalue; ; x=1;;", "eksisozluk.com");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "x");
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let cookies = parse_cookie_header("token=abc==", "eksisozluk.com");
        assert_eq!(cookies[0].value, "abc==");
    }

    #[test]
    fn test_matches_host() {
        let cookie = &parse_cookie_header("a=1", ".eksisozluk.com")[0];
        assert!(cookie.matches_host("eksisozluk.com"));
        assert!(cookie.matches_host("www.eksisozluk.com"));
        assert!(!cookie.matches_host("noteksisozluk.com"));
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&BrowserConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_cookie_header_for_matching_host() {
        let mut fetcher = HttpFetcher::new(&BrowserConfig::default()).unwrap();
        fetcher.cookies = parse_cookie_header("a=1; b=2", "eksisozluk.com");

        let here = PageAddress::new("https://eksisozluk.com/t?p=1");
        let elsewhere = PageAddress::new("https://example.com/t?p=1");
        assert_eq!(fetcher.cookie_header_for(&here), Some("a=1; b=2".to_string()));
        assert_eq!(fetcher.cookie_header_for(&elsewhere), None);
    }

    #[tokio::test]
    async fn test_inject_rejects_invalid_cookie() {
        let mut fetcher = HttpFetcher::new(&BrowserConfig::default()).unwrap();
        let cookies = vec![SessionCookie {
            name: "bad".to_string(),
            value: "line\nbreak".to_string(),
            domain: "eksisozluk.com".to_string(),
            path: "/".to_string(),
        }];

        let result = fetcher.inject_cookies(&cookies).await;
        assert!(matches!(result, Err(FetchError::Cookie(_))));
        assert!(fetcher.cookies.is_empty());
    }

    #[tokio::test]
    async fn test_inject_replaces_same_name() {
        let mut fetcher = HttpFetcher::new(&BrowserConfig::default()).unwrap();
        fetcher
            .inject_cookies(&parse_cookie_header("a=1", "eksisozluk.com"))
            .await
            .unwrap();
        fetcher
            .inject_cookies(&parse_cookie_header("a=2", "eksisozluk.com"))
            .await
            .unwrap();
        assert_eq!(fetcher.cookies.len(), 1);
        assert_eq!(fetcher.cookies[0].value, "2");
    }
}
