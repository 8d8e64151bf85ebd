//! Next-page discovery
//!
//! A topic page links to its successor through a `rel="next"` anchor or a
//! pager button. Not finding one is the normal end of a topic.

use crate::config::ExtractionProfile;
use crate::crawler::parser::{compile_all, first_match};
use crate::url::PageAddress;
use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// Compiled selectors for finding the next page link
#[derive(Debug, Clone)]
pub struct PaginationResolver {
    next_page: Vec<Selector>,
}

impl PaginationResolver {
    pub fn new(profile: &ExtractionProfile) -> Result<Self, ConfigError> {
        Ok(Self {
            next_page: compile_all(&profile.next_page)?,
        })
    }

    /// Finds the absolute address of the page after `current`
    ///
    /// The first selector with a match decides. Returns `None` if nothing
    /// matches or the matched link has no usable `href`.
    pub fn next_page(&self, markup: &str, current: &PageAddress) -> Option<PageAddress> {
        let document = Html::parse_document(markup);
        let link = first_match(document.root_element(), &self.next_page)?;
        let href = link.value().attr("href")?.trim();

        if href.is_empty() {
            return None;
        }

        resolve_against(href, current)
    }
}

/// Convenience function resolving the next page with the default selectors
pub fn find_next_page(markup: &str, current: &PageAddress) -> Option<PageAddress> {
    PaginationResolver::new(&ExtractionProfile::default())
        .ok()
        .and_then(|resolver| resolver.next_page(markup, current))
}

/// Resolves a possibly relative link against the page it was found on
fn resolve_against(href: &str, current: &PageAddress) -> Option<PageAddress> {
    let resolved = match Url::parse(current.as_str()) {
        Ok(base) => base.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };

    Some(PageAddress::new(resolved.to_string()))
}
