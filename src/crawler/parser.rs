//! Entry extractor for rendered topic pages
//!
//! This module turns the markup of one topic page into `EntryRecord`s. Every
//! field is looked up through an ordered list of selectors; the first one
//! that matches wins and a field with no match degrades to an empty string.

use crate::config::{compile_selector, ExtractionProfile};
use crate::url::absolutize_link;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// One entry extracted from a topic page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Site-assigned identity; empty when the markup carries none
    pub entry_id: String,

    /// Author nickname
    pub author: String,

    /// Absolute link to the author's profile
    pub author_url: String,

    /// Date text as rendered on the page
    pub date: String,

    /// Absolute link to the entry itself
    pub permalink: String,

    /// Plain-text body, one line per text fragment
    pub content: String,
}

/// Compiled selectors for extracting entries
#[derive(Debug, Clone)]
pub struct EntryExtractor {
    base_origin: String,
    containers: Vec<Selector>,
    id_attribute: String,
    author: Vec<Selector>,
    date: Vec<Selector>,
    content: Vec<Selector>,
}

impl EntryExtractor {
    /// Compiles an extraction profile
    ///
    /// # Arguments
    ///
    /// * `profile` - The selector lists to use
    /// * `base_origin` - Origin that site-relative links are rewritten against
    pub fn new(profile: &ExtractionProfile, base_origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_origin: base_origin.to_string(),
            containers: compile_all(&profile.containers)?,
            id_attribute: profile.id_attribute.clone(),
            author: compile_all(&profile.author)?,
            date: compile_all(&profile.date)?,
            content: compile_all(&profile.content)?,
        })
    }

    /// Extracts all entries from a page in document order
    ///
    /// The first container selector with any match decides the container set;
    /// later selectors are not merged in. Entries are not deduplicated here.
    ///
    /// # Example
    ///
    /// ```
    /// use sozluk_harvester::config::ExtractionProfile;
    /// use sozluk_harvester::crawler::EntryExtractor;
    ///
    /// let html = r#"<ul><li data-id="7"><div class="content">hello</div></li></ul>"#;
    /// let extractor = EntryExtractor::new(&ExtractionProfile::default(), "https://eksisozluk.com").unwrap();
    /// let entries = extractor.extract(html);
    /// assert_eq!(entries[0].entry_id, "7");
    /// assert_eq!(entries[0].content, "hello");
    /// ```
    pub fn extract(&self, markup: &str) -> Vec<EntryRecord> {
        let document = Html::parse_document(markup);
        let root = document.root_element();

        let containers: Vec<ElementRef<'_>> = self
            .containers
            .iter()
            .map(|selector| root.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        containers
            .into_iter()
            .map(|container| self.extract_entry(container))
            .collect()
    }

    fn extract_entry(&self, container: ElementRef<'_>) -> EntryRecord {
        let entry_id = container
            .value()
            .attr(&self.id_attribute)
            .unwrap_or_default()
            .to_string();

        let content = first_match(container, &self.content)
            .map(|el| joined_text(el, "\n"))
            .unwrap_or_default();

        let (author, author_url) = match first_match(container, &self.author) {
            Some(el) => (
                joined_text(el, ""),
                absolutize_link(el.value().attr("href"), &self.base_origin),
            ),
            None => (String::new(), String::new()),
        };

        let (date, permalink) = match first_match(container, &self.date) {
            Some(el) => (
                joined_text(el, ""),
                absolutize_link(el.value().attr("href"), &self.base_origin),
            ),
            None => (String::new(), String::new()),
        };

        EntryRecord {
            entry_id,
            author,
            author_url,
            date,
            permalink,
            content,
        }
    }
}

/// Convenience function extracting entries with the default profile
///
/// # Arguments
///
/// * `markup` - The rendered page markup
/// * `base_origin` - Origin that site-relative links are rewritten against
pub fn extract_entries(markup: &str, base_origin: &str) -> Vec<EntryRecord> {
    EntryExtractor::new(&ExtractionProfile::default(), base_origin)
        .map(|extractor| extractor.extract(markup))
        .unwrap_or_default()
}

/// Compiles an ordered selector list
pub(crate) fn compile_all(selectors: &[String]) -> Result<Vec<Selector>, ConfigError> {
    selectors.iter().map(|s| compile_selector(s)).collect()
}

/// Returns the first element matched by the first selector that matches anything
pub(crate) fn first_match<'a>(
    scope: ElementRef<'a>,
    selectors: &[Selector],
) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// Flattens an element's text, trimming each fragment and dropping empty ones
fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
