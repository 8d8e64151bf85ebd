//! URL handling module for the harvester
//!
//! This module provides topic normalization, the `PageAddress` type and the
//! link rewriting rules used when extracting entries.

mod normalize;

pub use normalize::{absolutize_link, normalize_topic, trim_origin};

use serde::Serialize;
use std::fmt;

/// Default site origin used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://eksisozluk.com";

/// Query marker appended to every normalized topic address
pub const FIRST_PAGE_MARKER: &str = "?p=1";

/// An absolute, resolvable page address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageAddress(String);

impl PageAddress {
    /// Wraps an address that is already absolute
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the host component, if the address parses
    pub fn host(&self) -> Option<String> {
        ::url::Url::parse(&self.0)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
