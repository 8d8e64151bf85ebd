use super::{PageAddress, FIRST_PAGE_MARKER};
use url::Url;

/// Normalizes a topic reference to its canonical first-page address
///
/// # Normalization Rules
///
/// 1. A reference starting with `http` is a full address: only its path is
///    kept, surrounding slashes are stripped and it is reattached to the
///    base origin. Query and fragment are discarded.
/// 2. Anything else is a bare slug: surrounding whitespace, then surrounding
///    slashes, are trimmed and it is attached to the base origin.
/// 3. Percent-escapes in the path are decoded, so both forms of the same
///    topic yield the same address.
/// 4. The first-page marker `?p=1` is always appended.
///
/// This never fails. A malformed reference yields a well-formed address that
/// may not exist; that surfaces later as a fetch error.
///
/// # Examples
///
/// ```
/// use sozluk_harvester::url::normalize_topic;
///
/// let address = normalize_topic("https://eksisozluk.com/python--12345?p=7", "https://eksisozluk.com");
/// assert_eq!(address.as_str(), "https://eksisozluk.com/python--12345?p=1");
/// ```
pub fn normalize_topic(topic: &str, base_origin: &str) -> PageAddress {
    let path = if topic.starts_with("http") {
        match Url::parse(topic) {
            Ok(url) => decode_path(url.path().trim_matches('/')),
            Err(_) => decode_path(manual_path(topic).trim_matches('/')),
        }
    } else {
        decode_path(topic.trim().trim_matches('/'))
    };

    PageAddress::new(format!(
        "{}/{}{}",
        trim_origin(base_origin),
        path,
        FIRST_PAGE_MARKER
    ))
}

/// Decodes percent-escapes, keeping the input as is if it is not valid UTF-8
fn decode_path(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}

/// Cuts the path out of an address the `url` crate refused to parse
fn manual_path(topic: &str) -> &str {
    let rest = match topic.find("://") {
        Some(idx) => {
            let after_scheme = &topic[idx + 3..];
            match after_scheme.find('/') {
                Some(slash) => &after_scheme[slash..],
                None => "",
            }
        }
        None => topic,
    };

    match rest.find(|c| c == '?' || c == '#') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Rewrites a site-relative link against the base origin
///
/// Only links starting with `/` are rewritten. Absolute links are returned
/// unchanged, and a missing link becomes an empty string.
pub fn absolutize_link(href: Option<&str>, base_origin: &str) -> String {
    match href {
        Some(href) if href.starts_with('/') => format!("{}{}", trim_origin(base_origin), href),
        Some(href) => href.to_string(),
        None => String::new(),
    }
}

/// Returns the base origin without trailing slashes
pub fn trim_origin(base_origin: &str) -> &str {
    base_origin.trim_end_matches('/')
}
