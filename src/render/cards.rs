//! View models for rendered pages.

use serde::Serialize;

use crate::library::ContentEntry;

/// One clickable card in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub description: String,
    /// Target of the card's button
    pub href: String,
    /// Button label
    pub action: String,
}

impl Card {
    /// Card for an entry whose page lives at `<base>/<name><suffix>`
    pub fn for_entry(entry: &ContentEntry, base: &str, suffix: &str, action: &str) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            href: format!("{}/{}{}", base.trim_end_matches('/'), encode_segment(&entry.name), suffix),
            action: action.to_string(),
        }
    }
}

/// A page of cards
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub title: String,
    pub heading: String,
    pub back_href: Option<String>,
    pub cards: Vec<Card>,
}

/// A page showing one sample's source
#[derive(Debug, Clone, Serialize)]
pub struct SourcePage {
    pub title: String,
    pub name: String,
    /// Section heading the back link returns to
    pub section: String,
    pub back_href: String,
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotFoundPage {
    pub title: String,
    pub home_href: String,
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            home_href: "/".to_string(),
        }
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set kept)
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
