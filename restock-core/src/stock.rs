use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type label substring that puts an item in the mirage category.
const MIRAGE_MARKER: &str = "Mirage";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockListing {
    pub normal: Vec<String>,
    pub mirage: Vec<String>,
}

impl StockListing {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.mirage.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no stock entries recognized in document")]
pub struct ExtractError;

/// Pull the stock listing out of the raw page markup.
///
/// Each item card is an `<h3>` heading holding the item name, followed by a
/// `<span>` type label somewhere before the next heading. Scanning is
/// case-insensitive and tolerant of attributes, nested tags and entities;
/// cards missing a name or label are skipped. A document in which no card is
/// recognized at all is an extraction failure.
pub fn extract_listing(html: &str) -> Result<StockListing, ExtractError> {
    let mut listing = StockListing::default();
    let mut cards = 0usize;

    let mut at = 0usize;
    while let Some(h3_open) = find_tag(html, "h3", at) {
        cards += 1;
        let Some(name_start) = html[h3_open..].find('>').map(|i| h3_open + i + 1) else {
            break;
        };
        let Some(h3_close) = find_ci(html, "</h3", name_start) else {
            break;
        };
        let window_end = find_tag(html, "h3", h3_close + 1).unwrap_or(html.len());

        let name = inner_text(&html[name_start..h3_close]);
        let label = span_text(&html[h3_close..window_end]);

        if let (false, Some(label)) = (name.is_empty(), label) {
            if label.contains(MIRAGE_MARKER) {
                listing.mirage.push(name);
            } else {
                listing.normal.push(name);
            }
        }

        at = window_end;
    }

    if cards == 0 {
        return Err(ExtractError);
    }
    Ok(listing)
}

/// First `<span>` text in the fragment, used as the card's type label.
fn span_text(fragment: &str) -> Option<String> {
    let open = find_tag(fragment, "span", 0)?;
    let start = fragment[open..].find('>').map(|i| open + i + 1)?;
    let close = find_ci(fragment, "</span", start)?;
    let text = inner_text(&fragment[start..close]);
    (!text.is_empty()).then_some(text)
}

/// Case-insensitive search for an opening `<tag` followed by a delimiter, so
/// `<h3 class="..">` matches but `<h3x>` does not.
fn find_tag(html: &str, tag: &str, from: usize) -> Option<usize> {
    let open = format!("<{tag}");
    let mut at = from;
    while let Some(pos) = find_ci(html, &open, at) {
        match html.as_bytes().get(pos + open.len()) {
            Some(b'>') => return Some(pos),
            Some(c) if c.is_ascii_whitespace() => return Some(pos),
            _ => at = pos + open.len(),
        }
    }
    None
}

fn find_ci(html: &str, needle: &str, from: usize) -> Option<usize> {
    if from >= html.len() {
        return None;
    }
    let needle = needle.as_bytes();
    html.as_bytes()[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

/// Strip nested tags, decode common entities and collapse whitespace.
fn inner_text(fragment: &str) -> String {
    let mut stripped = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => stripped.push(ch),
        }
    }
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
