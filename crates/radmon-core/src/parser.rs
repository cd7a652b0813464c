//! Parsers for the two remote document dialects.
//!
//! - The **structured feed** is XML. Station names live in `<title>` elements and
//!   dose rates in `<rad>` elements; the feed also carries a network-label title that
//!   is not a station.
//! - The **narrative page** is loosely-formed HTML containing one status paragraph.
//!
//! Both parsers either produce a complete result or an [`Error::Parse`]; nothing is
//! published partially.
//!
//! ```rust
//! use radmon_core::parser::parse_readings;
//!
//! let xml = r#"<rss><channel>
//!   <title>Радиационный мониторинг</title>
//!   <item><title>Минск</title><rad>0.11</rad></item>
//! </channel></rss>"#;
//!
//! let readings = parse_readings(xml).unwrap();
//! assert_eq!(readings["Минск"], 0.11);
//! ```

use crate::types::{Document, DocumentKind, RawDocument};
use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{instrument, warn};

/// Title the feed uses for the network itself rather than a station.
pub const NETWORK_LABEL: &str = "Радиационный мониторинг";

/// Text the status paragraph starts with.
pub const STATUS_PREFIX: &str = "Радиационная обстановка";

/// Endings that close the status paragraph.
pub const STATUS_SUFFIXES: [&str; 2] = ["загрязнения.", "АЭС."];

/// Narrative returned when the page has no recognizable status paragraph.
pub const DEFAULT_NARRATIVE: &str = "Радиационная обстановка на территории Республики Беларусь \
стабильная. Уровни мощности дозы гамма-излучения соответствуют установившимся многолетним \
значениям и не превышают уровней естественного радиационного фона, за исключением \
территорий радиоактивного загрязнения.";

/// Two words the page source is known to emit without a separating space.
const FUSED_WORDS: &str = "доцифры";
const REPAIRED_WORDS: &str = "до цифры";

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose end tag HTML lets authors omit before a sibling of the same kind.
const SELF_CLOSING_SIBLINGS: &[&str] = &["p", "li"];

/// Script and style bodies are not markup and routinely contain bare `<`.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static RAW_TEXT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

/// Parse a fetched document according to its kind.
pub fn parse_document(raw: &RawDocument) -> Result<Document> {
    match raw.kind {
        DocumentKind::StructuredFeed => parse_readings(&raw.body).map(Document::Readings),
        DocumentKind::NarrativePage => parse_narrative(&raw.body).map(Document::Narrative),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedField {
    Title,
    Rad,
}

impl FeedField {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"rad" => Some(Self::Rad),
            _ => None,
        }
    }
}

/// Extract station readings from the structured feed.
///
/// Titles and values are collected in document order. The network label is removed
/// from the titles, then both lists are reversed and zipped, so pairing is anchored
/// at the end of the document: a surplus leading title (for example a channel
/// heading) is left unpaired instead of shifting every station onto its neighbour's
/// value.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the XML is malformed, if any `<rad>` value is not a
/// finite non-negative number, or if no title/value pair is found.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn parse_readings(payload: &str) -> Result<BTreeMap<String, f64>> {
    let mut reader = Reader::from_str(payload);
    reader.config_mut().trim_text(true);

    let mut titles = Vec::new();
    let mut rads = Vec::new();
    let mut current: Option<FeedField> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(field) = FeedField::from_name(e.local_name().as_ref()) {
                    current = Some(field);
                    text.clear();
                }
            },
            Event::Text(e) if current.is_some() => {
                text.push_str(&e.unescape()?);
            },
            Event::CData(e) if current.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e));
            },
            Event::End(e) => {
                let field = FeedField::from_name(e.local_name().as_ref());
                if field.is_some() && field == current {
                    let value = text.trim().to_string();
                    match current.take() {
                        Some(FeedField::Title) => titles.push(value),
                        Some(FeedField::Rad) => rads.push(value),
                        None => {},
                    }
                    text.clear();
                }
            },
            Event::Empty(e) => match FeedField::from_name(e.local_name().as_ref()) {
                Some(FeedField::Title) => titles.push(String::new()),
                Some(FeedField::Rad) => rads.push(String::new()),
                None => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    let values = rads
        .iter()
        .map(|raw| parse_dose_rate(raw))
        .collect::<Result<Vec<f64>>>()?;

    titles.retain(|title| title != NETWORK_LABEL);

    if titles.len() != values.len() {
        warn!(
            titles = titles.len(),
            values = values.len(),
            "Feed title/value counts differ; pairing from the end of the document"
        );
    }

    let readings: BTreeMap<String, f64> = titles
        .into_iter()
        .rev()
        .zip(values.into_iter().rev())
        .collect();

    if readings.is_empty() {
        return Err(Error::Parse("Feed contains no station readings".into()));
    }

    Ok(readings)
}

fn parse_dose_rate(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("Non-numeric dose rate '{raw}'")))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::Parse(format!("Dose rate out of range: {raw}")));
    }
    Ok(value)
}

/// Extract the status paragraph from the narrative page.
///
/// The page is read tolerantly: `<script>`/`<style>` blocks are dropped, void
/// elements need no end tag, stray or mismatched end tags are skipped and HTML
/// entities are decoded. Element text (including descendants) is whitespace-collapsed
/// and checked when the element closes, so the innermost matching element wins. The
/// first element that starts with [`STATUS_PREFIX`] and ends with one of
/// [`STATUS_SUFFIXES`] is returned with the known fused-word glitch repaired.
///
/// Returns [`DEFAULT_NARRATIVE`] if no element matches.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the payload cannot be tokenized as markup at all.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn parse_narrative(payload: &str) -> Result<String> {
    let cleaned = RAW_TEXT_BLOCK_RE.replace_all(payload, " ");

    let mut reader = Reader::from_str(&cleaned);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    // (element name, accumulated text) for every open element.
    let mut open: Vec<(String, String)> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.local_name().as_ref());
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    append_text(&mut open, " ");
                    continue;
                }
                // An open <p> or <li> ends where the next sibling of the same kind starts.
                if SELF_CLOSING_SIBLINGS.contains(&name.as_str())
                    && open.last().is_some_and(|(last, _)| *last == name)
                {
                    if let Some(found) = close_element(&mut open) {
                        return Ok(found);
                    }
                }
                open.push((name, String::new()));
            },
            Event::Empty(_) => append_text(&mut open, " "),
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(&e);
                append_text(&mut open, &html_escape::decode_html_entities(&raw));
            },
            Event::CData(e) => append_text(&mut open, &String::from_utf8_lossy(&e)),
            Event::End(e) => {
                let name = element_name(e.local_name().as_ref());
                let Some(depth) = open.iter().rposition(|(open_name, _)| *open_name == name)
                else {
                    continue;
                };
                while open.len() > depth {
                    if let Some(found) = close_element(&mut open) {
                        return Ok(found);
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    while !open.is_empty() {
        if let Some(found) = close_element(&mut open) {
            return Ok(found);
        }
    }

    Ok(DEFAULT_NARRATIVE.to_string())
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn append_text(open: &mut [(String, String)], text: &str) {
    if let Some((_, buf)) = open.last_mut() {
        buf.push_str(text);
    }
}

/// Pop the innermost element, hand its text to the parent, and return the cleaned
/// text if it is the status paragraph.
fn close_element(open: &mut Vec<(String, String)>) -> Option<String> {
    let (_, text) = open.pop()?;
    append_text(open, &text);

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    is_status_paragraph(&collapsed).then(|| collapsed.replace(FUSED_WORDS, REPAIRED_WORDS))
}

fn is_status_paragraph(text: &str) -> bool {
    text.starts_with(STATUS_PREFIX) && STATUS_SUFFIXES.iter().any(|s| text.ends_with(s))
}
