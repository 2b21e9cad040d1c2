//! Slide entry enumeration and the transition-duration scan.
//!
//! Slides live in the archive as `ppt/slides/slide<N>.xml`. The ordinal
//! `<N>` orders the deck; it is not reused for output numbering, which
//! is the 1-based rank after sorting.

use crate::archive::PresentationArchive;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Archive path prefix for slide entries.
pub const SLIDE_PREFIX: &str = "ppt/slides/slide";
/// Archive path extension for slide entries.
pub const SLIDE_SUFFIX: &str = ".xml";

/// Attribute carrying the advance time of a transition, in milliseconds.
const ADVANCE_TIME_ATTR: &[u8] = b"advTm";

/// One slide entry found in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEntry {
    /// Full archive path of the entry.
    pub path: String,
    /// Slide number embedded in the entry name.
    pub ordinal: u64,
}

/// Parse the ordinal out of an archive entry name, if the name follows
/// the slide naming convention exactly.
pub fn slide_ordinal(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(SLIDE_PREFIX)?.strip_suffix(SLIDE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Collect the slide entries of an archive, sorted ascending by ordinal.
///
/// Sorting is numeric, so `slide10.xml` follows `slide2.xml`.
pub fn slide_entries(archive: &PresentationArchive) -> Vec<SlideEntry> {
    let mut entries: Vec<SlideEntry> = archive
        .entry_names()
        .into_iter()
        .filter_map(|path| {
            let ordinal = slide_ordinal(&path)?;
            Some(SlideEntry { path, ordinal })
        })
        .collect();
    entries.sort_by_key(|e| e.ordinal);
    log::debug!("found {} slide entries", entries.len());
    entries
}

/// Scan a slide document for its transition duration in seconds.
///
/// The first element in document order whose tag name contains
/// `transition` wins; namespace prefixes are ignored by matching the
/// raw tag text. Returns `None` when the slide has no transition, the
/// transition carries no advance time, or the value is not a decimal
/// integer. The reader is drained to the end of the document so that
/// ill-formed XML anywhere in the entry is reported.
pub fn transition_duration(entry: &str, xml: &str) -> Result<Option<f64>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut duration: Option<f64> = None;
    let mut seen_transition = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if !seen_transition && tag_is_transition(e.name().as_ref()) {
                    seen_transition = true;
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == ADVANCE_TIME_ATTR {
                            let value = String::from_utf8_lossy(&attr.value);
                            duration = parse_advance_time(&value);
                            break;
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::slide_parse(entry, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(duration)
}

/// Tag-name match for transition elements, namespace-agnostic.
fn tag_is_transition(name: &[u8]) -> bool {
    let needle = b"transition";
    name.windows(needle.len()).any(|w| w == needle)
}

/// Parse an `advTm` value (decimal integer milliseconds) into seconds
/// rounded to two decimal places.
fn parse_advance_time(value: &str) -> Option<f64> {
    let millis: u64 = value.trim().parse().ok()?;
    Some((millis as f64 / 1000.0 * 100.0).round() / 100.0)
}
