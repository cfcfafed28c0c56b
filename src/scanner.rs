//! Push-style XML scanner over `quick-xml`.
//!
//! Pulls events from a [`Reader`] and pushes them, in document order, into an
//! [`ExportListener`]. Everything between two tags (text, entity references,
//! CDATA sections) is merged into one call: `on_cdata` if any CDATA section
//! took part, `on_text` otherwise. Whitespace-only text at either edge of such
//! a run is dropped.
//!
//! End tags are not checked against start tags: `</b>` after `<a>` reaches
//! the listener as written, which decides what a stray close means.
//!
//! ```text
//! <item>             → on_open_tag("item")
//! <title>A &amp; B   → on_open_tag("title"), on_text("A & B")
//! <![CDATA[a ]]]]><![CDATA[>]]>
//!                    → on_cdata("a ]]>")
//! </title>           → on_close_tag("title")
//! <guid isPermaLink="false"/>
//!                    → on_open_tag("guid"), on_attribute("isPermaLink", "false"),
//!                      on_close_tag("guid")
//! ```

use anyhow::Result;
use compact_str::CompactString;
use quick_xml::{
    Reader,
    escape::{resolve_predefined_entity, unescape},
    events::{BytesRef, BytesStart, Event},
};
use smallvec::SmallVec;
use thiserror::Error;

/// A start tag as seen by listeners. Names are qualified (`wp:comment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub name: CompactString,
    pub attributes: SmallVec<[(CompactString, String); 4]>,
    pub self_closing: bool,
}

/// The tokenizer gave up on the document.
#[derive(Debug, Error)]
#[error("malformed XML at byte {position}")]
pub struct ScanError {
    pub position: u64,
    #[source]
    pub source: quick_xml::Error,
}

/// Receives scanner events. Only tags are mandatory.
///
/// Returning `Err` from any method stops the scan and propagates the error.
pub trait ExportListener {
    fn on_open_tag(&mut self, tag: &OpenTag) -> Result<()>;

    fn on_close_tag(&mut self, name: &str) -> Result<()>;

    fn on_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn on_cdata(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn on_attribute(&mut self, _name: &str, _value: &str) {}

    fn on_error(&mut self, _error: &ScanError) {}

    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// What a finished scan looked like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Start and empty-element tags seen.
    pub elements: usize,
    /// The scan stopped at a tokenizer error instead of the end of input.
    pub failed: bool,
}

#[inline]
pub fn create_xml_reader(content: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.trim_text(false);
    config.enable_all_checks(false);
    config.allow_unmatched_ends = true;
    reader
}

/// Scan a whole document, feeding every event to `listener`.
///
/// A tokenizer error (unterminated tag, CDATA section, comment, ...) is
/// reported through [`ExportListener::on_error`] and ends the scan; `on_end`
/// runs in both cases so listeners can flush.
pub fn scan<L: ExportListener>(document: &str, listener: &mut L) -> Result<ScanSummary> {
    let mut reader = create_xml_reader(document);
    let mut text = PendingText::default();
    let mut summary = ScanSummary::default();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                text.flush(listener)?;
                let error = ScanError {
                    position: reader.error_position(),
                    source,
                };
                listener.on_error(&error);
                summary.failed = true;
                break;
            }
        };

        match event {
            Event::Text(e) => text.push_text(&String::from_utf8_lossy(&e)),
            Event::CData(e) => text.push_cdata(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => push_reference(&mut text, &e),
            Event::Eof => {
                text.flush(listener)?;
                break;
            }
            event => {
                text.flush(listener)?;
                match event {
                    Event::Start(e) => {
                        summary.elements += 1;
                        open(listener, &e, false)?;
                    }
                    Event::Empty(e) => {
                        summary.elements += 1;
                        let tag = open(listener, &e, true)?;
                        listener.on_close_tag(&tag.name)?;
                    }
                    Event::End(e) => {
                        let name = CompactString::from_utf8_lossy(e.name().as_ref());
                        listener.on_close_tag(&name)?;
                    }
                    // declarations, comments, processing instructions, doctype
                    _ => {}
                }
            }
        }
    }

    listener.on_end()?;
    Ok(summary)
}

fn open<L: ExportListener>(listener: &mut L, elem: &BytesStart<'_>, self_closing: bool) -> Result<OpenTag> {
    let tag = OpenTag {
        name: CompactString::from_utf8_lossy(elem.name().as_ref()),
        attributes: elem
            .attributes()
            .flatten()
            .map(|attr| {
                let raw = String::from_utf8_lossy(&attr.value);
                let value = unescape(&raw).map_or_else(|_| raw.to_string(), |v| v.into_owned());
                (CompactString::from_utf8_lossy(attr.key.as_ref()), value)
            })
            .collect(),
        self_closing,
    };

    listener.on_open_tag(&tag)?;
    for (name, value) in &tag.attributes {
        listener.on_attribute(name, value);
    }
    Ok(tag)
}

/// Character data collected between two tags.
#[derive(Default)]
struct PendingText {
    text: String,
    /// Whitespace seen after `text`, kept only if more content follows.
    gap: String,
    cdata: bool,
}

impl PendingText {
    fn push_text(&mut self, s: &str) {
        if !s.trim().is_empty() {
            self.push(s);
        } else if !self.text.is_empty() {
            self.gap.push_str(s);
        }
    }

    fn push_cdata(&mut self, s: &str) {
        self.cdata = true;
        self.push(s);
    }

    fn push(&mut self, s: &str) {
        self.text.push_str(&self.gap);
        self.gap.clear();
        self.text.push_str(s);
    }

    fn flush<L: ExportListener>(&mut self, listener: &mut L) -> Result<()> {
        let result = if self.cdata {
            listener.on_cdata(&self.text)
        } else if !self.text.is_empty() {
            listener.on_text(&self.text)
        } else {
            Ok(())
        };
        self.text.clear();
        self.gap.clear();
        self.cdata = false;
        result
    }
}

/// Append the replacement text of `&name;` / `&#N;`, or the reference
/// itself when it is not a character or predefined entity.
fn push_reference(text: &mut PendingText, reference: &BytesRef<'_>) {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        text.push(ch.encode_utf8(&mut [0; 4]));
        return;
    }
    let name = String::from_utf8_lossy(reference);
    match resolve_predefined_entity(&name) {
        Some(resolved) => text.push(resolved),
        None => text.push(&format!("&{name};")),
    }
}
