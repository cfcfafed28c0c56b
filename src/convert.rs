//! The conversion pipeline.
//!
//! ```text
//! export file ──► scanner ──► ExportAccumulator ──► MappingSink ──► SiteDataBuilder
//!                                                                        │
//!                                               end of stream ──► emit_site
//! ```
//!
//! Everything runs on the calling thread, in document order. One call, one
//! fresh accumulator and builder: runs never share state.

use crate::config::ConverterConfig;
use crate::export::ExportAccumulator;
use crate::log;
use crate::mapper::MappingSink;
use crate::scanner::scan;
use crate::site::SiteDataBuilder;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Length of the export preview logged before scanning.
const PREVIEW_CHARS: usize = 99;

/// Counters of one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub elements: usize,
    pub posts: usize,
    pub comments: usize,
    pub pages: usize,
    pub replies: usize,
    pub nesting_errors: usize,
    pub field_errors: usize,
    /// The export was cut short by malformed XML.
    pub scan_failed: bool,
}

impl ConversionReport {
    pub fn log(&self) {
        log!(
            "done";
            "{} posts, {} comments → {} pages, {} replies ({} elements scanned)",
            self.posts, self.comments, self.pages, self.replies, self.elements
        );
        if self.nesting_errors > 0 || self.field_errors > 0 {
            log!(
                "done";
                "ignored {} misplaced tags and {} unparseable fields",
                self.nesting_errors, self.field_errors
            );
        }
        if self.scan_failed {
            log!("done"; "export was not read to the end, output is partial");
        }
    }
}

/// Result of converting one export.
#[derive(Debug)]
pub struct Conversion {
    /// Holds the converted site; read it through [`SiteBuilder::site`].
    pub builder: SiteDataBuilder,
    pub report: ConversionReport,
}

/// Convert export text to site data.
///
/// Malformed nesting, unparseable numbers and malformed XML are logged and
/// skipped; only builder errors fail the conversion.
pub fn convert(document: &str, config: &ConverterConfig) -> Result<Conversion> {
    let sink = MappingSink::new(&config.mapping, SiteDataBuilder::new(&config.site));
    let mut accumulator = ExportAccumulator::new(sink);

    let summary = scan(document, &mut accumulator)?;

    let (_, stats, sink) = accumulator.finish();
    let (pages, replies) = sink.counts();
    let report = ConversionReport {
        elements: summary.elements,
        posts: stats.posts,
        comments: stats.comments,
        pages,
        replies,
        nesting_errors: stats.nesting_errors,
        field_errors: stats.field_errors,
        scan_failed: summary.failed,
    };

    Ok(Conversion {
        builder: sink.into_builder(),
        report,
    })
}

/// Read an export file (UTF-8) and convert it.
pub fn convert_file(path: &Path, config: &ConverterConfig) -> Result<Conversion> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read export file `{}`", path.display()))?;

    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    log!("read"; "{} bytes from {}: {}", text.len(), path.display(), preview.escape_debug());
    log!("read"; "mapping mode: {:?}", config.mapping.mode);

    convert(&text, config)
}
