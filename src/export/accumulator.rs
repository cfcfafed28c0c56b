//! Rebuilds post → comment records from the flat scanner event stream.
//!
//! # State
//!
//! ```text
//!   (none) ──<item>──► post ──<wp:comment>──► post + comment
//!     ▲                 │  ▲                        │
//!     └────</item>──────┘  └──────</wp:comment>─────┘
//! ```
//!
//! At most one post and one comment are open at a time. Anything that would
//! break that (an `<item>` inside an `<item>`, a comment outside a post, ...)
//! is logged as a [`NestingError`] and otherwise ignored.

use super::fields;
use super::types::{WpComment, WpPost};
use crate::log;
use crate::scanner::{ExportListener, OpenTag, ScanError};
use anyhow::{Context, Result};
use compact_str::CompactString;
use thiserror::Error;

pub const ITEM_TAG: &str = "item";
pub const COMMENT_TAG: &str = "wp:comment";

/// Malformed nesting. Recoverable: the offending tag has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NestingError {
    #[error("<item> inside another <item>, ignored")]
    NestedPost,

    #[error("<item> inside a <wp:comment>, ignored")]
    PostInComment,

    #[error("<wp:comment> outside any <item>, ignored")]
    CommentOutsidePost,

    #[error("<wp:comment> inside another <wp:comment>, ignored")]
    NestedComment,

    #[error("</{0}> without a matching open tag, ignored")]
    UnmatchedClose(&'static str),

    #[error("</item> while a <wp:comment> is still open, comment dropped")]
    UnclosedComment,
}

/// Receives every post once its `</item>` has been seen.
pub trait PostSink {
    /// `index` is the zero-based position of the post in the export.
    fn post_completed(&mut self, index: usize, post: &WpPost) -> Result<()>;
}

/// Discards completed posts.
impl PostSink for () {
    fn post_completed(&mut self, _index: usize, _post: &WpPost) -> Result<()> {
        Ok(())
    }
}

/// Counters for the conversion summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorStats {
    pub posts: usize,
    pub comments: usize,
    pub nesting_errors: usize,
    pub field_errors: usize,
}

/// Per-run parsing state, fed by the scanner.
pub struct ExportAccumulator<S> {
    sink: S,
    current_post: Option<WpPost>,
    current_comment: Option<WpComment>,
    /// Most recently opened tag; cleared when that tag closes.
    current_tag: Option<CompactString>,
    completed: Vec<WpPost>,
    stats: AccumulatorStats,
}

impl<S: PostSink> ExportAccumulator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current_post: None,
            current_comment: None,
            current_tag: None,
            completed: Vec::new(),
            stats: AccumulatorStats::default(),
        }
    }

    pub fn on_open(&mut self, tag: &str) {
        self.current_tag = Some(tag.into());
        match tag {
            ITEM_TAG => self.open_post(),
            COMMENT_TAG => self.open_comment(),
            _ => {}
        }
    }

    pub fn on_close(&mut self, tag: &str) -> Result<()> {
        if self.current_tag.as_deref() == Some(tag) {
            self.current_tag = None;
        }
        match tag {
            ITEM_TAG => self.close_post(),
            COMMENT_TAG => {
                self.close_comment();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Route character data (text or CDATA) to the field of the open tag.
    pub fn on_cdata(&mut self, text: &str) {
        let Some(tag) = self.current_tag.as_deref() else {
            return;
        };
        let routed = fields::route(
            tag,
            text,
            self.current_post.as_mut(),
            self.current_comment.as_mut(),
        );
        if let Err(err) = routed {
            self.stats.field_errors += 1;
            log!("field"; "{err}, field left empty");
        }
    }

    /// End the run, handing back the completed posts and the sink.
    ///
    /// A post still open here (truncated export) is not completed.
    pub fn finish(self) -> (Vec<WpPost>, AccumulatorStats, S) {
        if self.current_post.is_some() {
            log!("nesting"; "export ended inside an <item>, last post dropped");
        }
        (self.completed, self.stats, self.sink)
    }

    fn open_post(&mut self) {
        if self.current_comment.is_some() {
            self.nesting_error(NestingError::PostInComment);
        } else if self.current_post.is_some() {
            self.nesting_error(NestingError::NestedPost);
        } else {
            self.current_post = Some(WpPost::default());
        }
    }

    fn open_comment(&mut self) {
        if self.current_post.is_none() {
            self.nesting_error(NestingError::CommentOutsidePost);
        } else if self.current_comment.is_some() {
            self.nesting_error(NestingError::NestedComment);
        } else {
            self.current_comment = Some(WpComment::default());
        }
    }

    fn close_comment(&mut self) {
        let Some(comment) = self.current_comment.take() else {
            self.nesting_error(NestingError::UnmatchedClose(COMMENT_TAG));
            return;
        };
        if let Some(post) = self.current_post.as_mut() {
            post.comments.push(comment);
        }
    }

    fn close_post(&mut self) -> Result<()> {
        let Some(post) = self.current_post.take() else {
            self.nesting_error(NestingError::UnmatchedClose(ITEM_TAG));
            return Ok(());
        };
        if self.current_comment.take().is_some() {
            self.nesting_error(NestingError::UnclosedComment);
        }

        let index = self.completed.len();
        self.stats.posts += 1;
        self.stats.comments += post.comments.len();
        self.completed.push(post);

        let post = &self.completed[index];
        self.sink.post_completed(index, post).with_context(|| {
            format!(
                "failed to map post #{} ({})",
                index + 1,
                post.title.as_deref().unwrap_or("untitled")
            )
        })
    }

    fn nesting_error(&mut self, err: NestingError) {
        self.stats.nesting_errors += 1;
        log!("nesting"; "{err}");
    }
}

#[cfg(test)]
impl<S> ExportAccumulator<S> {
    fn current_post(&self) -> Option<&WpPost> {
        self.current_post.as_ref()
    }

    fn current_comment(&self) -> Option<&WpComment> {
        self.current_comment.as_ref()
    }

    fn completed(&self) -> &[WpPost] {
        &self.completed
    }

    fn stats(&self) -> AccumulatorStats {
        self.stats
    }
}

impl<S: PostSink> ExportListener for ExportAccumulator<S> {
    fn on_open_tag(&mut self, tag: &OpenTag) -> Result<()> {
        self.on_open(&tag.name);
        Ok(())
    }

    fn on_close_tag(&mut self, name: &str) -> Result<()> {
        self.on_close(name)
    }

    fn on_text(&mut self, text: &str) -> Result<()> {
        self.on_cdata(text);
        Ok(())
    }

    fn on_cdata(&mut self, text: &str) -> Result<()> {
        ExportAccumulator::on_cdata(self, text);
        Ok(())
    }

    fn on_error(&mut self, error: &ScanError) {
        log!("scan"; "{error}: {}, conversion stops here", error.source);
    }
}
