//! WordPress export (WXR) reading.
//!
//! ```text
//! scanner events ──► ExportAccumulator ──► fields::route ──► WpPost / WpComment
//!                          │
//!                          └── </item> ──► PostSink (record mapper)
//! ```

pub mod accumulator;
pub mod fields;
pub mod types;

pub use accumulator::{ExportAccumulator, PostSink};
pub use types::{WpComment, WpPost};
