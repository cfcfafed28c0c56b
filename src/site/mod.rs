//! Target site data: the pages, page paths and posts a Talkyard site is
//! imported from.
//!
//! The record mapper only talks to the [`SiteBuilder`] trait; the builder
//! owns post ids and fallback timestamps.

mod builder;
mod types;

pub use builder::{BuilderError, SiteBuilder, SiteDataBuilder};
pub use types::{
    BODY_NR, FIRST_REPLY_NR, PageRecord, PageRole, PageSpec, PostRecord, PostSpec,
    SYSTEM_USER_ID, SiteData, UNKNOWN_USER_ID,
};
