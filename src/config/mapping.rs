//! `[mapping]` section configuration.
//!
//! Controls how a converted blog post turns into a Talkyard page and replies.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// How a completed blog post is mapped onto the target site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    /// One canned page and one canned reply per post (default).
    #[default]
    Placeholder,
    /// Title, body, slug and dates from the post; approved comments as replies.
    Content,
}

/// `[mapping]` section in to-talkyard.toml.
///
/// # Example
/// ```toml
/// [mapping]
/// mode = "content"
/// category_id = 3
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    #[serde(default)]
    pub mode: MappingMode,

    /// Category id assigned to every page.
    #[serde(default = "defaults::mapping::category_id")]
    #[educe(Default = defaults::mapping::category_id())]
    pub category_id: i64,

    /// Author id assigned to every page.
    #[serde(default = "defaults::mapping::unknown_author_id")]
    #[educe(Default = defaults::mapping::unknown_author_id())]
    pub unknown_author_id: i64,

    /// Author id assigned to every reply.
    #[serde(default = "defaults::mapping::reply_author_id")]
    #[educe(Default = defaults::mapping::reply_author_id())]
    pub reply_author_id: i64,

    /// Folder of the generated page paths, must start and end with `/`.
    #[serde(default = "defaults::mapping::folder")]
    #[educe(Default = defaults::mapping::folder())]
    pub folder: String,

    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// `[mapping.placeholder]`: the canned texts used in placeholder mode.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderConfig {
    #[serde(default = "defaults::mapping::placeholder::title")]
    #[educe(Default = defaults::mapping::placeholder::title())]
    pub title: String,

    #[serde(default = "defaults::mapping::placeholder::body")]
    #[educe(Default = defaults::mapping::placeholder::body())]
    pub body: String,

    #[serde(default = "defaults::mapping::placeholder::slug")]
    #[educe(Default = defaults::mapping::placeholder::slug())]
    pub slug: String,

    #[serde(default = "defaults::mapping::placeholder::reply")]
    #[educe(Default = defaults::mapping::placeholder::reply())]
    pub reply: String,
}
