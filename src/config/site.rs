//! `[site]` section configuration.
//!
//! Identity and time defaults of the site data builder.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in to-talkyard.toml.
///
/// Nothing here is read from the clock, so converting the same export twice
/// gives byte-identical output.
///
/// # Example
/// ```toml
/// [site]
/// first_post_id = 1001
/// created_at_ms = 1600000000000
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// First post id handed out by the builder.
    #[serde(default = "defaults::site::first_post_id")]
    #[educe(Default = defaults::site::first_post_id())]
    pub first_post_id: i64,

    /// Timestamp (epoch millis) for pages and posts without a usable date.
    #[serde(default = "defaults::site::created_at_ms")]
    #[educe(Default = defaults::site::created_at_ms())]
    pub created_at_ms: i64,
}
