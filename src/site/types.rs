//! Talkyard site data types.
//!
//! `SiteData` and everything inside it is serialized verbatim as the
//! converter's output, with camelCase keys.

use serde::Serialize;

/// Post nr of a page's title.
pub const TITLE_NR: i32 = 0;
/// Post nr of a page's body; top-level replies have it as parent.
pub const BODY_NR: i32 = 1;
/// Post nr of the first reply.
pub const FIRST_REPLY_NR: i32 = 2;

pub const SYSTEM_USER_ID: i64 = 1;
pub const UNKNOWN_USER_ID: i64 = -2;

/// Regular post (as opposed to meta messages, chat, ...).
const NORMAL_POST_TYPE: i32 = 1;

/// Semantic role of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    /// Comment thread about a blog post.
    Discussion,
}

impl PageRole {
    /// Numeric `pageType` used by Talkyard.
    pub const fn code(self) -> i32 {
        match self {
            PageRole::Discussion => 12,
        }
    }
}

// ============================================================================
// Builder Input / Output
// ============================================================================

/// A page to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub id: String,
    pub folder: String,
    pub slug: String,
    pub show_id: bool,
    pub role: PageRole,
    pub title: String,
    pub body: String,
    pub category_id: i64,
    pub author_id: i64,
    pub created_at_ms: Option<i64>,
    pub bumped_at_ms: Option<i64>,
}

/// What the builder made of a [`PageSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: String,
    pub role: PageRole,
    pub category_id: i64,
    pub author_id: i64,
    pub created_at_ms: i64,
    pub bumped_at_ms: i64,
    pub path: PagePath,
}

/// A reply to add below a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSpec {
    pub page_id: String,
    pub nr: i32,
    pub parent_nr: i32,
    pub author_id: i64,
    pub approved_source: String,
    pub approved_html: Option<String>,
    pub created_at_ms: Option<i64>,
}

/// What the builder made of a [`PostSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: i64,
    pub page_id: String,
    pub nr: i32,
    pub parent_nr: i32,
    pub created_at_ms: i64,
}

// ============================================================================
// Serialized Site Data
// ============================================================================

/// Everything the builder accumulated, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    /// Comment authors are not imported; always empty.
    pub guests: Vec<serde_json::Value>,
    pub pages: Vec<SitePage>,
    pub page_paths: Vec<PagePath>,
    pub posts: Vec<SitePost>,
}

#[cfg(test)]
impl SiteData {
    /// Posts that are replies, i.e. neither a title nor a body.
    pub fn replies(&self) -> impl Iterator<Item = &SitePost> {
        self.posts.iter().filter(|post| post.nr >= FIRST_REPLY_NR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePage {
    pub id: String,
    pub page_type: i32,
    pub version: i32,
    pub category_id: i64,
    pub author_id: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub published_at_ms: i64,
    pub bumped_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePath {
    pub folder: String,
    pub page_id: String,
    pub show_id: bool,
    pub slug: String,
    pub canonical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePost {
    pub id: i64,
    pub page_id: String,
    pub nr: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_nr: Option<i32>,
    pub post_type: i32,
    pub created_at_ms: i64,
    pub created_by_id: i64,
    pub approved_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_html_sanitized: Option<String>,
    pub approved_at_ms: i64,
    pub approved_by_id: i64,
}

impl SitePost {
    /// A normal, already approved post.
    #[allow(clippy::too_many_arguments)]
    pub fn approved(
        id: i64,
        page_id: &str,
        nr: i32,
        parent_nr: Option<i32>,
        author_id: i64,
        created_at_ms: i64,
        source: String,
        html: Option<String>,
    ) -> Self {
        Self {
            id,
            page_id: page_id.to_owned(),
            nr,
            parent_nr,
            post_type: NORMAL_POST_TYPE,
            created_at_ms,
            created_by_id: author_id,
            approved_source: source,
            approved_html_sanitized: html,
            approved_at_ms: created_at_ms,
            approved_by_id: SYSTEM_USER_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discussion_role_code() {
        assert_eq!(PageRole::Discussion.code(), 12);
    }

    #[test]
    fn test_empty_site_serializes_all_lists() {
        let json = serde_json::to_value(SiteData::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "guests": [], "pages": [], "pagePaths": [], "posts": [] })
        );
    }

    #[test]
    fn test_post_skips_missing_optionals() {
        let post = SitePost::approved(101, "1", TITLE_NR, None, 1, 0, "T".into(), None);
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("parentNr").is_none());
        assert!(json.get("approvedHtmlSanitized").is_none());
        assert_eq!(json["pageId"], "1");
        assert_eq!(json["postType"], 1);
    }
}
