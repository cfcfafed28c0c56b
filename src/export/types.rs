//! Records rebuilt from a WordPress export.
//!
//! Every scalar is optional: exports in the wild omit fields freely, and a
//! numeric field whose text does not parse is left as `None`.

/// One `<item>` of the export together with its `<wp:comment>` children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpPost {
    pub title: Option<String>,
    pub link: Option<String>,
    /// RFC 2822 date, e.g. `Sat, 09 Jan 2016 21:53:01 +0000`
    pub pub_date: Option<String>,
    pub creator: Option<String>,
    pub guid: Option<String>,
    pub description: Option<String>,
    pub content_encoded: Option<String>,
    pub excerpt_encoded: Option<String>,
    pub post_id: Option<i64>,
    /// Local time, e.g. `2016-01-09 21:53:01`
    pub post_date: Option<String>,
    pub post_date_gmt: Option<String>,
    pub comment_status: Option<String>,
    pub ping_status: Option<String>,
    /// URL slug
    pub post_name: Option<String>,
    pub status: Option<String>,
    pub post_parent: Option<i64>,
    pub menu_order: Option<i64>,
    pub post_type: Option<String>,
    pub post_password: Option<String>,
    pub is_sticky: Option<i64>,
    pub category: Option<String>,

    /// In document order, i.e. thread order.
    pub comments: Vec<WpComment>,
}

/// One `<wp:comment>` inside an `<item>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpComment {
    pub comment_id: Option<i64>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub author_url: Option<String>,
    pub author_ip: Option<String>,
    pub date: Option<String>,
    pub date_gmt: Option<String>,
    pub content: Option<String>,
    /// `1` approved, `0` pending
    pub approved: Option<i64>,
    pub comment_type: Option<String>,
    /// `0` replies to the post itself, otherwise the `comment_id` replied to.
    pub parent: Option<i64>,
    pub user_id: Option<i64>,
}

impl WpComment {
    pub fn is_approved(&self) -> bool {
        self.approved == Some(1)
    }

    /// The comment this one replies to, `None` for top-level comments.
    pub fn parent_comment_id(&self) -> Option<i64> {
        self.parent.filter(|&id| id != 0)
    }
}
