//! Tag name → record field dispatch.
//!
//! Two static tables, one per record level:
//!
//! | Level   | Active when                   | Table            |
//! |---------|-------------------------------|------------------|
//! | post    | a post is open, no comment    | `POST_FIELDS`    |
//! | comment | a comment is open             | `COMMENT_FIELDS` |
//!
//! Tags missing from the active table are ignored, so exports carrying
//! metadata we do not know about still convert.

use super::types::{WpComment, WpPost};
use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Text in a numeric field that does not parse as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("<{tag}> expects an integer, got {text:?}")]
pub struct FieldError {
    pub tag: String,
    pub text: String,
}

/// Where the text of one tag goes.
pub enum Slot<R> {
    /// String field, last value wins.
    Text(fn(&mut R) -> &mut Option<String>),
    /// String field, first value wins (e.g. repeated `<category>`).
    FirstText(fn(&mut R) -> &mut Option<String>),
    /// Integer field, unparseable text leaves it untouched.
    Int(fn(&mut R) -> &mut Option<i64>),
}

impl<R> Slot<R> {
    fn assign(&self, record: &mut R, tag: &str, text: &str) -> Result<(), FieldError> {
        match self {
            Slot::Text(field) => *field(record) = Some(text.to_owned()),
            Slot::FirstText(field) => {
                field(record).get_or_insert_with(|| text.to_owned());
            }
            Slot::Int(field) => match text.trim().parse() {
                Ok(value) => *field(record) = Some(value),
                Err(_) => {
                    return Err(FieldError {
                        tag: tag.to_owned(),
                        text: text.to_owned(),
                    });
                }
            },
        }
        Ok(())
    }
}

type FieldTable<R> = FxHashMap<&'static str, Slot<R>>;

macro_rules! field_table {
    ($record:ty { $($tag:literal => $kind:ident($field:ident)),* $(,)? }) => {{
        let mut table: FieldTable<$record> = FxHashMap::default();
        $( table.insert($tag, Slot::$kind(|r: &mut $record| &mut r.$field)); )*
        table
    }};
}

pub static POST_FIELDS: LazyLock<FieldTable<WpPost>> = LazyLock::new(|| {
    field_table!(WpPost {
        "title" => Text(title),
        "link" => Text(link),
        "pubDate" => Text(pub_date),
        "dc:creator" => Text(creator),
        "guid" => Text(guid),
        "description" => Text(description),
        "content:encoded" => Text(content_encoded),
        "excerpt:encoded" => Text(excerpt_encoded),
        "wp:post_id" => Int(post_id),
        "wp:post_date" => Text(post_date),
        "wp:post_date_gmt" => Text(post_date_gmt),
        "wp:comment_status" => Text(comment_status),
        "wp:ping_status" => Text(ping_status),
        "wp:post_name" => Text(post_name),
        "wp:status" => Text(status),
        "wp:post_parent" => Int(post_parent),
        "wp:menu_order" => Int(menu_order),
        "wp:post_type" => Text(post_type),
        "wp:post_password" => Text(post_password),
        "wp:is_sticky" => Int(is_sticky),
        "category" => FirstText(category),
    })
});

pub static COMMENT_FIELDS: LazyLock<FieldTable<WpComment>> = LazyLock::new(|| {
    field_table!(WpComment {
        "wp:comment_id" => Int(comment_id),
        "wp:comment_author" => Text(author),
        "wp:comment_author_email" => Text(author_email),
        "wp:comment_author_url" => Text(author_url),
        "wp:comment_author_IP" => Text(author_ip),
        "wp:comment_date" => Text(date),
        "wp:comment_date_gmt" => Text(date_gmt),
        "wp:comment_content" => Text(content),
        "wp:comment_approved" => Int(approved),
        "wp:comment_type" => Text(comment_type),
        "wp:comment_parent" => Int(parent),
        "wp:comment_user_id" => Int(user_id),
    })
});

/// Route one run of character data to the field named by `tag`.
///
/// An open comment takes precedence over its post. Returns whether a field
/// was assigned.
pub fn route(
    tag: &str,
    text: &str,
    post: Option<&mut WpPost>,
    comment: Option<&mut WpComment>,
) -> Result<bool, FieldError> {
    if let Some(comment) = comment {
        return assign(&COMMENT_FIELDS, comment, tag, text);
    }
    match post {
        Some(post) => assign(&POST_FIELDS, post, tag, text),
        None => Ok(false),
    }
}

fn assign<R>(table: &FieldTable<R>, record: &mut R, tag: &str, text: &str) -> Result<bool, FieldError> {
    match table.get(tag) {
        Some(slot) => slot.assign(record, tag, text).map(|()| true),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_post_text_fields() {
        let mut post = WpPost::default();
        assert!(route("title", "Hello", Some(&mut post), None).unwrap());
        assert!(route("content:encoded", "<p>Hi</p>", Some(&mut post), None).unwrap());
        assert!(route("wp:post_name", "hello", Some(&mut post), None).unwrap());

        assert_eq!(post.title.as_deref(), Some("Hello"));
        assert_eq!(post.content_encoded.as_deref(), Some("<p>Hi</p>"));
        assert_eq!(post.post_name.as_deref(), Some("hello"));
    }

    #[test]
    fn test_route_post_numeric_fields() {
        let mut post = WpPost::default();
        route("wp:post_id", "3469", Some(&mut post), None).unwrap();
        route("wp:menu_order", " 0\n", Some(&mut post), None).unwrap();
        route("wp:is_sticky", "1", Some(&mut post), None).unwrap();

        assert_eq!(post.post_id, Some(3469));
        assert_eq!(post.menu_order, Some(0));
        assert_eq!(post.is_sticky, Some(1));
    }

    #[test]
    fn test_route_bad_number_leaves_field_absent() {
        let mut post = WpPost::default();
        let err = route("wp:post_id", "abc", Some(&mut post), None).unwrap_err();

        assert_eq!(err.tag, "wp:post_id");
        assert_eq!(err.text, "abc");
        assert_eq!(post.post_id, None);
        assert!(err.to_string().contains("wp:post_id"));
    }

    #[test]
    fn test_route_first_category_wins() {
        let mut post = WpPost::default();
        route("category", "Announcement", Some(&mut post), None).unwrap();
        route("category", "rust", Some(&mut post), None).unwrap();
        assert_eq!(post.category.as_deref(), Some("Announcement"));
    }

    #[test]
    fn test_route_unknown_tag_ignored() {
        let mut post = WpPost::default();
        assert!(!route("wp:meta_key", "_edit_lock", Some(&mut post), None).unwrap());
        assert_eq!(post, WpPost::default());
    }

    #[test]
    fn test_route_comment_takes_precedence() {
        let mut post = WpPost::default();
        let mut comment = WpComment::default();

        route("wp:comment_id", "42", Some(&mut post), Some(&mut comment)).unwrap();
        route("wp:comment_author_IP", "112.113.114.115", Some(&mut post), Some(&mut comment))
            .unwrap();
        // post-level tag while a comment is open: not applied to either
        assert!(!route("title", "nope", Some(&mut post), Some(&mut comment)).unwrap());

        assert_eq!(comment.comment_id, Some(42));
        assert_eq!(comment.author_ip.as_deref(), Some("112.113.114.115"));
        assert_eq!(post.title, None);
    }

    #[test]
    fn test_route_without_records() {
        assert!(!route("title", "Channel", None, None).unwrap());
    }

    #[test]
    fn test_tables_cover_vocabulary() {
        assert_eq!(POST_FIELDS.len(), 21);
        assert_eq!(COMMENT_FIELDS.len(), 12);
        assert!(COMMENT_FIELDS.keys().all(|tag| tag.starts_with("wp:comment_")));
    }
}
