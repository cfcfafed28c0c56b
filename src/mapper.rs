//! Completed blog posts → Talkyard pages and replies.
//!
//! # Modes
//!
//! | Mode          | Page                                  | Replies                    |
//! |---------------|---------------------------------------|----------------------------|
//! | `placeholder` | canned title/body/slug from config    | one canned reply           |
//! | `content`     | post title, content, slug, date       | one per approved comment   |
//!
//! Page ids come from a per-run counter in both modes, so every post gets a
//! page of its own. Slugs are made unique per run by appending `-2`, `-3`, ...
//! (placeholder mode would otherwise put every page at `/extra-page`).

use crate::config::{MappingConfig, MappingMode};
use crate::export::{PostSink, WpComment, WpPost};
use crate::site::{
    BODY_NR, BuilderError, FIRST_REPLY_NR, PageRecord, PageRole, PageSpec, PostRecord, PostSpec,
    SiteBuilder,
};
use crate::utils::{date::first_timestamp_ms, slug::page_slug};
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};

const UNTITLED: &str = "Untitled";

/// The page and replies created for one blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPost {
    pub page: PageRecord,
    pub replies: Vec<PostRecord>,
}

pub struct RecordMapper<'a> {
    config: &'a MappingConfig,
    pages_mapped: u64,
    slugs: FxHashSet<String>,
}

impl<'a> RecordMapper<'a> {
    pub fn new(config: &'a MappingConfig) -> Self {
        Self {
            config,
            pages_mapped: 0,
            slugs: FxHashSet::default(),
        }
    }

    /// Create the page for `post`, then its replies, through `builder`.
    pub fn map<B: SiteBuilder>(
        &mut self,
        post: &WpPost,
        builder: &mut B,
    ) -> Result<MappedPost, BuilderError> {
        self.pages_mapped += 1;
        let page_id = self.pages_mapped.to_string();

        let (mut page_spec, reply_specs) = match self.config.mode {
            MappingMode::Placeholder => self.placeholder(page_id),
            MappingMode::Content => self.content(page_id, post),
        };
        page_spec.slug = self.unique_slug(page_spec.slug);

        let page = builder.add_page(page_spec)?;
        let replies = reply_specs
            .into_iter()
            .map(|spec| builder.add_post(spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MappedPost { page, replies })
    }

    fn unique_slug(&mut self, slug: String) -> String {
        let mut candidate = slug.clone();
        let mut n = 1;
        while !self.slugs.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{slug}-{n}");
        }
        candidate
    }

    fn page_spec(&self, id: String, slug: String, title: String, body: String) -> PageSpec {
        PageSpec {
            id,
            folder: self.config.folder.clone(),
            slug,
            show_id: false,
            role: PageRole::Discussion,
            title,
            body,
            category_id: self.config.category_id,
            author_id: self.config.unknown_author_id,
            created_at_ms: None,
            bumped_at_ms: None,
        }
    }

    fn placeholder(&self, page_id: String) -> (PageSpec, Vec<PostSpec>) {
        let texts = &self.config.placeholder;
        let reply = PostSpec {
            page_id: page_id.clone(),
            nr: FIRST_REPLY_NR,
            parent_nr: BODY_NR,
            author_id: self.config.reply_author_id,
            approved_source: texts.reply.clone(),
            approved_html: None,
            created_at_ms: None,
        };
        let page = self.page_spec(
            page_id,
            texts.slug.clone(),
            texts.title.clone(),
            texts.body.clone(),
        );
        (page, vec![reply])
    }

    fn content(&self, page_id: String, post: &WpPost) -> (PageSpec, Vec<PostSpec>) {
        let title = post
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);
        let body = post
            .content_encoded
            .as_deref()
            .or(post.description.as_deref())
            .unwrap_or_default();
        let slug = page_slug(post.post_name.as_deref(), Some(title))
            .unwrap_or_else(|| format!("post-{page_id}"));

        let replies = self.replies(&page_id, &post.comments);

        let mut page = self.page_spec(page_id, slug, title.to_owned(), body.to_owned());
        page.created_at_ms = first_timestamp_ms([
            post.post_date_gmt.as_deref(),
            post.pub_date.as_deref(),
        ]);
        page.bumped_at_ms = replies
            .iter()
            .filter_map(|reply| reply.created_at_ms)
            .max()
            .or(page.created_at_ms);

        (page, replies)
    }

    /// Approved comments in document order. A reply's parent is the reply
    /// made from the comment it answers, or the page body when that comment
    /// was not mapped (unapproved, or later in the export).
    fn replies(&self, page_id: &str, comments: &[WpComment]) -> Vec<PostSpec> {
        let mut nr_by_comment_id: FxHashMap<i64, i32> = FxHashMap::default();
        let mut next_nr = FIRST_REPLY_NR;

        comments
            .iter()
            .filter(|comment| comment.is_approved())
            .map(|comment| {
                let nr = next_nr;
                next_nr += 1;

                let parent_nr = comment
                    .parent_comment_id()
                    .and_then(|id| nr_by_comment_id.get(&id).copied())
                    .unwrap_or(BODY_NR);
                if let Some(id) = comment.comment_id {
                    nr_by_comment_id.entry(id).or_insert(nr);
                }

                PostSpec {
                    page_id: page_id.to_owned(),
                    nr,
                    parent_nr,
                    author_id: self.config.reply_author_id,
                    approved_source: comment.content.clone().unwrap_or_default(),
                    approved_html: None,
                    created_at_ms: first_timestamp_ms([comment.date_gmt.as_deref()]),
                }
            })
            .collect()
    }
}

/// [`PostSink`] mapping each completed post straight into a builder.
pub struct MappingSink<'a, B> {
    mapper: RecordMapper<'a>,
    builder: B,
    pages: usize,
    replies: usize,
}

impl<'a, B: SiteBuilder> MappingSink<'a, B> {
    pub fn new(config: &'a MappingConfig, builder: B) -> Self {
        Self {
            mapper: RecordMapper::new(config),
            builder,
            pages: 0,
            replies: 0,
        }
    }

    /// Pages and replies created so far.
    pub fn counts(&self) -> (usize, usize) {
        (self.pages, self.replies)
    }

    pub fn into_builder(self) -> B {
        self.builder
    }
}

impl<B: SiteBuilder> PostSink for MappingSink<'_, B> {
    fn post_completed(&mut self, _index: usize, post: &WpPost) -> Result<()> {
        let mapped = self.mapper.map(post, &mut self.builder)?;
        self.pages += 1;
        self.replies += mapped.replies.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConverterConfig, defaults};
    use crate::site::{SYSTEM_USER_ID, SiteData, SiteDataBuilder, UNKNOWN_USER_ID};

    fn builder() -> SiteDataBuilder {
        SiteDataBuilder::new(&ConverterConfig::default().site)
    }

    fn config(mode: MappingMode) -> MappingConfig {
        let mut config = MappingConfig::default();
        config.mode = mode;
        config
    }

    fn comment(id: i64, parent: i64, approved: i64, content: &str) -> WpComment {
        WpComment {
            comment_id: Some(id),
            parent: Some(parent),
            approved: Some(approved),
            content: Some(content.into()),
            ..WpComment::default()
        }
    }

    fn hello_post() -> WpPost {
        WpPost {
            title: Some("Hello".into()),
            post_name: Some("hello-there".into()),
            content_encoded: Some("<p>Hi</p>".into()),
            post_date_gmt: Some("2016-01-10 03:53:01".into()),
            comments: vec![comment(42, 0, 1, "First!")],
            ..WpPost::default()
        }
    }

    #[test]
    fn test_placeholder_page_and_reply() {
        let config = config(MappingMode::Placeholder);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let mapped = mapper.map(&hello_post(), &mut builder).unwrap();

        assert_eq!(mapped.page.id, "1");
        assert_eq!(mapped.page.role, PageRole::Discussion);
        assert_eq!(mapped.page.category_id, 2);
        assert_eq!(mapped.page.author_id, UNKNOWN_USER_ID);
        assert_eq!(mapped.page.path.slug, "extra-page");
        assert_eq!(mapped.replies.len(), 1);
        assert_eq!(mapped.replies[0].nr, FIRST_REPLY_NR);
        assert_eq!(mapped.replies[0].parent_nr, BODY_NR);

        let site = builder.site();
        assert_eq!(site.posts[0].approved_source, defaults::mapping::placeholder::title());
        let reply = site.replies().next().unwrap();
        assert_eq!(reply.created_by_id, SYSTEM_USER_ID);
        assert_eq!(reply.approved_source, defaults::mapping::placeholder::reply());
    }

    #[test]
    fn test_placeholder_ignores_content() {
        let config = config(MappingMode::Placeholder);
        let mut mapper = RecordMapper::new(&config);
        let mut a = builder();
        let mut b = builder();

        mapper.map(&hello_post(), &mut a).unwrap();
        let mut mapper = RecordMapper::new(&config);
        mapper.map(&WpPost::default(), &mut b).unwrap();

        assert_eq!(a.site(), b.site());
    }

    #[test]
    fn test_page_ids_unique_per_run() {
        let config = config(MappingMode::Placeholder);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        for _ in 0..3 {
            mapper.map(&WpPost::default(), &mut builder).unwrap();
        }
        let ids: Vec<_> = builder.site().pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        let slugs: Vec<_> = builder.site().page_paths.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["extra-page", "extra-page-2", "extra-page-3"]);
    }

    #[test]
    fn test_content_slug_collisions_resolved() {
        let config = config(MappingMode::Content);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let titled = |title: &str, name: Option<&str>| WpPost {
            title: Some(title.into()),
            post_name: name.map(Into::into),
            ..WpPost::default()
        };
        for post in [
            titled("News", None),
            titled("News!", None),
            titled("Other", Some("news-2")),
        ] {
            mapper.map(&post, &mut builder).unwrap();
        }

        let slugs: Vec<_> = builder.site().page_paths.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["news", "news-2", "news-2-2"]);
    }

    #[test]
    fn test_content_page_fields() {
        let config = config(MappingMode::Content);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let mapped = mapper.map(&hello_post(), &mut builder).unwrap();
        let site: &SiteData = builder.site();

        assert_eq!(mapped.page.path.slug, "hello-there");
        assert_eq!(mapped.page.created_at_ms, 1_452_397_981_000);
        assert_eq!(site.posts[0].approved_source, "Hello");
        assert_eq!(site.posts[1].approved_source, "<p>Hi</p>");
        let reply = site.replies().next().unwrap();
        assert_eq!(reply.approved_source, "First!");
        assert_eq!(reply.parent_nr, Some(BODY_NR));
    }

    #[test]
    fn test_content_fallbacks() {
        let config = config(MappingMode::Content);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let post = WpPost {
            description: Some("Summary".into()),
            post_date_gmt: Some("0000-00-00 00:00:00".into()),
            ..WpPost::default()
        };
        let mapped = mapper.map(&post, &mut builder).unwrap();

        assert_eq!(mapped.page.path.slug, "untitled");
        assert_eq!(mapped.page.created_at_ms, defaults::site::created_at_ms());
        assert_eq!(builder.site().posts[0].approved_source, UNTITLED);
        assert_eq!(builder.site().posts[1].approved_source, "Summary");
        assert!(mapped.replies.is_empty());
    }

    #[test]
    fn test_content_threads_approved_comments() {
        let config = config(MappingMode::Content);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let mut post = hello_post();
        post.comments = vec![
            comment(10, 0, 1, "top"),
            comment(11, 0, 0, "spam"),
            comment(12, 10, 1, "reply to top"),
            comment(13, 11, 1, "reply to spam"),
            comment(14, 12, 1, "deeper"),
        ];
        let mapped = mapper.map(&post, &mut builder).unwrap();

        let shape: Vec<_> = mapped.replies.iter().map(|r| (r.nr, r.parent_nr)).collect();
        assert_eq!(shape, [(2, BODY_NR), (3, 2), (4, BODY_NR), (5, 3)]);
    }

    #[test]
    fn test_content_bumped_at_latest_reply() {
        let config = config(MappingMode::Content);
        let mut mapper = RecordMapper::new(&config);
        let mut builder = builder();

        let mut post = hello_post();
        post.comments[0].date_gmt = Some("2016-01-11 00:00:00".into());
        let mapped = mapper.map(&post, &mut builder).unwrap();

        assert_eq!(mapped.page.bumped_at_ms, 1_452_470_400_000);
        assert!(mapped.page.bumped_at_ms > mapped.page.created_at_ms);
    }

    #[test]
    fn test_builder_error_propagates() {
        struct Full(SiteData);
        impl SiteBuilder for Full {
            fn add_page(&mut self, spec: PageSpec) -> Result<PageRecord, BuilderError> {
                Err(BuilderError::DuplicatePage(spec.id))
            }
            fn add_post(&mut self, spec: PostSpec) -> Result<PostRecord, BuilderError> {
                Err(BuilderError::UnknownPage(spec.page_id))
            }
            fn site(&self) -> &SiteData {
                &self.0
            }
        }

        let config = config(MappingMode::Placeholder);
        let mut sink = MappingSink::new(&config, Full(SiteData::default()));
        let err = sink.post_completed(0, &WpPost::default()).unwrap_err();
        assert!(err.to_string().contains("page `1` already exists"));
        assert_eq!(sink.counts(), (0, 0));
    }

    #[test]
    fn test_sink_counts() {
        let config = config(MappingMode::Content);
        let mut sink = MappingSink::new(&config, builder());
        sink.post_completed(0, &hello_post()).unwrap();
        sink.post_completed(1, &WpPost::default()).unwrap();

        assert_eq!(sink.counts(), (2, 1));
        assert_eq!(sink.into_builder().site().pages.len(), 2);
    }
}
