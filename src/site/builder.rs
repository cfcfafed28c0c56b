//! In-memory site data builder.
//!
//! Pages and posts are appended in call order; post ids count up from
//! `[site].first_post_id`. Page ids and page paths (folder + slug) are
//! unique. No clock, no randomness: the same calls always produce the same
//! `SiteData`.

use super::types::{
    BODY_NR, FIRST_REPLY_NR, PagePath, PageRecord, PageSpec, PostRecord, PostSpec, SiteData,
    SitePage, SitePost, TITLE_NR,
};
use crate::config::SiteConfig;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// Rejected builder calls. Fatal for the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("page `{0}` already exists")]
    DuplicatePage(String),

    #[error("path `{folder}{slug}` is already taken")]
    DuplicatePath { folder: String, slug: String },

    #[error("no page `{0}` to add a post to")]
    UnknownPage(String),

    #[error("post nr {nr} is reserved for titles and bodies")]
    ReservedNr { nr: i32 },

    #[error("page `{page_id}` already has a post nr {nr}")]
    DuplicatePostNr { page_id: String, nr: i32 },

    #[error("page `{page_id}` has no post nr {parent_nr} to reply to")]
    UnknownParent { page_id: String, parent_nr: i32 },
}

/// The site-data contract the record mapper writes to.
pub trait SiteBuilder {
    /// Create a page, including its title and body posts.
    fn add_page(&mut self, spec: PageSpec) -> Result<PageRecord, BuilderError>;

    /// Add a reply to an existing page.
    fn add_post(&mut self, spec: PostSpec) -> Result<PostRecord, BuilderError>;

    /// Everything added so far.
    fn site(&self) -> &SiteData;
}

/// Default [`SiteBuilder`], accumulating into a [`SiteData`].
#[derive(Debug)]
pub struct SiteDataBuilder {
    site: SiteData,
    next_post_id: i64,
    default_time_ms: i64,
    /// Post nrs in use per page id.
    page_nrs: FxHashMap<String, FxHashSet<i32>>,
    /// `(folder, slug)` of every page path.
    paths: FxHashSet<(String, String)>,
}

impl SiteDataBuilder {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            site: SiteData::default(),
            next_post_id: config.first_post_id,
            default_time_ms: config.created_at_ms,
            page_nrs: FxHashMap::default(),
            paths: FxHashSet::default(),
        }
    }

    fn next_post_id(&mut self) -> i64 {
        let id = self.next_post_id;
        self.next_post_id += 1;
        id
    }
}

impl SiteBuilder for SiteDataBuilder {
    fn add_page(&mut self, spec: PageSpec) -> Result<PageRecord, BuilderError> {
        if self.page_nrs.contains_key(&spec.id) {
            return Err(BuilderError::DuplicatePage(spec.id));
        }
        let (folder, slug) = (spec.folder, spec.slug);
        if !self.paths.insert((folder.clone(), slug.clone())) {
            return Err(BuilderError::DuplicatePath { folder, slug });
        }

        let created_at_ms = spec.created_at_ms.unwrap_or(self.default_time_ms);
        let bumped_at_ms = spec.bumped_at_ms.unwrap_or(created_at_ms);
        let path = PagePath {
            folder,
            page_id: spec.id.clone(),
            show_id: spec.show_id,
            slug,
            canonical: true,
        };

        self.site.pages.push(SitePage {
            id: spec.id.clone(),
            page_type: spec.role.code(),
            version: 1,
            category_id: spec.category_id,
            author_id: spec.author_id,
            created_at_ms,
            updated_at_ms: created_at_ms,
            published_at_ms: created_at_ms,
            bumped_at_ms,
        });
        self.site.page_paths.push(path.clone());

        let title_id = self.next_post_id();
        let body_id = self.next_post_id();
        self.site.posts.push(SitePost::approved(
            title_id,
            &spec.id,
            TITLE_NR,
            None,
            spec.author_id,
            created_at_ms,
            spec.title,
            None,
        ));
        self.site.posts.push(SitePost::approved(
            body_id,
            &spec.id,
            BODY_NR,
            None,
            spec.author_id,
            created_at_ms,
            spec.body,
            None,
        ));
        self.page_nrs
            .insert(spec.id.clone(), FxHashSet::from_iter([TITLE_NR, BODY_NR]));

        Ok(PageRecord {
            id: spec.id,
            role: spec.role,
            category_id: spec.category_id,
            author_id: spec.author_id,
            created_at_ms,
            bumped_at_ms,
            path,
        })
    }

    fn add_post(&mut self, spec: PostSpec) -> Result<PostRecord, BuilderError> {
        if spec.nr < FIRST_REPLY_NR {
            return Err(BuilderError::ReservedNr { nr: spec.nr });
        }
        let Some(nrs) = self.page_nrs.get_mut(&spec.page_id) else {
            return Err(BuilderError::UnknownPage(spec.page_id));
        };
        if nrs.contains(&spec.nr) {
            return Err(BuilderError::DuplicatePostNr {
                page_id: spec.page_id,
                nr: spec.nr,
            });
        }
        if spec.parent_nr == TITLE_NR || !nrs.contains(&spec.parent_nr) {
            return Err(BuilderError::UnknownParent {
                page_id: spec.page_id,
                parent_nr: spec.parent_nr,
            });
        }
        nrs.insert(spec.nr);

        let created_at_ms = spec.created_at_ms.unwrap_or(self.default_time_ms);
        let id = self.next_post_id();
        self.site.posts.push(SitePost::approved(
            id,
            &spec.page_id,
            spec.nr,
            Some(spec.parent_nr),
            spec.author_id,
            created_at_ms,
            spec.approved_source,
            spec.approved_html,
        ));

        Ok(PostRecord {
            id,
            page_id: spec.page_id,
            nr: spec.nr,
            parent_nr: spec.parent_nr,
            created_at_ms,
        })
    }

    fn site(&self) -> &SiteData {
        &self.site
    }
}
