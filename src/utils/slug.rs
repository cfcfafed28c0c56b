//! URL slugs for converted pages.

/// Longest slug we generate, in bytes.
const MAX_SLUG_LEN: usize = 100;

/// Convert a title to a lowercase ASCII slug: `"Hello, Wörld!"` → `"hello-world"`.
///
/// Returns an empty string when nothing slug-worthy is left.
pub fn slugify(text: &str) -> String {
    let mut slug = slug::slugify(text);
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `preferred` if it is a usable slug, otherwise the slugified `title`.
pub fn page_slug(preferred: Option<&str>, title: Option<&str>) -> Option<String> {
    preferred
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| title.map(slugify).filter(|s| !s.is_empty()))
}
