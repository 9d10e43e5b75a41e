//! Maps a page's source URL onto a relative output path.

use url::Url;

/// Converts a page URL into the relative `.md` path its content is written to.
///
/// Only the URL path is used; query strings and fragments are ignored.
/// Unparseable input is sanitized instead of rejected.
///
/// # Examples
///
/// ```
/// # use llms_splitter::url_to_output_path;
/// assert_eq!(
///     url_to_output_path("https://axiom.co/docs/ai-engineering/concepts"),
///     "docs/ai-engineering/concepts.md"
/// );
/// assert_eq!(url_to_output_path("https://example.com/"), "index.md");
/// assert_eq!(url_to_output_path("not a url"), "not_a_url.md");
/// ```
pub fn url_to_output_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path();
            let path = path.strip_prefix('/').unwrap_or(path);
            let path = path.strip_suffix('/').unwrap_or(path);
            let path = if path.is_empty() { "index" } else { path };
            let path = strip_page_extension(path);

            format!("{}.md", path)
        }
        Err(_) => format!("{}.md", sanitize(url)),
    }
}

fn strip_page_extension(path: &str) -> &str {
    path.strip_suffix(".md")
        .or_else(|| path.strip_suffix(".html"))
        .unwrap_or(path)
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
