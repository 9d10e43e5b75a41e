//! Page extraction for each of the four concatenation conventions.
//!
//! Every parser takes the whole document and returns pages in the order they
//! appear. Malformed blocks are skipped rather than reported.

use crate::services::code_blocks::CodeFenceIndex;
use crate::services::detector::{DASH_LINE, PAGE_BLOCK_RE};
use crate::services::splitter::DebugLog;
use crate::types::Page;
use regex::Regex;
use std::sync::LazyLock;

/// Boundaries logged per document before the parsers go quiet.
const DEBUG_SAMPLE: usize = 3;

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").unwrap());
static FM_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^title:\s*(.+)$").unwrap());
static FM_HTML_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*html:\s*(.+)$").unwrap());
static FM_MD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*md:\s*(.+)$").unwrap());
static META_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^title:\s*"?(.+?)"?$"#).unwrap());
static META_SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^source:\s*"?(.+?)"?$"#).unwrap());

/// A page whose start has been seen but whose end has not.
struct OpenPage {
    title: String,
    url: String,
    start_line: usize,
}

impl OpenPage {
    fn close(self, lines: &[&str], end_line: usize) -> Page {
        let content = lines[self.start_line..end_line].join("\n").trim().to_string();
        Page::new(self.title, self.url, content)
    }
}

/// Pattern A: `# Title` immediately followed by `Source: <url>`.
pub fn split_pattern_a(content: &str, debug: &mut DebugLog<'_>) -> Vec<Page> {
    split_on_headings(content, "pattern-a", debug, |lines, i| {
        let title = lines[i].strip_prefix("# ")?;
        let url = lines.get(i + 1)?.strip_prefix("Source: ")?;
        Some((title.trim().to_string(), url.trim().to_string()))
    })
}

/// Pattern C: `# Title`, a blank line, then `URL: <url>`.
pub fn split_pattern_c(content: &str, debug: &mut DebugLog<'_>) -> Vec<Page> {
    split_on_headings(content, "pattern-c", debug, |lines, i| {
        let title = lines[i].strip_prefix("# ")?;
        if !lines.get(i + 1)?.trim().is_empty() {
            return None;
        }
        let url = lines.get(i + 2)?.strip_prefix("URL: ")?;
        Some((title.trim().to_string(), url.trim().to_string()))
    })
}

/// Shared scan for the heading-delimited conventions.
///
/// `boundary` inspects line `i` and yields `(title, url)` when a page starts
/// there. Candidates inside fenced code are ignored.
fn split_on_headings<F>(content: &str, label: &str, debug: &mut DebugLog<'_>, boundary: F) -> Vec<Page>
where
    F: Fn(&[&str], usize) -> Option<(String, String)>,
{
    let lines: Vec<&str> = content.split('\n').collect();
    let fences = CodeFenceIndex::new(&lines);
    let mut pages = Vec::new();
    let mut current: Option<OpenPage> = None;
    let mut logged = 0;

    for i in 0..lines.len() {
        let Some((title, url)) = boundary(&lines, i) else {
            continue;
        };
        if fences.is_inside(i) {
            continue;
        }

        if let Some(open) = current.take() {
            pages.push(open.close(&lines, i));
        }

        if logged < DEBUG_SAMPLE {
            debug.log(|| {
                format!("{} boundary at line {}: title=\"{}\" url=\"{}\"", label, i + 1, title, url)
            });
            logged += 1;
        }

        current = Some(OpenPage {
            title,
            url,
            start_line: i,
        });
    }

    if let Some(open) = current {
        pages.push(open.close(&lines, lines.len()));
    }

    pages
}

/// Pattern B: `<page>` blocks whose body opens with `---` frontmatter.
///
/// The frontmatter supplies `title:` (default `Untitled`) and the source URL,
/// preferring `html:` over `md:`. Blocks without frontmatter or a URL are skipped.
pub fn split_pattern_b(content: &str, debug: &mut DebugLog<'_>) -> Vec<Page> {
    let mut pages = Vec::new();

    for block in PAGE_BLOCK_RE.captures_iter(content) {
        let inner = block.get(1).map_or("", |m| m.as_str()).trim();
        let Some(parts) = FRONTMATTER_RE.captures(inner) else {
            continue;
        };
        let frontmatter = parts.get(1).map_or("", |m| m.as_str());
        let body = parts.get(2).map_or("", |m| m.as_str()).trim();

        let title = FM_TITLE_RE
            .captures(frontmatter)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        let url = FM_HTML_RE
            .captures(frontmatter)
            .or_else(|| FM_MD_RE.captures(frontmatter))
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        if url.is_empty() {
            continue;
        }

        if pages.len() < DEBUG_SAMPLE {
            debug.log(|| {
                format!("pattern-b page {}: title=\"{}\" url=\"{}\"", pages.len() + 1, title, url)
            });
        }

        let content = format!("---\n{}\n---\n\n{}", frontmatter, body);
        pages.push(Page::new(title, url, content));
    }

    pages
}

/// Pattern D: metadata blocks fenced by a pair of 80-dash lines.
///
/// Dash lines are consumed two at a time; an unpaired trailing one is ignored.
/// A block's body runs until the next block's opening dash line.
pub fn split_pattern_d(content: &str, debug: &mut DebugLog<'_>) -> Vec<Page> {
    let lines: Vec<&str> = content.split('\n').collect();
    let dash_indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == DASH_LINE)
        .map(|(i, _)| i)
        .collect();

    debug.log(|| format!("pattern-d dash lines: {}", dash_indices.len()));
    if let Some(first) = dash_indices.first() {
        debug.log(|| format!("pattern-d first dash line at line {}", first + 1));
    }

    let mut pages = Vec::new();
    let mut logged = 0;

    for (p, chunk) in dash_indices.chunks(2).enumerate() {
        let &[meta_start, meta_end] = chunk else {
            continue;
        };

        let mut title = String::new();
        let mut url = String::new();
        for line in &lines[meta_start + 1..meta_end] {
            let trimmed = line.trim();
            if let Some(c) = META_TITLE_RE.captures(trimmed) {
                title = c[1].to_string();
            }
            if let Some(c) = META_SOURCE_RE.captures(trimmed) {
                url = c[1].to_string();
            }
        }

        let content_end = dash_indices.get(2 * p + 2).copied().unwrap_or(lines.len());
        let page_content = lines[meta_end + 1..content_end].join("\n").trim().to_string();

        if logged < DEBUG_SAMPLE {
            debug.log(|| {
                format!(
                    "pattern-d block {}: meta lines {}-{} title=\"{}\" source=\"{}\" contentLines={}",
                    logged + 1,
                    meta_start + 1,
                    meta_end + 1,
                    if title.is_empty() { "<none>" } else { title.as_str() },
                    if url.is_empty() { "<none>" } else { url.as_str() },
                    content_end.saturating_sub(meta_end + 1)
                )
            });
            logged += 1;
        }

        if !title.is_empty() && !url.is_empty() && !page_content.is_empty() {
            pages.push(Page::new(title, url, page_content));
        }
    }

    pages
}
