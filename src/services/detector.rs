use crate::types::FormatPattern;
use regex::Regex;
use std::sync::LazyLock;

/// Separator line used by dash-delimited dumps: exactly 80 dashes.
pub const DASH_LINE: &str =
    "--------------------------------------------------------------------------------";

/// How many leading lines are inspected to tell pattern-a from pattern-c.
const HEADER_SCAN_LINES: usize = 100;

pub(crate) static PAGE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<page>(.*?)</page>").unwrap());

/// Classifies a document into one of the four page conventions.
///
/// Checks run in a fixed priority order and the first hit wins:
/// dash separators, then `<page>` blocks, then the heading shape of the
/// first hundred lines. Anything unrecognized is treated as pattern-a.
pub fn detect_pattern(content: &str) -> FormatPattern {
    let lines: Vec<&str> = content.split('\n').collect();

    let dash_count = lines.iter().filter(|line| line.trim() == DASH_LINE).count();
    if dash_count >= 2 {
        return FormatPattern::PatternD;
    }

    if PAGE_BLOCK_RE.is_match(content) {
        return FormatPattern::PatternB;
    }

    let first_lines = &lines[..lines.len().min(HEADER_SCAN_LINES)];
    for i in 0..first_lines.len().saturating_sub(2) {
        if !first_lines[i].starts_with("# ") {
            continue;
        }
        let next_line = first_lines[i + 1];
        let line_after = first_lines[i + 2];

        if next_line.starts_with("Source: ") {
            return FormatPattern::PatternA;
        }
        if next_line.trim().is_empty() && line_after.starts_with("URL: ") {
            return FormatPattern::PatternC;
        }
    }

    FormatPattern::PatternA
}
