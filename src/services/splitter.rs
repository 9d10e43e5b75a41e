use crate::services::detector::detect_pattern;
use crate::services::parser::{split_pattern_a, split_pattern_b, split_pattern_c, split_pattern_d};
use crate::types::{FormatPattern, SplitResult};

/// Optional receiver for human-readable split diagnostics.
///
/// Messages are only formatted when a sink is attached, and nothing written
/// here affects the pages that come back.
pub struct DebugLog<'a> {
    sink: Option<&'a mut dyn FnMut(&str)>,
}

impl<'a> DebugLog<'a> {
    pub fn new(sink: Option<&'a mut dyn FnMut(&str)>) -> Self {
        Self { sink }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn log<F>(&mut self, message: F)
    where
        F: FnOnce() -> String,
    {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink(&message());
        }
    }
}

/// Splits an llms-full.txt dump into its pages.
///
/// Detects the layout once and runs the matching parser. Never fails: input
/// with no recognizable boundaries yields an empty page list.
///
/// ```
/// # use llms_splitter::{split, FormatPattern};
/// let result = split("# Concepts\nSource: https://axiom.co/docs/concepts\nBody", None);
/// assert_eq!(result.pattern, FormatPattern::PatternA);
/// assert_eq!(result.pages[0].output_path, "docs/concepts.md");
/// ```
pub fn split(content: &str, debug: Option<&mut dyn FnMut(&str)>) -> SplitResult {
    let mut debug = DebugLog::new(debug);

    let pattern = detect_pattern(content);
    debug.log(|| format!("detected pattern: {}", pattern));

    let pages = match pattern {
        FormatPattern::PatternA => split_pattern_a(content, &mut debug),
        FormatPattern::PatternB => split_pattern_b(content, &mut debug),
        FormatPattern::PatternC => split_pattern_c(content, &mut debug),
        FormatPattern::PatternD => split_pattern_d(content, &mut debug),
    };

    SplitResult { pattern, pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN_A: &str = include_str!("../../tests/fixtures/pattern-a.txt");
    const PATTERN_B: &str = include_str!("../../tests/fixtures/pattern-b.txt");
    const PATTERN_C: &str = include_str!("../../tests/fixtures/pattern-c.txt");
    const PATTERN_D: &str = include_str!("../../tests/fixtures/pattern-d.txt");

    fn titles(result: &SplitResult) -> Vec<&str> {
        result.pages.iter().map(|p| p.title.as_str()).collect()
    }

    fn output_paths(result: &SplitResult) -> Vec<&str> {
        result.pages.iter().map(|p| p.output_path.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let result = split("", None);
        assert_eq!(result.pattern, FormatPattern::PatternA);
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_text_without_markers() {
        let result = split("Just some random text without any page markers.", None);
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_single_pattern_a_page() {
        let result = split(
            "# Concepts\nSource: https://axiom.co/docs/ai-engineering/concepts\nBody text",
            None,
        );
        assert_eq!(result.pattern, FormatPattern::PatternA);
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].title, "Concepts");
        assert_eq!(result.pages[0].url, "https://axiom.co/docs/ai-engineering/concepts");
        assert_eq!(result.pages[0].output_path, "docs/ai-engineering/concepts.md");
    }

    #[test]
    fn test_pattern_a_fixture() {
        let result = split(PATTERN_A, None);

        assert_eq!(result.pattern, FormatPattern::PatternA);
        assert_eq!(titles(&result), vec!["Concepts", "Create", "Evaluation overview"]);
        assert_eq!(
            output_paths(&result),
            vec![
                "docs/ai-engineering/concepts.md",
                "docs/ai-engineering/create.md",
                "docs/ai-engineering/evaluate/overview.md",
            ]
        );

        let create = &result.pages[1];
        assert!(create.content.contains("// # Not a title"));
        assert!(create.content.contains("// Source: not a real source"));
        assert!(create.content.contains("# Not a page\nSource: https://axiom.co/docs/fake"));
    }

    #[test]
    fn test_pattern_b_fixture() {
        let result = split(PATTERN_B, None);

        assert_eq!(result.pattern, FormatPattern::PatternB);
        assert_eq!(
            titles(&result),
            vec![
                "404 - Page Not Found | Cloudflare Docs",
                "1.1.1.1 (DNS Resolver) · Cloudflare 1.1.1.1 docs",
                "Agents · Cloudflare Agents docs",
            ]
        );
        assert_eq!(result.pages[0].url, "https://developers.cloudflare.com/404/");
        assert_eq!(output_paths(&result), vec!["404.md", "1.1.1.1.md", "agents.md"]);
        assert!(result.pages[0].content.starts_with("---\ntitle: 404 - Page Not Found"));
        assert!(result.pages[0].content.contains("\n---\n\n# 404"));
    }

    #[test]
    fn test_pattern_c_fixture() {
        let result = split(PATTERN_C, None);

        assert_eq!(result.pattern, FormatPattern::PatternC);
        assert_eq!(titles(&result), vec!["Get started with Claude", "API Reference", "SDK Overview"]);
        assert_eq!(
            output_paths(&result),
            vec!["docs/en/get-started.md", "docs/en/api-reference.md", "docs/en/sdk.md"]
        );

        let api = &result.pages[1];
        assert!(api.content.contains("# Example code block"));
        assert!(api.content.contains("# This should not trigger a split"));
    }

    #[test]
    fn test_pattern_d_fixture() {
        let result = split(PATTERN_D, None);

        assert_eq!(result.pattern, FormatPattern::PatternD);
        assert_eq!(titles(&result), vec!["Account Management", "Deployments", "Projects"]);
        assert_eq!(
            output_paths(&result),
            vec!["docs/accounts.md", "docs/deployments.md", "docs/projects.md"]
        );
        assert!(result.pages[0].content.starts_with("# Account Management"));
        assert!(result.pages[1].content.contains("vercel deploy"));
        assert!(!result.pages[2].content.contains("----------"));
    }

    #[test]
    fn test_debug_sink_does_not_change_result() {
        let mut messages = Vec::new();
        let mut sink = |m: &str| messages.push(m.to_string());
        let observed = split(PATTERN_D, Some(&mut sink));

        assert_eq!(observed, split(PATTERN_D, None));
        assert_eq!(messages[0], "detected pattern: pattern-d");
        assert!(messages.iter().any(|m| m.starts_with("pattern-d dash lines: ")));
    }
}
