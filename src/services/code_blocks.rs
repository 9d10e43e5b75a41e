//! Fenced code block tracking, used to veto page boundaries found inside examples.

const FENCE: &str = "```";

/// Returns whether `line_index` sits inside a fenced code block.
///
/// Every line strictly before `line_index` that starts with three backticks
/// toggles the state. This is a full scan; splitters use [`CodeFenceIndex`].
pub fn is_inside_code_block(lines: &[&str], line_index: usize) -> bool {
    lines
        .iter()
        .take(line_index)
        .filter(|line| line.starts_with(FENCE))
        .count()
        % 2
        == 1
}

/// Prefix count of fence lines, answering [`is_inside_code_block`] in O(1).
#[derive(Debug, Clone)]
pub struct CodeFenceIndex {
    // fences_before[i] = number of fence lines in lines[..i]
    fences_before: Vec<usize>,
}

impl CodeFenceIndex {
    pub fn new(lines: &[&str]) -> Self {
        let mut fences_before = Vec::with_capacity(lines.len() + 1);
        let mut count = 0;
        fences_before.push(count);
        for line in lines {
            if line.starts_with(FENCE) {
                count += 1;
            }
            fences_before.push(count);
        }

        Self { fences_before }
    }

    pub fn is_inside(&self, line_index: usize) -> bool {
        let idx = line_index.min(self.fences_before.len() - 1);
        self.fences_before[idx] % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "intro\n```js\n# not a title\n```\n# Real\n````\nnested\n";

    #[test]
    fn test_lines_between_fences_are_inside() {
        let lines: Vec<&str> = DOC.split('\n').collect();
        assert!(!is_inside_code_block(&lines, 0));
        assert!(!is_inside_code_block(&lines, 1));
        assert!(is_inside_code_block(&lines, 2));
        assert!(is_inside_code_block(&lines, 3));
        assert!(!is_inside_code_block(&lines, 4));
        assert!(is_inside_code_block(&lines, 6));
    }

    #[test]
    fn test_index_matches_full_scan() {
        let lines: Vec<&str> = DOC.split('\n').collect();
        let index = CodeFenceIndex::new(&lines);
        for i in 0..=lines.len() + 2 {
            assert_eq!(index.is_inside(i), is_inside_code_block(&lines, i), "line {}", i);
        }
    }

    #[test]
    fn test_indented_fence_does_not_toggle() {
        let lines = vec!["  ```", "# Title"];
        assert!(!is_inside_code_block(&lines, 1));
        assert!(!CodeFenceIndex::new(&lines).is_inside(1));
    }
}
