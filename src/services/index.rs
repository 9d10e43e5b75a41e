//! Builds the `index.json` manifest describing the split output tree.

use crate::error::Result;
use crate::types::{IndexDocument, IndexNode, NodeKind};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Trie node keyed by path segment.
///
/// A node may be a file and have children at the same time, when one path
/// ends where another keeps going (`docs` and `docs/intro.md`).
#[derive(Debug, Default)]
struct TreeNode {
    is_file: bool,
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, parts: &[&str]) {
        let Some((first, rest)) = parts.split_first() else {
            return;
        };
        let child = self.children.entry((*first).to_string()).or_default();
        if rest.is_empty() {
            child.is_file = true;
        } else {
            child.insert(rest);
        }
    }

    fn to_index_nodes(&self, parent_path: &str) -> Vec<IndexNode> {
        let mut nodes = Vec::new();

        for (name, child) in &self.children {
            let child_path = if parent_path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", parent_path, name)
            };

            if !child.children.is_empty() {
                nodes.push(IndexNode::directory(name, child.to_index_nodes(&child_path)));
            }
            if child.is_file {
                nodes.push(IndexNode::file(name, child_path));
            }
        }

        nodes.sort_by(compare_nodes);
        nodes
    }
}

fn compare_nodes(a: &IndexNode, b: &IndexNode) -> Ordering {
    let rank = |node: &IndexNode| match node.kind {
        NodeKind::Directory => 0,
        NodeKind::File => 1,
    };

    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/").trim().to_string()
}

/// Builds the sorted directory/file tree for a flat list of relative paths.
///
/// Back-slashes are treated as separators and duplicate paths collapse.
/// Directories sort before files, then names compare case-insensitively.
pub fn build_index_tree<S: AsRef<str>>(paths: &[S]) -> Vec<IndexNode> {
    let mut seen = HashSet::new();
    let mut root = TreeNode::default();

    for raw in paths {
        let normalized = normalize_path(raw.as_ref());
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            continue;
        }
        let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
        root.insert(&parts);
    }

    root.to_index_nodes("")
}

/// Renders `index.json`: `{ name?, source?, tree }`, two-space indented with a trailing newline.
pub fn build_index_json<S: AsRef<str>>(paths: &[S], source: Option<&str>, name: Option<&str>) -> Result<String> {
    let document = IndexDocument {
        name: name.filter(|n| !n.is_empty()).map(str::to_string),
        source: source.filter(|s| !s.is_empty()).map(str::to_string),
        tree: build_index_tree(paths),
    };

    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_index_with_source() {
        let output = build_index_json(
            &["docs/guide.md", "docs/api/index.md", "index.md"],
            Some("https://example.com/llms-full.txt"),
            Some("example.com"),
        )
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            parsed,
            json!({
                "name": "example.com",
                "source": "https://example.com/llms-full.txt",
                "tree": [
                    {
                        "name": "docs",
                        "type": "directory",
                        "children": [
                            {
                                "name": "api",
                                "type": "directory",
                                "children": [
                                    { "name": "index.md", "type": "file", "path": "docs/api/index.md" }
                                ]
                            },
                            { "name": "guide.md", "type": "file", "path": "docs/guide.md" }
                        ]
                    },
                    { "name": "index.md", "type": "file", "path": "index.md" }
                ]
            })
        );
    }

    #[test]
    fn test_output_formatting() {
        let output = build_index_json(&["a.md"], None, None).unwrap();
        assert_eq!(
            output,
            "{\n  \"tree\": [\n    {\n      \"name\": \"a.md\",\n      \"type\": \"file\",\n      \"path\": \"a.md\"\n    }\n  ]\n}\n"
        );
    }

    #[test]
    fn test_backslashes_and_duplicates() {
        let tree = build_index_tree(&["guides\\setup.md", "guides/setup.md", " ", "guides//setup.md"]);

        assert_eq!(tree.len(), 1);
        let children = tree[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path.as_deref(), Some("guides/setup.md"));
    }

    #[test]
    fn test_case_insensitive_order() {
        let tree = build_index_tree(&["beta.md", "Alpha.md", "zeta/x.md", "Gamma/y.md"]);
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "zeta", "Alpha.md", "beta.md"]);
    }

    #[test]
    fn test_file_and_directory_on_same_node() {
        let tree = build_index_tree(&["docs", "docs/intro.md"]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].kind, NodeKind::Directory);
        assert_eq!(tree[0].name, "docs");
        assert_eq!(tree[0].children.as_ref().unwrap()[0].path.as_deref(), Some("docs/intro.md"));
        assert_eq!(tree[1].kind, NodeKind::File);
        assert_eq!(tree[1].path.as_deref(), Some("docs"));
    }

    #[test]
    fn test_manifest_paths_round_trip() {
        let output = build_index_json(&["b/c.md", "a.md"], None, Some("site")).unwrap();
        let document: IndexDocument = serde_json::from_str(&output).unwrap();
        assert_eq!(document.name.as_deref(), Some("site"));
        assert_eq!(document.file_paths(), vec!["b/c.md", "a.md"]);
    }
}
