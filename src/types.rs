use crate::services::path_mapper::url_to_output_path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The four ways an llms-full.txt dump can concatenate its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatPattern {
    /// `# Title` immediately followed by `Source: <url>`
    #[serde(rename = "pattern-a")]
    PatternA,
    /// `<page>` blocks carrying `---` frontmatter
    #[serde(rename = "pattern-b")]
    PatternB,
    /// `# Title`, a blank line, then `URL: <url>`
    #[serde(rename = "pattern-c")]
    PatternC,
    /// metadata blocks fenced by 80-dash lines
    #[serde(rename = "pattern-d")]
    PatternD,
}

impl FormatPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatPattern::PatternA => "pattern-a",
            FormatPattern::PatternB => "pattern-b",
            FormatPattern::PatternC => "pattern-c",
            FormatPattern::PatternD => "pattern-d",
        }
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(rename = "outputPath")]
    pub output_path: String,
}

impl Page {
    /// Builds a page whose output path is derived from its URL.
    pub fn new(title: String, url: String, content: String) -> Self {
        let output_path = url_to_output_path(&url);
        Self {
            title,
            url,
            content,
            output_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    pub pattern: FormatPattern,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// One entry of the `index.json` tree. Files carry `path`, directories carry `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<IndexNode>>,
}

impl IndexNode {
    pub fn file(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File,
            path: Some(path),
            children: None,
        }
    }

    pub fn directory(name: &str, children: Vec<IndexNode>) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Directory,
            path: None,
            children: Some(children),
        }
    }
}

/// Top-level shape of `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub tree: Vec<IndexNode>,
}

impl IndexDocument {
    /// Every file path recorded in the tree, depth-first.
    pub fn file_paths(&self) -> Vec<String> {
        fn walk(nodes: &[IndexNode], out: &mut Vec<String>) {
            for node in nodes {
                if let Some(path) = &node.path {
                    out.push(path.clone());
                }
                if let Some(children) = &node.children {
                    walk(children, out);
                }
            }
        }

        let mut paths = Vec::new();
        walk(&self.tree, &mut paths);
        paths
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub source_type: SourceType,
    pub fetched_at: String,
    pub total_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    LocalFile,
    Url,
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub output_dir: PathBuf,
    pub flatten: bool,
    pub write_index: bool,
    pub force: bool,
    pub debug: bool,
}

/// What a write pass left on disk.
#[derive(Debug, Clone)]
pub struct WriteReport {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub index_file: Option<PathBuf>,
}
