//! # llms-full.txt Splitter Library
//!
//! Splits a concatenated documentation dump (an `llms-full.txt` style file)
//! into one markdown file per page, laid out by each page's source URL.
//!
//! Four concatenation conventions are recognized:
//!
//! - **pattern-a**: `# Title` followed by `Source: <url>`
//! - **pattern-b**: `<page>` blocks with `---` frontmatter
//! - **pattern-c**: `# Title`, a blank line, then `URL: <url>`
//! - **pattern-d**: metadata blocks between 80-dash separator lines
//!
//! ## Example Usage
//!
//! ```rust
//! use llms_splitter::{build_index_json, split, FormatPattern};
//!
//! let dump = "# Concepts\nSource: https://axiom.co/docs/ai-engineering/concepts\nBody text";
//! let result = split(dump, None);
//!
//! assert_eq!(result.pattern, FormatPattern::PatternA);
//! assert_eq!(result.pages[0].output_path, "docs/ai-engineering/concepts.md");
//!
//! let paths: Vec<&str> = result.pages.iter().map(|p| p.output_path.as_str()).collect();
//! let index = build_index_json(&paths, Some("llms-full.txt"), None).unwrap();
//! assert!(index.ends_with("}\n"));
//! ```
//!
//! The splitting core performs no I/O; [`ContentFetcher`] and [`OutputWriter`]
//! handle reading inputs and writing the resulting tree.

pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{Result, SplitterError};
pub use services::{
    build_index_json, build_index_tree, detect_pattern, is_inside_code_block, split, url_to_output_path,
    ContentFetcher, OutputWriter,
};
pub use types::{
    DocumentMetadata, FormatPattern, IndexDocument, IndexNode, NodeKind, Page, SourceType, SplitConfig, SplitResult,
    WriteReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
