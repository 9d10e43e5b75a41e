pub mod code_blocks;
pub mod detector;
pub mod fetcher;
pub mod index;
pub mod parser;
pub mod path_mapper;
pub mod splitter;
pub mod writer;

pub use code_blocks::{is_inside_code_block, CodeFenceIndex};
pub use detector::{detect_pattern, DASH_LINE};
pub use fetcher::{ContentFetcher, MAX_CONCURRENT_DOWNLOADS};
pub use index::{build_index_json, build_index_tree};
pub use path_mapper::url_to_output_path;
pub use splitter::{split, DebugLog};
pub use writer::{OutputWriter, INDEX_FILE};
