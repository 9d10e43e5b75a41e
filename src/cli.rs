use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "llms-split")]
#[command(about = "Split llms-full.txt documentation dumps into one markdown file per page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split an llms-full.txt file or URL into per-page files
    Split(SplitArgs),

    /// Fetch every page of a link list (such as llms.txt) into per-page files
    Links(LinksArgs),

    /// Detect the format and list pages without writing anything
    Analyze(AnalyzeArgs),

    /// List split files in an output directory
    List(ListArgs),

    /// Remove specific split files
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Remove every split file recorded in an output directory's index.json
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct WriteOptions {
    /// Keep a top-level directory even when every page shares it
    #[arg(long)]
    pub no_flatten: bool,

    /// Do not write index.json
    #[arg(long)]
    pub no_index: bool,

    /// Write into a non-empty directory that holds no previous split
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Input file path or http(s) URL
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output directory (default: "." for files, "liffy/<host>" for URLs)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub write: WriteOptions,

    /// Show split diagnostics
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Args)]
pub struct LinksArgs {
    /// Link list file path or http(s) URL
    #[arg(value_name = "LINK_LIST")]
    pub input: String,

    /// Output directory (default: "." for files, "liffy/<host>" for URLs)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub write: WriteOptions,

    /// Maximum number of simultaneous downloads
    #[arg(long, default_value_t = llms_splitter::services::MAX_CONCURRENT_DOWNLOADS)]
    pub concurrency: usize,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file path or http(s) URL
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Write the analysis to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Show split diagnostics
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output directory to inspect
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Files to remove
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory that bounds empty-directory pruning
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Output directory to clean
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    pub output: PathBuf,
}
