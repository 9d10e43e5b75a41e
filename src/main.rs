mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{AnalyzeArgs, CleanArgs, Cli, Commands, LinksArgs, ListArgs, RemoveArgs, SplitArgs, WriteOptions};
use llms_splitter::{
    split, url_to_output_path, ContentFetcher, OutputWriter, Page, Result, SourceType, SplitConfig, SplitterError,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let debug_requested = match &cli.command {
        Commands::Split(args) => args.debug,
        Commands::Analyze(args) => args.debug,
        _ => false,
    };
    setup_logging(if cli.verbose || debug_requested { "debug" } else { "info" });

    let result = match &cli.command {
        Commands::Split(args) => handle_split_command(args).await,
        Commands::Links(args) => handle_links_command(args).await,
        Commands::Analyze(args) => handle_analyze_command(args).await,
        Commands::List(args) => handle_list_command(args).await,
        Commands::Remove(args) => handle_remove_command(args),
        Commands::Clean(args) => handle_clean_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// RUST_LOG takes precedence over the level picked from the command line.
fn setup_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init()
}

fn default_output_dir(input: &str) -> PathBuf {
    match ContentFetcher::host_of(input) {
        Some(host) if ContentFetcher::is_url(input) => Path::new("liffy").join(host),
        _ => PathBuf::from("."),
    }
}

fn split_config(input: &str, output: Option<&PathBuf>, write: &WriteOptions, debug: bool) -> SplitConfig {
    SplitConfig {
        output_dir: output.cloned().unwrap_or_else(|| default_output_dir(input)),
        flatten: !write.no_flatten,
        write_index: !write.no_index,
        force: write.force,
        debug,
    }
}

fn no_pages(input: &str, debug: bool) -> SplitterError {
    SplitterError::NoPages {
        input: input.to_string(),
        hint: if debug { String::new() } else { " (try --debug)".to_string() },
    }
}

async fn handle_split_command(args: &SplitArgs) -> Result<()> {
    let config = split_config(&args.input, args.output.as_ref(), &args.write, args.debug);
    OutputWriter::check_output_directory(&config.output_dir, config.force)?;

    let (content, metadata) = ContentFetcher::fetch_content(&args.input).await?;
    let is_url = metadata.source_type == SourceType::Url;

    let mut log_debug = |message: &str| debug!("{}", message);
    let sink = if config.debug {
        Some(&mut log_debug as &mut dyn FnMut(&str))
    } else {
        None
    };
    let result = split(&content, sink);

    let (pages, flattened_root) = if is_url && config.flatten {
        OutputWriter::flatten_output_paths(result.pages)
    } else {
        (result.pages, None)
    };

    if pages.is_empty() {
        return Err(no_pages(&args.input, config.debug));
    }

    info!("Detected: {}", result.pattern);
    match &flattened_root {
        Some(root) => info!("Pages: {} (flattened from \"{}/\")", pages.len(), root),
        None => info!("Pages: {}", pages.len()),
    }

    let name = if is_url { ContentFetcher::host_of(&args.input) } else { None };
    let report = OutputWriter::write_pages(&pages, &config, &args.input, name.as_deref()).await?;

    info!("✓ Saved {} files to {}", report.files.len(), report.output_dir.display());
    if let Some(index_file) = &report.index_file {
        debug!("Index: {}", index_file.display());
    }

    Ok(())
}

async fn handle_links_command(args: &LinksArgs) -> Result<()> {
    let config = split_config(&args.input, args.output.as_ref(), &args.write, false);
    OutputWriter::check_output_directory(&config.output_dir, config.force)?;

    let (list, metadata) = ContentFetcher::fetch_content(&args.input).await?;
    let links = ContentFetcher::extract_links(&list);
    if links.is_empty() {
        return Err(no_pages(&args.input, true));
    }
    info!("Found {} links, fetching up to {} at a time", links.len(), args.concurrency);

    let fetched = ContentFetcher::fetch_many(&links, args.concurrency).await;
    if fetched.is_empty() {
        return Err(no_pages(&args.input, true));
    }

    let pages: Vec<Page> = fetched
        .into_iter()
        .map(|(url, content)| {
            let title = content
                .lines()
                .find_map(|line| line.strip_prefix("# "))
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|| url_to_output_path(&url));
            Page::new(title, url, content.trim().to_string())
        })
        .collect();

    let is_url = metadata.source_type == SourceType::Url;
    let (pages, flattened_root) = if is_url && config.flatten {
        OutputWriter::flatten_output_paths(pages)
    } else {
        (pages, None)
    };

    match &flattened_root {
        Some(root) => info!("Pages: {}/{} (flattened from \"{}/\")", pages.len(), links.len(), root),
        None => info!("Pages: {}/{}", pages.len(), links.len()),
    }

    let name = if is_url { ContentFetcher::host_of(&args.input) } else { None };
    let report = OutputWriter::write_pages(&pages, &config, &args.input, name.as_deref()).await?;

    info!("✓ Saved {} files to {}", report.files.len(), report.output_dir.display());
    Ok(())
}

async fn handle_analyze_command(args: &AnalyzeArgs) -> Result<()> {
    let (content, metadata) = ContentFetcher::fetch_content(&args.input).await?;

    let mut log_debug = |message: &str| debug!("{}", message);
    let sink = if args.debug {
        Some(&mut log_debug as &mut dyn FnMut(&str))
    } else {
        None
    };
    let result = split(&content, sink);

    println!("\n=== Analysis for '{}' ===", metadata.source);
    println!("Source type: {:?}", metadata.source_type);
    println!("Total lines: {}", metadata.total_lines);
    println!("Detected pattern: {}", result.pattern);
    println!("Pages: {}", result.pages.len());

    for (idx, page) in result.pages.iter().enumerate() {
        println!("  {:>4}. {} -> {}", idx + 1, page.title, page.output_path);
        println!("        {}", page.url);
    }

    if let Some(json_path) = &args.json {
        let report = serde_json::json!({
            "source": metadata.source,
            "fetched_at": metadata.fetched_at,
            "total_lines": metadata.total_lines,
            "pattern": result.pattern,
            "pages": result.pages.iter().map(|page| serde_json::json!({
                "title": page.title,
                "url": page.url,
                "outputPath": page.output_path,
                "lines": page.content.lines().count(),
            })).collect::<Vec<_>>(),
        });

        let json_content =
            serde_json::to_string_pretty(&report).context("Failed to serialize analysis results")?;
        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON analysis file")?;

        info!("Analysis results written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_list_command(args: &ListArgs) -> Result<()> {
    let files = OutputWriter::list_files(&args.output).await?;
    if files.is_empty() {
        println!("No split files found in {}", args.output.display());
        return Ok(());
    }

    for file in &files {
        let shown = file.strip_prefix(&args.output).unwrap_or(file.as_path());
        println!("{}", shown.display());
    }
    println!("\n{} files", files.len());
    Ok(())
}

fn handle_remove_command(args: &RemoveArgs) -> Result<()> {
    let removed = OutputWriter::remove_and_prune(&args.files, &args.root)?;
    info!("Removed {}/{} files", removed, args.files.len());
    Ok(())
}

async fn handle_clean_command(args: &CleanArgs) -> Result<()> {
    let removed = OutputWriter::clean(&args.output).await?;
    info!("✓ Removed {} files from {}", removed, args.output.display());
    Ok(())
}
