use crate::error::{Result, SplitterError};
use crate::services::index::build_index_json;
use crate::types::{IndexDocument, Page, SplitConfig, WriteReport};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const INDEX_FILE: &str = "index.json";

pub struct OutputWriter;

impl OutputWriter {
    /// Drops a top-level directory shared by every page.
    ///
    /// Applies only when every path has at least two segments under the same
    /// root and removing it keeps all paths distinct. Returns the removed root.
    pub fn flatten_output_paths(pages: Vec<Page>) -> (Vec<Page>, Option<String>) {
        let Some(root) = Self::shared_root(&pages) else {
            return (pages, None);
        };

        let flattened: Vec<String> = pages
            .iter()
            .map(|page| {
                page.output_path
                    .split('/')
                    .filter(|p| !p.is_empty())
                    .skip(1)
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();

        let mut seen = HashSet::new();
        if !flattened.iter().all(|path| seen.insert(path.as_str())) {
            return (pages, None);
        }

        let pages = pages
            .into_iter()
            .zip(flattened)
            .map(|(page, output_path)| Page { output_path, ..page })
            .collect();

        (pages, Some(root))
    }

    fn shared_root(pages: &[Page]) -> Option<String> {
        let mut root: Option<&str> = None;
        for page in pages {
            let mut parts = page.output_path.split('/').filter(|p| !p.is_empty());
            let (Some(top), Some(_)) = (parts.next(), parts.next()) else {
                return None;
            };
            match root {
                None => root = Some(top),
                Some(existing) if existing != top => return None,
                Some(_) => {}
            }
        }
        root.map(str::to_string)
    }

    /// Refuses to write into a non-empty directory that is not a previous split.
    pub fn check_output_directory(output_dir: &Path, force: bool) -> Result<()> {
        if force || !output_dir.exists() || output_dir.join(INDEX_FILE).is_file() {
            return Ok(());
        }

        let mut entries = std::fs::read_dir(output_dir).map_err(|e| SplitterError::OutputDirectory {
            reason: format!("Cannot read output directory {}: {}", output_dir.display(), e),
        })?;

        if entries.next().is_some() && output_dir != Path::new(".") {
            return Err(SplitterError::OutputDirectory {
                reason: format!(
                    "{} is not empty and holds no {}. Use --force to write anyway.",
                    output_dir.display(),
                    INDEX_FILE
                ),
            });
        }

        Ok(())
    }

    /// Writes each page under `output_dir` and, if configured, the index manifest.
    pub async fn write_pages(
        pages: &[Page],
        config: &SplitConfig,
        source: &str,
        name: Option<&str>,
    ) -> Result<WriteReport> {
        let documents: Vec<(&str, &str)> = pages
            .iter()
            .map(|page| (page.output_path.as_str(), page.content.as_str()))
            .collect();

        Self::write_documents(&documents, config, source, name).await
    }

    /// Writes `(relative path, content)` pairs. Later duplicates overwrite earlier ones.
    pub async fn write_documents(
        documents: &[(&str, &str)],
        config: &SplitConfig,
        source: &str,
        name: Option<&str>,
    ) -> Result<WriteReport> {
        let output_dir = &config.output_dir;
        Self::ensure_directory(output_dir).await?;

        let mut files = Vec::with_capacity(documents.len());
        for (relative, content) in documents {
            let path = Self::resolve_inside(output_dir, relative);
            if let Some(parent) = path.parent() {
                Self::ensure_directory(parent).await?;
            }

            fs::write(&path, content).await.map_err(|e| SplitterError::OutputDirectory {
                reason: format!("Failed to write {}: {}", path.display(), e),
            })?;
            debug!("Wrote {}", path.display());
            files.push(path);
        }

        let index_file = if config.write_index {
            let relative_paths: Vec<&str> = documents.iter().map(|(relative, _)| *relative).collect();
            let json = build_index_json(&relative_paths, Some(source), name)?;
            let index_path = output_dir.join(INDEX_FILE);
            fs::write(&index_path, json).await?;
            info!("Generated index file: {}", index_path.display());
            Some(index_path)
        } else {
            None
        };

        Ok(WriteReport {
            output_dir: output_dir.clone(),
            files,
            index_file,
        })
    }

    /// Joins a page path onto `output_dir`. Root, prefix and `..` components are
    /// dropped, so the file stays inside `output_dir` at the path the index records.
    pub fn resolve_inside(output_dir: &Path, relative: &str) -> PathBuf {
        let mut path = output_dir.to_path_buf();
        path.extend(
            Path::new(relative)
                .components()
                .filter(|component| matches!(component, Component::Normal(_))),
        );
        path
    }

    async fn ensure_directory(dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).await.map_err(|e| SplitterError::OutputDirectory {
                reason: format!("Failed to create directory {}: {}", dir.display(), e),
            })?;
        }
        Ok(())
    }

    pub async fn read_index(output_dir: &Path) -> Result<Option<IndexDocument>> {
        let index_path = output_dir.join(INDEX_FILE);
        if !index_path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&index_path).await?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Split files under `output_dir`: the ones `index.json` records, or every
    /// markdown file found on disk when there is no index.
    pub async fn list_files(output_dir: &Path) -> Result<Vec<PathBuf>> {
        if let Some(index) = Self::read_index(output_dir).await? {
            return Ok(index
                .file_paths()
                .into_iter()
                .map(|relative| Self::resolve_inside(output_dir, &relative))
                .collect());
        }

        let mut files: Vec<PathBuf> = WalkDir::new(output_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Deletes the given files, skipping ones that are already gone.
    pub fn remove_files(files: &[PathBuf]) -> Result<usize> {
        let existing: Vec<&PathBuf> = files.iter().filter(|path| path.is_file()).collect();
        fs_extra::remove_items(&existing).map_err(|e| SplitterError::OutputDirectory {
            reason: format!("Failed to remove files: {}", e),
        })?;

        for path in &existing {
            debug!("Removed {}", path.display());
        }
        Ok(existing.len())
    }

    /// Deletes the given files, then every parent directory they leave empty.
    /// Pruning never climbs to `root` or above it.
    pub fn remove_and_prune(files: &[PathBuf], root: &Path) -> Result<usize> {
        let removed = Self::remove_files(files)?;

        let root = std::path::absolute(root)?;
        for file in files {
            Self::prune_empty_parents(&std::path::absolute(file)?, &root);
        }
        Ok(removed)
    }

    fn prune_empty_parents(file: &Path, root: &Path) {
        let mut dir = file.parent();
        while let Some(current) = dir {
            if current == root || !current.starts_with(root) {
                break;
            }
            // remove_dir refuses non-empty directories
            if std::fs::remove_dir(current).is_err() {
                break;
            }
            debug!("Removed empty directory {}", current.display());
            dir = current.parent();
        }
    }

    /// Removes every file recorded in `index.json`, the index itself, and any
    /// directories left empty. Returns the number of files removed.
    pub async fn clean(output_dir: &Path) -> Result<usize> {
        let Some(index) = Self::read_index(output_dir).await? else {
            return Err(SplitterError::OutputDirectory {
                reason: format!("No {} found in {}", INDEX_FILE, output_dir.display()),
            });
        };

        let mut files: Vec<PathBuf> = index
            .file_paths()
            .into_iter()
            .map(|relative| Self::resolve_inside(output_dir, &relative))
            .collect();
        files.push(output_dir.join(INDEX_FILE));

        let removed = Self::remove_files(&files)?;
        Self::prune_empty_directories(output_dir);
        Ok(removed)
    }

    /// Deletes empty directories below `root`, deepest first. `root` itself is kept.
    pub fn prune_empty_directories(root: &Path) {
        let dirs: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .collect();

        for dir in dirs {
            let is_empty = std::fs::read_dir(&dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if is_empty && std::fs::remove_dir(&dir).is_ok() {
                debug!("Removed empty directory {}", dir.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(output_path: &str) -> Page {
        Page {
            title: "T".to_string(),
            url: format!("https://example.com/{}", output_path),
            content: "body".to_string(),
            output_path: output_path.to_string(),
        }
    }

    fn config(dir: &Path) -> SplitConfig {
        SplitConfig {
            output_dir: dir.to_path_buf(),
            flatten: true,
            write_index: true,
            force: false,
            debug: false,
        }
    }

    #[test]
    fn test_flatten_shared_root() {
        let (pages, root) = OutputWriter::flatten_output_paths(vec![page("docs/a.md"), page("docs/b/c.md")]);
        assert_eq!(root.as_deref(), Some("docs"));
        assert_eq!(pages[0].output_path, "a.md");
        assert_eq!(pages[1].output_path, "b/c.md");
    }

    #[test]
    fn test_flatten_skips_mixed_roots_and_shallow_paths() {
        let (pages, root) = OutputWriter::flatten_output_paths(vec![page("docs/a.md"), page("api/b.md")]);
        assert!(root.is_none());
        assert_eq!(pages[0].output_path, "docs/a.md");

        let (_, root) = OutputWriter::flatten_output_paths(vec![page("docs/a.md"), page("index.md")]);
        assert!(root.is_none());

        let (_, root) = OutputWriter::flatten_output_paths(Vec::new());
        assert!(root.is_none());
    }

    #[test]
    fn test_flatten_skips_when_paths_collide() {
        let (pages, root) = OutputWriter::flatten_output_paths(vec![page("docs/a.md"), page("docs//a.md")]);
        assert!(root.is_none());
        assert_eq!(pages[1].output_path, "docs//a.md");
    }

    #[tokio::test]
    async fn test_write_list_and_clean() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let pages = vec![page("docs/a.md"), page("docs/api/b.md")];

        let report = OutputWriter::write_pages(&pages, &config(&out), "input.txt", None).await.unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(out.join("docs/api/b.md").is_file());
        assert!(report.index_file.as_ref().is_some_and(|p| p.is_file()));

        let listed = OutputWriter::list_files(&out).await.unwrap();
        assert_eq!(listed, vec![out.join("docs/api/b.md"), out.join("docs/a.md")]);

        let removed = OutputWriter::clean(&out).await.unwrap();
        assert_eq!(removed, 3);
        assert!(!out.join("docs").exists());
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_list_without_index_walks_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.write_index = false;
        OutputWriter::write_pages(&[page("b.md"), page("a/x.md")], &cfg, "input.txt", None)
            .await
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let listed = OutputWriter::list_files(dir.path()).await.unwrap();
        assert_eq!(listed, vec![dir.path().join("a/x.md"), dir.path().join("b.md")]);
    }

    #[tokio::test]
    async fn test_rooted_page_path_stays_inside_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let pages = vec![page("/x/y.md"), page("../up.md")];

        let report = OutputWriter::write_pages(&pages, &config(&out), "input.txt", None).await.unwrap();
        assert_eq!(report.files, vec![out.join("x/y.md"), out.join("up.md")]);
        assert!(out.join("x/y.md").is_file());
        assert!(!dir.path().join("up.md").exists());

        // clean finds the file at the path index.json records
        assert_eq!(OutputWriter::clean(&out).await.unwrap(), 3);
        assert!(!out.join("x").exists());
    }

    #[test]
    fn test_remove_prunes_emptied_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("x.md"), "x").unwrap();
        std::fs::create_dir_all(dir.path().join("keep")).unwrap();
        std::fs::write(dir.path().join("keep/y.md"), "y").unwrap();

        let removed =
            OutputWriter::remove_and_prune(&[nested.join("x.md"), dir.path().join("keep/y.md")], dir.path()).unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.path().join("a").exists());
        assert!(!dir.path().join("keep").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_remove_keeps_non_empty_parents() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("x.md"), "x").unwrap();
        std::fs::write(docs.join("z.md"), "z").unwrap();

        OutputWriter::remove_and_prune(&[docs.join("x.md")], dir.path()).unwrap();
        assert!(docs.join("z.md").is_file());
    }

    #[test]
    fn test_non_empty_directory_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.txt"), "x").unwrap();

        assert!(OutputWriter::check_output_directory(dir.path(), false).is_err());
        assert!(OutputWriter::check_output_directory(dir.path(), true).is_ok());

        std::fs::write(dir.path().join(INDEX_FILE), "{\"tree\":[]}").unwrap();
        assert!(OutputWriter::check_output_directory(dir.path(), false).is_ok());
    }
}
