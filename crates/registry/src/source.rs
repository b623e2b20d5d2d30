//! Content sources: where a bundle's index and files come from.
//!
//! A source exposes the optional index document and the bundle's files as
//! `(relative path, content)` pairs. Hidden entries and the index document
//! itself are never listed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Default name of a bundle's index document.
pub const DEFAULT_INDEX_FILE: &str = "index.yaml";

/// One file in a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path relative to the bundle root, `/`-separated on every platform.
    pub relative_path: String,
    pub content: String,
    /// Location on disk, when the bundle lives on disk.
    pub path: Option<PathBuf>,
}

/// Errors reading a bundle.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("bundle not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },
}

/// A bundle: an index document plus a set of files.
pub trait ContentSource {
    /// Bundle name, used to build fallback module ids.
    fn name(&self) -> &str;

    /// Whether the bundle exists at all. Missing bundles are skipped by the loader.
    fn available(&self) -> bool {
        true
    }

    /// Raw text of the index document, if the bundle has one.
    fn index_document(&self) -> Result<Option<String>, SourceError>;

    /// Every file except hidden entries and the index document.
    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError>;
}

/// A bundle rooted at a directory on disk.
///
/// Files named like the index document are left out at every depth; only
/// the one at the root is read as the index.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    name: String,
    index_file: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = bundle_name(&root);
        Self {
            root,
            name,
            index_file: DEFAULT_INDEX_FILE.into(),
        }
    }

    /// Use a different index document name.
    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// The directory's own name, resolving `.`/`..` through the filesystem.
fn bundle_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            std::fs::canonicalize(root)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Join path components with `/` regardless of platform.
fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl ContentSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn available(&self) -> bool {
        self.root.is_dir()
    }

    fn index_document(&self) -> Result<Option<String>, SourceError> {
        let path = self.root.join(&self.index_file);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| SourceError::ReadError {
                path,
                reason: e.to_string(),
            })
    }

    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound(self.root.clone()));
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(bundle = %self.name, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            // Index documents are skipped at every depth, not only the root
            if entry.file_name().to_string_lossy() == self.index_file {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let relative_path = to_forward_slashes(relative);

            let content = match std::fs::read(entry.path()).map(String::from_utf8) {
                Ok(Ok(text)) => text,
                Ok(Err(_)) => {
                    warn!(bundle = %self.name, file = %relative_path, "Skipping non-UTF-8 file");
                    continue;
                }
                Err(e) => {
                    warn!(bundle = %self.name, file = %relative_path, error = %e, "Skipping unreadable file");
                    continue;
                }
            };

            debug!(bundle = %self.name, file = %relative_path, "Discovered file");
            entries.push(SourceEntry {
                relative_path,
                content,
                path: Some(entry.path().to_path_buf()),
            });
        }

        Ok(entries)
    }
}

/// An in-memory bundle.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    index: Option<String>,
    files: Vec<SourceEntry>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            files: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Add a file. Files are listed in insertion order.
    pub fn with_file(mut self, relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push(SourceEntry {
            relative_path: relative_path.into(),
            content: content.into(),
            path: None,
        });
        self
    }
}

impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn index_document(&self) -> Result<Option<String>, SourceError> {
        Ok(self.index.clone())
    }

    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError> {
        Ok(self.files.clone())
    }
}
