//! Store scanner
//!
//! Walks the files root and yields one [`FileRecord`] per file, with the tag
//! set read off the directories above it. No filtering happens here.
//!
//! # Error policy
//!
//! Every per-entry failure (unreadable directory, symlink loop, a name that
//! is not UTF-8) is yielded as an `Err`. [`crate::StoreIndex::build`] stops
//! at the first one.

use crate::codec::{tags_from_path, TagSet};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file found in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Leaf file name; unique across the store
    pub name: String,
    /// Tags derived from the directories between the files root and the file
    pub tags: TagSet,
    /// Absolute path of the containing directory
    pub dir: PathBuf,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, tags: TagSet, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            tags,
            dir: dir.into(),
        }
    }

    /// Absolute path of the file
    pub fn abs_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// Options for scanning a files root
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Follow symlinked directories (loops surface as errors)
    pub follow_symlinks: bool,
}

impl From<&StoreConfig> for ScanOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            follow_symlinks: config.follow_symlinks,
        }
    }
}

/// Scanner over one files root
#[derive(Debug, Clone)]
pub struct Scanner {
    files_root: PathBuf,
    options: ScanOptions,
}

impl Scanner {
    pub fn new(files_root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            files_root: files_root.into(),
            options,
        }
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    /// Start a fresh walk. Call again to rescan.
    pub fn scan(&self) -> Result<ScanIter> {
        let root = if self.files_root.is_absolute() {
            self.files_root.clone()
        } else {
            std::env::current_dir()?.join(&self.files_root)
        };

        let metadata = match std::fs::metadata(&root) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(root));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(StoreError::NotADirectory(root));
        }

        debug!(root = %root.display(), follow_symlinks = self.options.follow_symlinks, "Starting scan");
        let walker = WalkDir::new(&root)
            .follow_links(self.options.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        Ok(ScanIter {
            root,
            walker,
            dirs_scanned: 0,
            files_found: 0,
            finished: false,
        })
    }
}

/// Lazy, single-pass sequence of scanned files
pub struct ScanIter {
    root: PathBuf,
    walker: walkdir::IntoIter,
    dirs_scanned: usize,
    files_found: usize,
    finished: bool,
}

impl ScanIter {
    fn record_for(&self, path: &Path) -> Result<FileRecord> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::NonUtf8Path(path.to_path_buf()))?;
        let dir = path.parent().unwrap_or(&self.root);
        let rel_dir = dir.strip_prefix(&self.root).unwrap_or(Path::new(""));
        if rel_dir.to_str().is_none() {
            return Err(StoreError::NonUtf8Path(dir.to_path_buf()));
        }

        let tags: TagSet = tags_from_path(rel_dir).into_iter().collect();
        Ok(FileRecord::new(name, tags, dir))
    }
}

impl Iterator for ScanIter {
    type Item = Result<FileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some(Err(e.into())),
                None => {
                    if !self.finished {
                        self.finished = true;
                        debug!(
                            root = %self.root.display(),
                            dirs_scanned = self.dirs_scanned,
                            files_found = self.files_found,
                            "Scan complete"
                        );
                    }
                    return None;
                }
            };

            if entry.file_type().is_dir() {
                self.dirs_scanned += 1;
                continue;
            }

            self.files_found += 1;
            return Some(self.record_for(entry.path()));
        }
    }
}
