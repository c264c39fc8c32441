//! Store discovery and initialization

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::index::StoreIndex;
use crate::retagger::Retagger;
use crate::scanner::{ScanIter, ScanOptions, Scanner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker file that identifies a store root
pub const MARKER_FILE: &str = "tag.conf";

/// Subdirectory holding the tag-encoded tree
pub const FILES_DIR: &str = "files";

/// An opened store
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    files_root: PathBuf,
    config: StoreConfig,
}

impl Store {
    /// Find the store containing `start`: the nearest ancestor (or `start`
    /// itself) that holds the marker file. `start` need not exist.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = canonicalize_path(&absolute(&expand_home(start))?);

        for candidate in start.ancestors() {
            let marker = candidate.join(MARKER_FILE);
            if marker.is_file() {
                debug!(root = %candidate.display(), "Found store");
                return Self::open_at(candidate);
            }
        }

        Err(StoreError::StoreNotFound { start })
    }

    /// Open a store whose root is exactly `root`. A relative root is resolved
    /// against the current directory.
    pub fn open_at(root: &Path) -> Result<Self> {
        let root = absolute(root)?;
        let config = StoreConfig::load(&root.join(MARKER_FILE))?;
        Ok(Self {
            files_root: root.join(FILES_DIR),
            root,
            config,
        })
    }

    /// Create a new store at `dir`, which must be missing or an empty directory.
    pub fn init(dir: &Path) -> Result<Self> {
        let dir = expand_home(dir);
        create_empty_dir(&dir)?;
        fs::File::create(dir.join(MARKER_FILE))?;
        fs::create_dir(dir.join(FILES_DIR))?;

        let root = canonicalize_path(&absolute(&dir)?);
        info!(root = %root.display(), "Initialized store");
        Self::open_at(&root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    pub fn scanner(&self) -> Scanner {
        Scanner::new(&self.files_root, ScanOptions::from(&self.config))
    }

    pub fn scan(&self) -> Result<ScanIter> {
        self.scanner().scan()
    }

    /// Full scan into a fresh index
    pub fn index(&self) -> Result<StoreIndex> {
        StoreIndex::build(self.scan()?)
    }

    pub fn retagger(&self) -> Retagger {
        Retagger::new(&self.files_root)
    }
}

fn create_empty_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if !metadata.is_dir() => Err(StoreError::StoreInitConflict {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Ok(_) => {
            if fs::read_dir(path)?.next().is_some() {
                return Err(StoreError::StoreInitConflict {
                    path: path.to_path_buf(),
                    reason: "directory is not empty".to_string(),
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn canonicalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
