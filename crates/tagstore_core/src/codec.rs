//! Tag/path codec
//!
//! A tag set is written to disk as nested directories, one per tag, in sorted
//! order. Reading goes the other way and accepts any order, so a tree that was
//! rearranged by hand still scans; the retagger writes it back sorted.

use crate::error::{Result, StoreError};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Unordered set of tags. Iteration order is the canonical on-disk order.
pub type TagSet = BTreeSet<String>;

/// Collect tags into a [`TagSet`].
pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}

/// Split a directory path (relative to the files root) into its tags.
///
/// Order is root-to-leaf. `.` and empty components are dropped, as is
/// anything that is not a plain name (root, prefix, `..`).
pub fn tags_from_path(rel_dir: &Path) -> Vec<String> {
    rel_dir
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Canonical directory for a tag set, relative to the files root.
///
/// The empty set maps to the empty path, i.e. the files root itself.
pub fn canonical_path(tags: &TagSet) -> PathBuf {
    tags.iter().collect()
}

/// Check that a tag can be used as a single directory name.
pub fn validate_tag(tag: &str) -> Result<()> {
    let reason = if tag.is_empty() {
        "tag is empty"
    } else if tag == "." || tag == ".." {
        "tag is a relative path component"
    } else if tag.chars().any(|c| c == '/' || c == '\\') {
        "tag contains a path separator"
    } else if tag.contains('\0') {
        "tag contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(StoreError::InvalidTag {
        tag: tag.to_string(),
        reason,
    })
}
