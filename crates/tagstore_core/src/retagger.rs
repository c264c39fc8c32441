//! Retagging: moving a file to the canonical directory of its new tag set

use crate::codec::{canonical_path, validate_tag, TagSet};
use crate::error::{Result, StoreError};
use crate::scanner::FileRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tags to add and remove. Removal happens first, so a tag in both ends up present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdit {
    add: TagSet,
    remove: TagSet,
}

impl TagEdit {
    /// Validate every tag to be added; removed tags only need to compare equal.
    pub fn new(add: TagSet, remove: TagSet) -> Result<Self> {
        for tag in &add {
            validate_tag(tag)?;
        }
        Ok(Self { add, remove })
    }

    pub fn add(&self) -> &TagSet {
        &self.add
    }

    pub fn remove(&self) -> &TagSet {
        &self.remove
    }

    /// `(tags - remove) ∪ add`
    pub fn apply(&self, tags: &TagSet) -> TagSet {
        tags.difference(&self.remove)
            .chain(self.add.iter())
            .cloned()
            .collect()
    }
}

/// Where a file is and where its edited tag set says it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagPlan {
    pub name: String,
    pub from: PathBuf,
    pub to: PathBuf,
    pub new_tags: TagSet,
}

impl RetagPlan {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Result of a retag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagOutcome {
    pub from: PathBuf,
    pub to: PathBuf,
    /// False when the file was already in place and nothing was touched
    pub moved: bool,
}

/// Applies tag edits to files under one files root
#[derive(Debug, Clone)]
pub struct Retagger {
    files_root: PathBuf,
}

impl Retagger {
    pub fn new(files_root: impl Into<PathBuf>) -> Self {
        Self {
            files_root: files_root.into(),
        }
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    /// Canonical location of `file` after `edit`. Touches nothing.
    pub fn plan(&self, file: &FileRecord, edit: &TagEdit) -> RetagPlan {
        let new_tags = edit.apply(&file.tags);
        let to = self
            .files_root
            .join(canonical_path(&new_tags))
            .join(&file.name);

        RetagPlan {
            name: file.name.clone(),
            from: file.abs_path(),
            to,
            new_tags,
        }
    }

    /// Plan and perform the move for one file.
    pub fn retag(&self, file: &FileRecord, edit: &TagEdit) -> Result<RetagOutcome> {
        let plan = self.plan(file, edit);
        self.execute(&plan)
    }

    /// Perform a planned move. A no-op plan does no filesystem work.
    pub fn execute(&self, plan: &RetagPlan) -> Result<RetagOutcome> {
        if plan.is_noop() {
            debug!(file = %plan.name, path = %plan.from.display(), "Already in place");
            return Ok(RetagOutcome {
                from: plan.from.clone(),
                to: plan.to.clone(),
                moved: false,
            });
        }

        move_file(&plan.from, &plan.to, &self.files_root)?;
        info!(
            file = %plan.name,
            from = %plan.from.display(),
            to = %plan.to.display(),
            "Retagged file"
        );

        Ok(RetagOutcome {
            from: plan.from.clone(),
            to: plan.to.clone(),
            moved: true,
        })
    }
}

/// Move a file, creating missing destination directories and removing source
/// directories the move leaves empty.
///
/// Pruning walks up from the source's parent and stops at the first non-empty
/// directory or at `stop_at`, which is never removed. An existing destination
/// is never overwritten. The existence check and the rename are separate
/// calls, so a concurrent writer can still race in between.
pub fn move_file(from: &Path, to: &Path, stop_at: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(StoreError::MoveCollision {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)?;

    if let Some(parent) = from.parent() {
        let removed = prune_empty_dirs(parent, stop_at)?;
        if removed > 0 {
            debug!(dir = %parent.display(), removed, "Pruned empty directories");
        }
    }
    Ok(())
}

fn prune_empty_dirs(start: &Path, stop_at: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut current = start;

    while current != stop_at && current.starts_with(stop_at) {
        if fs::read_dir(current)?.next().is_some() {
            break;
        }
        fs::remove_dir(current)?;
        removed += 1;

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Ok(removed)
}
