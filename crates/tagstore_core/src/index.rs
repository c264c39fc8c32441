//! In-memory index of a store, rebuilt from a full scan on every command

use crate::codec::TagSet;
use crate::error::{Result, StoreError};
use crate::scanner::FileRecord;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Snapshot of a store: every file by name, plus every tag in use
#[derive(Debug, Clone, Default)]
pub struct StoreIndex {
    files: BTreeMap<String, FileRecord>,
    all_tags: TagSet,
}

impl StoreIndex {
    /// Build an index from scan results.
    ///
    /// Stops at the first scan error. A name seen twice fails with
    /// [`StoreError::DuplicateName`] carrying both paths; no index is returned.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<FileRecord>>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(record?)?;
        }
        debug!(files = index.files.len(), tags = index.all_tags.len(), "Index built");
        Ok(index)
    }

    fn insert(&mut self, record: FileRecord) -> Result<()> {
        match self.files.entry(record.name.clone()) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateName {
                name: record.name.clone(),
                first: existing.get().abs_path(),
                second: record.abs_path(),
            }),
            Entry::Vacant(slot) => {
                self.all_tags.extend(record.tags.iter().cloned());
                slot.insert(record);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.files.get(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All records, ordered by name
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    pub fn all_tags(&self) -> &TagSet {
        &self.all_tags
    }

    /// Number of files carrying each tag
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> =
            self.all_tags.iter().map(|t| (t.as_str(), 0)).collect();
        for tag in self.files.values().flat_map(|f| f.tags.iter()) {
            if let Some(count) = counts.get_mut(tag.as_str()) {
                *count += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tag_set;
    use std::path::PathBuf;

    fn record(name: &str, tags: &[&str], dir: &str) -> Result<FileRecord> {
        Ok(FileRecord::new(name, tag_set(tags.iter().copied()), dir))
    }

    #[test]
    fn test_build_collects_files_and_tags() {
        let index = StoreIndex::build(vec![
            record("a.txt", &["work"], "/s/files/work"),
            record("b.txt", &["done", "work"], "/s/files/done/work"),
            record("c.txt", &[], "/s/files"),
        ])
        .unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.all_tags(), &tag_set(["done", "work"]));
        assert_eq!(index.get("b.txt").unwrap().dir, PathBuf::from("/s/files/done/work"));
        assert!(index.get("missing").is_none());

        let names: Vec<_> = index.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_duplicate_name_fails_with_both_paths() {
        let err = StoreIndex::build(vec![
            record("report.txt", &["work"], "/s/files/work"),
            record("report.txt", &["home"], "/s/files/home"),
        ])
        .unwrap_err();

        match err {
            StoreError::DuplicateName { name, first, second } => {
                assert_eq!(name, "report.txt");
                assert_eq!(first, PathBuf::from("/s/files/work/report.txt"));
                assert_eq!(second, PathBuf::from("/s/files/home/report.txt"));
            }
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_name_ignores_tags() {
        // Same name, same tags, different on-disk order: still a collision.
        let result = StoreIndex::build(vec![
            record("x", &["a", "b"], "/s/files/a/b"),
            record("x", &["a", "b"], "/s/files/b/a"),
        ]);
        assert!(matches!(result, Err(StoreError::DuplicateName { .. })));
    }

    #[test]
    fn test_scan_error_aborts_build() {
        let result = StoreIndex::build(vec![
            record("a.txt", &[], "/s/files"),
            Err(StoreError::NonUtf8Path(PathBuf::from("/s/files/bad"))),
            record("b.txt", &[], "/s/files"),
        ]);
        assert!(matches!(result, Err(StoreError::NonUtf8Path(_))));
    }

    #[test]
    fn test_tag_counts() {
        let index = StoreIndex::build(vec![
            record("a", &["work"], "/s/files/work"),
            record("b", &["done", "work"], "/s/files/done/work"),
        ])
        .unwrap();

        let counts = index.tag_counts();
        assert_eq!(counts.get("work"), Some(&2));
        assert_eq!(counts.get("done"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_empty_store() {
        let index = StoreIndex::build(Vec::<Result<FileRecord>>::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.all_tags().is_empty());
    }
}
