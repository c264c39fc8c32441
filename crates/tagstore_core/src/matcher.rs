//! Tag-expression and filename matching
//!
//! A query is an AND of required tags and an AND-NOT of excluded tags. File
//! names are additionally filtered by shell-style globs, any of which may
//! match.

use crate::codec::TagSet;
use crate::error::{Result, StoreError};
use crate::index::StoreIndex;
use crate::scanner::FileRecord;
use glob::Pattern;

/// Glob used when no pattern is given
pub const MATCH_ALL: &str = "*";

/// Required and excluded tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub required: TagSet,
    pub excluded: TagSet,
}

impl TagQuery {
    pub fn new(required: TagSet, excluded: TagSet) -> Self {
        Self { required, excluded }
    }

    /// True iff every required tag is present and no excluded tag is.
    pub fn matches(&self, tags: &TagSet) -> bool {
        self.required.iter().all(|t| tags.contains(t))
            && !self.excluded.iter().any(|t| tags.contains(t))
    }

    /// Human-readable label, e.g. `+done+work-urgent`. Not used for storage.
    pub fn name(&self) -> String {
        let required = self.required.iter().map(|t| format!("+{}", t));
        let excluded = self.excluded.iter().map(|t| format!("-{}", t));
        required.chain(excluded).collect()
    }
}

/// Tag query plus filename globs
#[derive(Debug, Clone)]
pub struct FileFilter {
    query: TagQuery,
    patterns: Vec<Pattern>,
}

impl FileFilter {
    /// Compile the globs. An empty list matches every name.
    pub fn new(query: TagQuery, globs: &[String]) -> Result<Self> {
        let patterns = if globs.is_empty() {
            vec![compile(MATCH_ALL)?]
        } else {
            globs.iter().map(|g| compile(g)).collect::<Result<Vec<_>>>()?
        };

        Ok(Self { query, patterns })
    }

    pub fn query(&self) -> &TagQuery {
        &self.query
    }

    /// Query matches the file's tags and at least one glob matches its name.
    pub fn matches(&self, file: &FileRecord) -> bool {
        self.query.matches(&file.tags) && self.patterns.iter().any(|p| p.matches(&file.name))
    }

    /// Matching files from an index, ordered by name
    pub fn select<'a>(&self, index: &'a StoreIndex) -> Vec<&'a FileRecord> {
        index.files().filter(|f| self.matches(f)).collect()
    }
}

fn compile(glob: &str) -> Result<Pattern> {
    Pattern::new(glob).map_err(|e| StoreError::Pattern(format!("{}: {}", glob, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tag_set;

    fn query(required: &[&str], excluded: &[&str]) -> TagQuery {
        TagQuery::new(
            tag_set(required.iter().copied()),
            tag_set(excluded.iter().copied()),
        )
    }

    fn file(name: &str, tags: &[&str]) -> FileRecord {
        FileRecord::new(name, tag_set(tags.iter().copied()), "/s/files")
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let q = TagQuery::default();
        assert!(q.matches(&TagSet::new()));
        assert!(q.matches(&tag_set(["a", "b"])));
    }

    #[test]
    fn test_missing_required_tag_fails() {
        let q = query(&["work", "urgent"], &[]);
        assert!(q.matches(&tag_set(["work", "urgent", "extra"])));
        assert!(!q.matches(&tag_set(["work"])));
        assert!(!q.matches(&TagSet::new()));
    }

    #[test]
    fn test_excluded_tag_wins_over_required() {
        let q = query(&["work"], &["done"]);
        assert!(q.matches(&tag_set(["work"])));
        assert!(!q.matches(&tag_set(["work", "done"])));
        assert!(!query(&[], &["done"]).matches(&tag_set(["done"])));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(!query(&["Work"], &[]).matches(&tag_set(["work"])));
    }

    #[test]
    fn test_query_name() {
        assert_eq!(query(&["work", "done"], &["urgent", "b"]).name(), "+done+work-b-urgent");
        assert_eq!(TagQuery::default().name(), "");
    }

    #[test]
    fn test_default_glob_matches_all_names() {
        let filter = FileFilter::new(TagQuery::default(), &[]).unwrap();
        assert!(filter.matches(&file("report.txt", &[])));
        assert!(filter.matches(&file(".hidden", &["x"])));
    }

    #[test]
    fn test_globs_are_ored() {
        let globs = vec!["*.txt".to_string(), "img_??.png".to_string()];
        let filter = FileFilter::new(TagQuery::default(), &globs).unwrap();
        assert!(filter.matches(&file("notes.txt", &[])));
        assert!(filter.matches(&file("img_01.png", &[])));
        assert!(!filter.matches(&file("img_001.png", &[])));
        assert!(!filter.matches(&file("notes.md", &[])));
    }

    #[test]
    fn test_character_class() {
        let globs = vec!["report[0-9].txt".to_string()];
        let filter = FileFilter::new(TagQuery::default(), &globs).unwrap();
        assert!(filter.matches(&file("report1.txt", &[])));
        assert!(!filter.matches(&file("reportA.txt", &[])));
    }

    #[test]
    fn test_glob_and_tags_must_both_match() {
        let globs = vec!["*.txt".to_string()];
        let filter = FileFilter::new(query(&["work"], &[]), &globs).unwrap();
        assert!(filter.matches(&file("a.txt", &["work"])));
        assert!(!filter.matches(&file("a.txt", &["home"])));
        assert!(!filter.matches(&file("a.md", &["work"])));
    }

    #[test]
    fn test_invalid_glob_is_pattern_error() {
        let globs = vec!["[unclosed".to_string()];
        let err = FileFilter::new(TagQuery::default(), &globs).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(msg) if msg.contains("[unclosed")));
    }

    #[test]
    fn test_select_is_sorted_by_name() {
        let index = StoreIndex::build(vec![
            Ok(file("b.txt", &["work"])),
            Ok(file("a.txt", &["work"])),
            Ok(file("c.txt", &["home"])),
        ])
        .unwrap();

        let filter = FileFilter::new(query(&["work"], &[]), &[]).unwrap();
        let names: Vec<_> = filter.select(&index).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}
