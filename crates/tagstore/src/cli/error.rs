//! User-facing errors
//!
//! A store error on its own says what failed. On the terminal we also say
//! what a store expects and what to run next:
//!
//! ```text
//! ERROR: Duplicate file: report.txt (/s/files/a/report.txt and /s/files/b/report.txt)
//! CONTEXT: File names must be unique across the whole store, whatever their tags
//!
//!   TRY: Rename or remove /s/files/a/report.txt
//!   TRY: Rename or remove /s/files/b/report.txt
//! ```

use std::fmt;
use tagstore_core::{StoreError, MARKER_FILE};

#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    /// What the store expects, in one line
    pub context: Option<String>,
    /// Commands or actions, each prefixed with `TRY:`
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    pub fn with_suggestion(self, suggestion: impl Into<String>) -> Self {
        self.with_suggestions([suggestion])
    }

    pub fn with_suggestions<S: Into<String>>(mut self, suggestions: impl IntoIterator<Item = S>) -> Self {
        for suggestion in suggestions {
            self.suggestions.push(format!("TRY: {}", suggestion.into()));
        }
        self
    }
}

impl From<StoreError> for HelpfulError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::StoreNotFound { start } => Self::new(message)
                .with_context(format!(
                    "A store is a directory containing a '{}' file; it is searched for upward from the given directory",
                    MARKER_FILE
                ))
                .with_suggestions([
                    format!("Initialize a store: tagstore init {}", start.display()),
                    "Point at an existing store: tagstore -d <store> ...".to_string(),
                ]),
            StoreError::StoreInitConflict { .. } => Self::new(message)
                .with_context("A store can only be created in a new or empty directory")
                .with_suggestion("Choose a directory that does not exist yet"),
            StoreError::DuplicateName { first, second, .. } => Self::new(message)
                .with_context("File names must be unique across the whole store, whatever their tags")
                .with_suggestions([first, second].map(|p| format!("Rename or remove {}", p.display()))),
            StoreError::MoveCollision { to, .. } => Self::new(message)
                .with_context("The store changed while the command was running, or a file was added by hand")
                .with_suggestion(format!("Inspect the existing file: ls -la {}", to.display())),
            StoreError::InvalidTag { .. } => Self::new(message)
                .with_context("A tag becomes a single directory name")
                .with_suggestion("Use a tag without '/', '\\', or NUL that is not '.' or '..'"),
            StoreError::Pattern(_) => Self::new(message)
                .with_context("File patterns use shell glob syntax: *, ?, [...]")
                .with_suggestion("Quote patterns so the shell does not expand them: '*.txt'"),
            StoreError::Config(_) => Self::new(message)
                .with_context(format!("The '{}' marker file is read as TOML", MARKER_FILE))
                .with_suggestion("Empty the marker file to restore the defaults"),
            StoreError::Io(_)
            | StoreError::Walk(_)
            | StoreError::NotFound(_)
            | StoreError::NotADirectory(_)
            | StoreError::NonUtf8Path(_) => Self::new(message)
                .with_context("The store could not be read or changed")
                .with_suggestion("Check permissions on the store directory"),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;
        if let Some(context) = &self.context {
            writeln!(f, "CONTEXT: {}", context)?;
        }
        if self.suggestions.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        self.suggestions
            .iter()
            .try_for_each(|line| writeln!(f, "  {}", line))
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_layout() {
        let err = HelpfulError::new("Cannot move a to b")
            .with_context("Destination is taken")
            .with_suggestion("Look first");

        assert_eq!(
            err.to_string(),
            "ERROR: Cannot move a to b\nCONTEXT: Destination is taken\n\n  TRY: Look first\n"
        );
        assert_eq!(HelpfulError::new("bare").to_string(), "ERROR: bare\n");
    }

    #[test]
    fn test_duplicate_name_names_both_files() {
        let err = HelpfulError::from(StoreError::DuplicateName {
            name: "report.txt".to_string(),
            first: PathBuf::from("/s/files/a/report.txt"),
            second: PathBuf::from("/s/files/b/report.txt"),
        });

        let display = err.to_string();
        assert!(display.contains("Duplicate file: report.txt"));
        assert!(display.contains("TRY: Rename or remove /s/files/a/report.txt"));
        assert!(display.contains("TRY: Rename or remove /s/files/b/report.txt"));
        assert_eq!(err.suggestions.len(), 2);
    }

    #[test]
    fn test_store_not_found_suggests_init() {
        let err = HelpfulError::from(StoreError::StoreNotFound {
            start: PathBuf::from("/nowhere"),
        });

        let display = err.to_string();
        assert!(display.contains("/nowhere"));
        assert!(display.contains("TRY: Initialize a store: tagstore init /nowhere"));
    }
}
