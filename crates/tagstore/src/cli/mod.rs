//! CLI module for tagstore
//!
//! Each command resolves the store, builds a fresh index and works on that
//! snapshot. Commands write their results to the writer they are given.

pub mod error;
pub mod output;

pub mod edit;
pub mod init;
pub mod list;
pub mod tags;

use error::HelpfulError;

use tagstore_core::{tag_set, FileFilter, TagQuery};

/// Tag expression and file patterns shared by `list` and `edit`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TagExprArgs {
    /// Only select files with this tag
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Only select files without this tag
    #[arg(short = 'n', long = "exclude")]
    pub exclude: Vec<String>,

    /// File name patterns to select (shell globs, default: *)
    pub globs: Vec<String>,
}

impl TagExprArgs {
    pub fn filter(&self) -> Result<FileFilter, HelpfulError> {
        let query = TagQuery::new(
            tag_set(self.tags.iter().cloned()),
            tag_set(self.exclude.iter().cloned()),
        );
        Ok(FileFilter::new(query, &self.globs)?)
    }
}
