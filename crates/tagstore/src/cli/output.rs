//! Output formatting utilities for CLI commands

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tagstore_core::FileRecord;

/// One file as printed by `list --json`
#[derive(Debug, Clone, Serialize)]
pub struct FileJson {
    pub name: String,
    pub path: String,
    pub tags: Vec<String>,
}

impl From<&FileRecord> for FileJson {
    fn from(file: &FileRecord) -> Self {
        Self {
            name: file.name.clone(),
            path: file.abs_path().to_string_lossy().into_owned(),
            tags: file.tags.iter().cloned().collect(),
        }
    }
}

/// One tag as printed by `tags --json`
#[derive(Debug, Clone, Serialize)]
pub struct TagJson {
    pub tag: String,
    pub files: usize,
}

/// Format a file listing line
///
/// Examples:
/// - `report.txt`
/// - `report.txt done work` (with tags)
/// - `/s/files/done/work/report.txt done work` (with path and tags)
pub fn format_file_line(file: &FileRecord, show_tags: bool, show_path: bool) -> String {
    let mut line = if show_path {
        file.abs_path().display().to_string()
    } else {
        file.name.clone()
    };

    if show_tags {
        for tag in &file.tags {
            line.push(' ');
            line.push_str(tag);
        }
    }
    line
}

/// Format a planned move for `edit --dry-run`
pub fn format_move(from: &Path, to: &Path) -> String {
    format!("{} -> {}", from.display(), to.display())
}

/// Write a value as pretty JSON followed by a newline
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
