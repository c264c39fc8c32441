//! List command - Show files matching a tag expression

use crate::cli::error::HelpfulError;
use crate::cli::output::{format_file_line, write_json, FileJson};
use crate::cli::TagExprArgs;
use std::io::Write;
use std::path::PathBuf;
use tagstore_core::Store;
use tracing::debug;

/// Arguments for the list command
#[derive(Debug)]
pub struct ListArgs {
    pub dir: PathBuf,
    pub expr: TagExprArgs,
    pub show_tags: bool,
    pub show_path: bool,
    pub json: bool,
}

/// Execute the list command
pub fn run(args: ListArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = Store::discover(&args.dir).map_err(HelpfulError::from)?;
    let filter = args.expr.filter()?;
    let index = store.index().map_err(HelpfulError::from)?;

    let selected = filter.select(&index);
    debug!(
        query = %filter.query().name(),
        matched = selected.len(),
        total = index.len(),
        "Listing files"
    );

    if args.json {
        let rows: Vec<FileJson> = selected.iter().map(|f| FileJson::from(*f)).collect();
        return write_json(out, &rows);
    }

    for file in selected {
        writeln!(out, "{}", format_file_line(file, args.show_tags, args.show_path))?;
    }
    Ok(())
}
