//! Tags command - Show every tag in use

use crate::cli::error::HelpfulError;
use crate::cli::output::{write_json, TagJson};
use std::io::Write;
use std::path::PathBuf;
use tagstore_core::Store;

/// Arguments for the tags command
#[derive(Debug)]
pub struct TagsArgs {
    pub dir: PathBuf,
    pub json: bool,
}

/// Execute the tags command
pub fn run(args: TagsArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = Store::discover(&args.dir).map_err(HelpfulError::from)?;
    let index = store.index().map_err(HelpfulError::from)?;
    let counts = index.tag_counts();

    if args.json {
        let rows: Vec<TagJson> = counts
            .iter()
            .map(|(tag, files)| TagJson {
                tag: tag.to_string(),
                files: *files,
            })
            .collect();
        return write_json(out, &rows);
    }

    for (tag, files) in counts {
        writeln!(out, "{}\t{}", tag, files)?;
    }
    Ok(())
}
