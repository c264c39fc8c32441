//! Init command - Create an empty store

use crate::cli::error::HelpfulError;
use std::io::Write;
use std::path::PathBuf;
use tagstore_core::Store;

/// Arguments for the init command
#[derive(Debug)]
pub struct InitArgs {
    pub dir: PathBuf,
}

/// Execute the init command
pub fn run(args: InitArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = Store::init(&args.dir).map_err(HelpfulError::from)?;
    writeln!(out, "Initialized empty tag store in {}", store.root().display())?;
    Ok(())
}
