//! Edit command - Add and remove tags on matching files
//!
//! Every move is planned before the first one runs: added tags are validated
//! and destinations are checked for collisions up front. Moves then run one
//! at a time and the command stops at the first failure, leaving earlier
//! moves in place.

use crate::cli::error::HelpfulError;
use crate::cli::output::format_move;
use crate::cli::TagExprArgs;
use std::io::Write;
use std::path::PathBuf;
use tagstore_core::{tag_set, RetagPlan, Store, StoreError, TagEdit};
use tracing::info;

/// Arguments for the edit command
#[derive(Debug)]
pub struct EditArgs {
    pub dir: PathBuf,
    pub expr: TagExprArgs,
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub dry_run: bool,
}

/// Execute the edit command
pub fn run(args: EditArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let edit = TagEdit::new(tag_set(args.add), tag_set(args.remove)).map_err(HelpfulError::from)?;
    let store = Store::discover(&args.dir).map_err(HelpfulError::from)?;
    let filter = args.expr.filter()?;
    let index = store.index().map_err(HelpfulError::from)?;
    let retagger = store.retagger();

    let selected = filter.select(&index);
    let plans: Vec<RetagPlan> = selected
        .iter()
        .map(|file| retagger.plan(file, &edit))
        .filter(|plan| !plan.is_noop())
        .collect();

    info!(
        query = %filter.query().name(),
        add = ?edit.add(),
        remove = ?edit.remove(),
        matched = selected.len(),
        moves = plans.len(),
        dry_run = args.dry_run,
        "Planned tag edit"
    );

    if let Some(blocked) = plans.iter().find(|plan| plan.to.symlink_metadata().is_ok()) {
        return Err(HelpfulError::from(StoreError::MoveCollision {
            from: blocked.from.clone(),
            to: blocked.to.clone(),
        })
        .into());
    }

    if args.dry_run {
        for plan in &plans {
            writeln!(out, "{}", format_move(&plan.from, &plan.to))?;
        }
        return Ok(());
    }

    for plan in &plans {
        retagger.execute(plan).map_err(HelpfulError::from)?;
    }
    Ok(())
}
