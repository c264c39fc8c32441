//! tagstore - store and find files via tags
//!
//! A store is a directory with a `tag.conf` marker and a `files/` tree in
//! which every directory is a tag. Commands:
//! - `init`: create a store
//! - `list`: show files matching a tag expression
//! - `edit`: add/remove tags, which moves files between directories
//! - `tags`: show the tags in use

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tagstore_logging::LogConfig;
use tracing::warn;

mod cli;

use cli::TagExprArgs;

#[derive(Parser, Debug)]
#[command(name = "tagstore", version, about = "Store and find files via tags")]
struct Cli {
    /// The directory of the tag file store, or any directory inside it
    #[arg(short = 'd', long, global = true, env = "TAGSTORE_DIR")]
    dir: Option<PathBuf>,

    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a directory as tag file store
    Init {
        /// Directory to initialize (default: --dir or the current directory)
        path: Option<PathBuf>,
    },

    /// List files
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        expr: TagExprArgs,

        /// Show the tags of each file
        #[arg(short = 'l', long)]
        show_tags: bool,

        /// Show the absolute path of each file
        #[arg(short = 'p', long)]
        show_path: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit the tags of files
    Edit {
        #[command(flatten)]
        expr: TagExprArgs,

        /// Add a tag to the files
        #[arg(short = 'a', long)]
        add: Vec<String>,

        /// Remove a tag from the files
        #[arg(short = 'r', long)]
        remove: Vec<String>,

        /// Print the moves without performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// List all tags with the number of files carrying each
    Tags {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_command(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Commands::Init { path } => cli::init::run(
            cli::init::InitArgs {
                dir: path.unwrap_or(dir),
            },
            out,
        ),
        Commands::List {
            expr,
            show_tags,
            show_path,
            json,
        } => cli::list::run(
            cli::list::ListArgs {
                dir,
                expr,
                show_tags,
                show_path,
                json,
            },
            out,
        ),
        Commands::Edit {
            expr,
            add,
            remove,
            dry_run,
        } => cli::edit::run(
            cli::edit::EditArgs {
                dir,
                expr,
                add,
                remove,
                dry_run,
            },
            out,
        ),
        Commands::Tags { json } => cli::tags::run(cli::tags::TagsArgs { dir, json }, out),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = tagstore_logging::init_logging(LogConfig {
        app_name: "tagstore",
        verbose: cli.verbose,
    }) {
        tagstore_logging::init_console_logging(cli.verbose);
        warn!("File logging disabled: {:#}", err);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run_command(cli, &mut out).and_then(|()| out.flush().map_err(Into::into));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
