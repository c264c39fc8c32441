//! Tagstore Core - Directory-Encoded Tag Sets
//!
//! A store keeps its files under `files/`, and every directory on the way down
//! from there is one tag. Nothing else records tags: the tree *is* the index.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Scanner   │────▶│    Index    │────▶│   Matcher   │   read path
//! │ (walk tree) │     │ (name→file) │     │ (+tag -tag) │
//! └─────────────┘     └──────┬──────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Retagger   │────▶ filesystem     write path
//!                     └─────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Tag set**: sorted set of directory names; its sorted join is the canonical path
//! - **FileRecord**: a file name, its tag set and its containing directory
//! - **StoreIndex**: all records keyed by name; names are unique across the store
//! - **Retag**: move a file to the canonical path of its edited tag set

pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod retagger;
pub mod scanner;
pub mod store;

// Re-exports for convenience
pub use codec::{canonical_path, tag_set, tags_from_path, validate_tag, TagSet};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use index::StoreIndex;
pub use matcher::{FileFilter, TagQuery};
pub use retagger::{move_file, RetagOutcome, RetagPlan, Retagger, TagEdit};
pub use scanner::{FileRecord, ScanIter, ScanOptions, Scanner};
pub use store::{Store, FILES_DIR, MARKER_FILE};
