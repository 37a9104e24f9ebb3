//! WordPress export processing for the DSFR documentation site.
//!
//! This crate provides:
//! - [`sanitize`] / [`sanitize_title`]: filesystem-safe slugs from article titles
//! - [`collect_titles`] / [`write_report`]: the `folder,title` CSV report
//! - [`read_instructions`] and [`Sorter`]: the CSV-driven copy of exported
//!   articles into the documentation tree
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use dsfr_config::SortColumns;
//! use dsfr_export::{SortOptions, Sorter, read_instructions};
//!
//! let instructions = read_instructions("tri.csv".as_ref(), &SortColumns::default())?;
//! let sorter = Sorter::new(SortOptions {
//!     base_dir: PathBuf::from("wordpress-content-to-sort"),
//!     dest_root: PathBuf::from("."),
//!     dry_run: true,
//! })?;
//! let summary = sorter.run(instructions, |_, _, _| {});
//! println!("{} / {}", summary.succeeded(), summary.total());
//! # Ok(())
//! # }
//! ```

mod instructions;
mod report;
mod slug;
mod sorter;

use std::path::PathBuf;

pub use instructions::{SortInstruction, parse_instructions, read_instructions};
pub use report::{FolderTitle, ReportError, TitleRecord, TitleReport, collect_titles, write_report};
pub use slug::{MAX_SLUG_LEN, UNTITLED_SLUG, sanitize, sanitize_title};
pub use sorter::{ItemError, SortOptions, SortOutcome, SortStatus, SortSummary, Sorter};

/// Fatal error of a sort run.
///
/// Per-item failures are reported through [`SortStatus::Failed`] instead.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("Base directory not found: {}", .0.display())]
    BaseDirNotFound(PathBuf),
    #[error("Instruction file not found: {}", .0.display())]
    InstructionsNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
