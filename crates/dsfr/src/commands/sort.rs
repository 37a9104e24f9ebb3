//! `dsfr sort` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dsfr_config::{CliSettings, Config};
use dsfr_export::{SortOptions, SortOutcome, SortStatus, SortSummary, Sorter, read_instructions};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sort command.
#[derive(Args)]
pub(crate) struct SortArgs {
    /// Directory containing the exported articles.
    #[arg(short = 'r', long)]
    base_dir: Option<PathBuf>,

    /// CSV table listing what to copy where.
    #[arg(short = 'f', long)]
    csv_file: Option<PathBuf>,

    /// Root joined in front of every destination.
    #[arg(long)]
    dest_root: Option<PathBuf>,

    /// Show what would be copied without copying.
    #[arg(short = 's', long, visible_alias = "simulation")]
    pub(crate) dry_run: bool,
}

impl SortArgs {
    /// Execute the sort command.
    ///
    /// # Errors
    ///
    /// Returns an error if the export directory or the instruction table is
    /// missing. Failures of individual items are reported, not returned.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            sort_base_dir: self.base_dir,
            instructions: self.csv_file,
            dest_root: self.dest_root,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let sort = &config.sort_resolved;

        let sorter = Sorter::new(SortOptions {
            base_dir: sort.base_dir.clone(),
            dest_root: sort.dest_root.clone(),
            dry_run: self.dry_run,
        })?;
        let instructions = read_instructions(&sort.instructions, &sort.columns)?;

        if self.dry_run {
            output.highlight("[DRY RUN] No files will be copied.");
        }
        output.info(&format!(
            "{} instructions read from {}",
            instructions.len(),
            sort.instructions.display()
        ));

        let summary = sorter.run(instructions, |index, total, outcome| {
            print_outcome(&output, index, total, outcome);
        });
        print_summary(&output, &summary, self.dry_run);
        Ok(())
    }
}

fn print_outcome(output: &Output, index: usize, total: usize, outcome: &SortOutcome) {
    output.info(&format!("\n[{index}/{total}] {}", outcome.instruction.title));
    output.detail("Source", &outcome.source.display().to_string());
    output.detail("Destination", &outcome.instruction.destination);
    output.detail("Name", &outcome.slug);

    match &outcome.status {
        SortStatus::Copied => {
            output.success(&format!("  Copied to {}", outcome.target.display()));
        }
        SortStatus::WouldCopy => {
            output.success(&format!("  Would copy to {}", outcome.target.display()));
        }
        SortStatus::Failed(err) => output.error(&format!("  {err}")),
    }
}

fn print_summary(output: &Output, summary: &SortSummary, dry_run: bool) {
    output.info("");
    output.separator();
    if dry_run {
        output.highlight("Simulation summary");
    } else {
        output.highlight("Summary");
    }
    output.success(&format!("Succeeded: {}", summary.succeeded()));
    if summary.failed() > 0 {
        output.error(&format!("Failed: {}", summary.failed()));
    } else {
        output.info("Failed: 0");
    }
    output.info(&format!("Total: {}", summary.total()));
    output.separator();
}
