//! `dsfr titles` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dsfr_config::{CliSettings, Config};
use dsfr_export::{collect_titles, write_report};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the titles command.
#[derive(Args)]
pub(crate) struct TitlesArgs {
    /// Directory containing one subdirectory per exported article.
    #[arg(short = 'r', long)]
    base_dir: Option<PathBuf>,

    /// CSV file to write.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File read in each article directory.
    #[arg(long)]
    index_file: Option<String>,
}

impl TitlesArgs {
    /// Execute the titles command.
    ///
    /// # Errors
    ///
    /// Returns an error if the export directory is missing or the report
    /// cannot be written.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            titles_base_dir: self.base_dir,
            titles_output: self.output,
            index_file: self.index_file,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let titles = &config.titles_resolved;

        output.info(&format!("Scanning {}...", titles.base_dir.display()));
        let report = collect_titles(&titles.base_dir, &titles.index_file)?;

        for folder in report.missing() {
            output.warning(&format!("No title found in {folder}/{}", titles.index_file));
        }

        let records: Vec<_> = report.records().collect();
        let written = write_report(&titles.output, &records)?;

        output.success(&format!(
            "{written} titles written to {}",
            titles.output.display()
        ));
        Ok(())
    }
}
