//! `dsfr nav` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dsfr_config::{CliSettings, Config};
use dsfr_nav::{NavOptions, SectionTitles, update_site_nav};

use super::require_site_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Site configuration to update (default: first of public/mkdocs.yml,
    /// mkdocs.yml, internal/mkdocs.yml).
    #[arg(short, long)]
    mkdocs: Option<PathBuf>,

    /// Documentation directory (default: `docs_dir` of the site configuration).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Print the generated navigation without writing it.
    #[arg(long)]
    dry_run: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site configuration or the docs directory is
    /// missing, or if the rewrite fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mkdocs_path: self.mkdocs,
            docs_dir: self.docs_dir,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let site_config = require_site_config(&config, &output)?;
        let nav = &config.nav_resolved;

        let options = NavOptions {
            extensions: nav.extensions.clone(),
            section_titles: SectionTitles::with_overrides(nav.section_titles.clone()),
        };

        output.info(&format!("Updating {}...", site_config.display()));
        let update = update_site_nav(site_config, nav.docs_dir.as_deref(), &options, self.dry_run)?;

        if self.dry_run {
            output.highlight("\n[DRY RUN] No changes made.");
            output.info(&format!("Docs directory: {}", update.docs_dir.display()));
            output.info("");
            output.info(update.rendered.trim_end());
            return Ok(());
        }

        if let Some(backup) = &update.backup_path {
            output.info(&format!("Backup saved to {}", backup.display()));
        }
        output.success(&format!(
            "Navigation updated: {} documents in {} top-level entries",
            update.document_count(),
            update.nav.len()
        ));
        Ok(())
    }
}
