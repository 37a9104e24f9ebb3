//! `dsfr theme` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dsfr_config::{CliSettings, Config};
use dsfr_theme::{Theme, ThemeContext, ThemeReport, check_site_config};

use super::require_site_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the theme command.
#[derive(Args)]
pub(crate) struct ThemeArgs {
    /// Site configuration to check.
    #[arg(short, long)]
    mkdocs: Option<PathBuf>,

    /// Directory containing the theme package.
    #[arg(long)]
    theme_dir: Option<PathBuf>,
}

impl ThemeArgs {
    /// Execute the theme command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site configuration is missing or invalid, or
    /// if it does not select the theme.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mkdocs_path: self.mkdocs,
            theme_dir: self.theme_dir,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let site_config = require_site_config(&config, &output)?;

        let theme_config = &config.theme_resolved;
        let context = ThemeContext::new(Theme::named(&theme_config.name, &theme_config.dir));
        let report = check_site_config(site_config, &context)?;

        print_report(&output, context.theme(), &report);

        if !report.selected {
            return Err(CliError::Validation(format!(
                "{} does not select the {} theme",
                report.config_path.display(),
                context.theme().name
            )));
        }
        Ok(())
    }
}

fn print_report(output: &Output, theme: &Theme, report: &ThemeReport) {
    output.highlight(&format!("Theme {}", theme.name));
    output.detail("Theme", &theme.dir.display().to_string());
    output.detail("Templates", &theme.templates_dir().display().to_string());
    output.detail("Site config", &report.config_path.display().to_string());

    if let Some(selection) = &report.selection {
        if let Some(name) = &selection.name {
            output.detail("Selected name", name);
        }
        if let Some(custom_dir) = &selection.custom_dir {
            output.detail("Custom dir", custom_dir);
        }
    }

    if !report.theme_dir_exists {
        output.warning(&format!(
            "Theme directory not found: {}",
            theme.dir.display()
        ));
    }
    for template in &report.missing_templates {
        output.warning(&format!("Missing static template: {template}"));
    }

    if report.selected {
        output.success("Theme registered.");
    }
}
