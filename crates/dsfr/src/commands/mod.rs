//! CLI command implementations.

pub(crate) mod nav;
pub(crate) mod sort;
pub(crate) mod theme;
pub(crate) mod titles;

pub(crate) use nav::NavArgs;
pub(crate) use sort::SortArgs;
pub(crate) use theme::ThemeArgs;
pub(crate) use titles::TitlesArgs;

use std::path::Path;

use dsfr_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Locate the site configuration among the configured candidates.
fn require_site_config<'a>(config: &'a Config, output: &Output) -> Result<&'a Path, CliError> {
    let site_config = config.nav_resolved.find_site_config().ok_or_else(|| {
        output.error("Error: no mkdocs.yml found");
        output.info("\nLocations checked:");
        for candidate in &config.nav_resolved.config_candidates {
            output.info(&format!("  - {}", candidate.display()));
        }
        output.info("\nPass --mkdocs <FILE> or set nav.config_candidates in dsfr.toml.");
        CliError::Validation("site configuration not found".to_owned())
    })?;
    tracing::debug!(path = %site_config.display(), "Using site configuration");
    Ok(site_config)
}
