//! CLI error types.

use dsfr_config::ConfigError;
use dsfr_export::{ReportError, SortError};
use dsfr_nav::NavError;
use dsfr_theme::ThemeError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("{0}")]
    Sort(#[from] SortError),

    #[error("{0}")]
    Nav(#[from] NavError),

    #[error("{0}")]
    Theme(#[from] ThemeError),

    #[error("{0}")]
    Validation(String),
}
