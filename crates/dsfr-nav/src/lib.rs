//! MkDocs navigation generation.
//!
//! Walks a docs directory into a [`NavNode`] tree, titling each document from
//! its front matter or first heading and each section from its directory name,
//! then splices the rendered tree into the `nav` key of `mkdocs.yml`.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), dsfr_nav::NavError> {
//! use std::path::Path;
//! use dsfr_nav::{NavOptions, update_site_nav};
//!
//! let update = update_site_nav(Path::new("mkdocs.yml"), None, &NavOptions::default(), false)?;
//! assert!(update.backup_path.is_some());
//! # Ok(())
//! # }
//! ```

mod labels;
mod site_config;
mod tree;

use std::path::PathBuf;

pub use labels::SectionTitles;
pub use site_config::{NavUpdate, docs_dir_of, render_nav, splice_nav, update_site_nav};
pub use tree::{NavNode, NavOptions, build_tree};

/// Error returned by navigation generation.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Site configuration not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Documentation directory not found: {}", .0.display())]
    DocsDirNotFound(PathBuf),
    #[error("Invalid site configuration {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },
    #[error("Failed to write {}: {source} (backup restored: {restored})", path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        restored: bool,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
