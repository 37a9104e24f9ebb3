//! `nav` rewrite of an MkDocs configuration file.
//!
//! Only the top-level `nav` block is replaced. Every other byte of the file
//! (comments, key order, custom tags such as `!!python/name:`) is kept as is.

use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::NavError;
use crate::tree::{NavNode, NavOptions, build_tree};

const NAV_KEY: &str = "nav";
const DOCS_DIR_KEY: &str = "docs_dir";
const DEFAULT_DOCS_DIR: &str = "docs";

/// Result of a navigation update.
#[derive(Debug)]
pub struct NavUpdate {
    pub config_path: PathBuf,
    pub docs_dir: PathBuf,
    /// Backup of the previous configuration, `None` on a dry run.
    pub backup_path: Option<PathBuf>,
    /// Rendered `nav:` block.
    pub rendered: String,
    pub nav: Vec<NavNode>,
}

impl NavUpdate {
    pub fn document_count(&self) -> usize {
        self.nav.iter().map(NavNode::leaf_count).sum()
    }
}

/// Render a `nav:` block, terminated by a newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_nav(nodes: &[NavNode]) -> Result<String, NavError> {
    if nodes.is_empty() {
        return Ok(format!("{NAV_KEY}: []\n"));
    }
    let body = serde_yaml::to_string(nodes)?;
    Ok(format!("{NAV_KEY}:\n{body}"))
}

/// Replace the top-level `nav` block of `content` with `nav_block`.
///
/// Appends the block when the file has no `nav` key.
pub fn splice_nav(content: &str, nav_block: &str) -> String {
    match find_top_level_block(content, NAV_KEY) {
        Some(range) => {
            let mut out = String::with_capacity(content.len() + nav_block.len());
            out.push_str(&content[..range.start]);
            out.push_str(nav_block);
            out.push_str(&content[range.end..]);
            out
        }
        None => {
            let mut out = content.to_owned();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(nav_block);
            out
        }
    }
}

/// Byte range of a top-level key and its nested lines.
///
/// Blank lines and column-0 comments belong to the block only when more
/// nested lines follow them; trailing ones are left outside the range.
fn find_top_level_block(content: &str, key: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    let mut lines = content.split_inclusive('\n');

    let mut start = None;
    for line in lines.by_ref() {
        let line_start = offset;
        offset += line.len();
        if is_key_line(line, key) {
            start = Some(line_start);
            break;
        }
    }
    let start = start?;

    let mut end = offset;
    for line in lines {
        let trimmed = line.trim_end();
        offset += line.len();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if line.starts_with([' ', '\t']) || trimmed == "-" || line.starts_with("- ") {
            end = offset;
            continue;
        }
        break;
    }
    Some(start..end)
}

/// Whether `line` opens the top-level `key`, bare or quoted.
fn is_key_line(line: &str, key: &str) -> bool {
    let rest = [("", ""), ("\"", "\""), ("'", "'")]
        .into_iter()
        .find_map(|(open, close)| {
            line.strip_prefix(open)?
                .strip_prefix(key)?
                .strip_prefix(close)
        });
    let Some(rest) = rest else {
        return false;
    };
    let Some(value) = rest.trim_start_matches([' ', '\t']).strip_prefix(':') else {
        return false;
    };
    value.is_empty() || value.starts_with(char::is_whitespace)
}

/// Parse a site configuration, requiring a mapping at the top level.
fn parse_site_config(path: &Path, content: &str) -> Result<Value, NavError> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| NavError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !value.is_mapping() {
        return Err(NavError::InvalidConfig {
            path: path.to_path_buf(),
            message: "top level is not a mapping".to_owned(),
        });
    }
    Ok(value)
}

/// Docs directory declared by a site configuration.
///
/// Relative `docs_dir` values resolve against the configuration's directory.
/// Defaults to `docs` next to the configuration.
pub fn docs_dir_of(config_path: &Path, config: &Value) -> PathBuf {
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    let declared = config
        .get(DOCS_DIR_KEY)
        .and_then(Value::as_str)
        .filter(|dir| !dir.trim().is_empty());
    base.join(declared.unwrap_or(DEFAULT_DOCS_DIR))
}

/// Regenerate the `nav` of a site configuration from its docs directory.
///
/// The previous configuration is saved as `<file>.backup` before the
/// rewrite and restored if the rewrite fails. With `dry_run` the file is
/// left untouched.
///
/// # Errors
///
/// Returns an error if the configuration is missing or invalid, if the
/// docs directory does not exist, or if writing fails.
pub fn update_site_nav(
    config_path: &Path,
    docs_dir: Option<&Path>,
    options: &NavOptions,
    dry_run: bool,
) -> Result<NavUpdate, NavError> {
    let content = fs::read_to_string(config_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => NavError::ConfigNotFound(config_path.to_path_buf()),
        _ => NavError::Io(e),
    })?;
    let config = parse_site_config(config_path, &content)?;

    let docs_dir = docs_dir.map_or_else(|| docs_dir_of(config_path, &config), Path::to_path_buf);
    let nav = build_tree(&docs_dir, options)?;
    let rendered = render_nav(&nav)?;
    let updated = splice_nav(&content, &rendered);
    parse_site_config(config_path, &updated)?;

    let mut update = NavUpdate {
        config_path: config_path.to_path_buf(),
        docs_dir,
        backup_path: None,
        rendered,
        nav,
    };
    if dry_run {
        return Ok(update);
    }

    let backup_path = backup_path_for(config_path);
    fs::write(&backup_path, &content)?;
    tracing::debug!(backup = %backup_path.display(), "Site configuration backed up");

    write_with_restore(config_path, &backup_path, || fs::write(config_path, &updated))?;

    tracing::info!(
        path = %config_path.display(),
        documents = update.document_count(),
        "Navigation updated"
    );
    update.backup_path = Some(backup_path);
    Ok(update)
}

/// Run `write`, copying `backup_path` back over `config_path` if it fails.
fn write_with_restore(
    config_path: &Path,
    backup_path: &Path,
    write: impl FnOnce() -> io::Result<()>,
) -> Result<(), NavError> {
    let Err(source) = write() else {
        return Ok(());
    };
    let restored = fs::copy(backup_path, config_path).is_ok();
    tracing::warn!(
        path = %config_path.display(),
        error = %source,
        restored,
        "Failed to write site configuration"
    );
    Err(NavError::Rewrite {
        path: config_path.to_path_buf(),
        source,
        restored,
    })
}

fn backup_path_for(config_path: &Path) -> PathBuf {
    let mut name = config_path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}
