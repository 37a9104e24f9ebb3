//! Navigation tree discovery by filesystem walking.
//!
//! Each directory level lists its documents first, then its subdirectories,
//! both in name order. A subdirectory becomes a section only if it contains
//! at least one document somewhere below it.

use std::fs;
use std::path::{Path, PathBuf};

use dsfr_meta::{read_title, title_from_filename};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::NavError;
use crate::labels::SectionTitles;

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    /// A document, with its path relative to the docs directory.
    Leaf { title: String, path: String },
    /// A directory with at least one document below it.
    Section { title: String, children: Vec<NavNode> },
}

impl NavNode {
    pub fn title(&self) -> &str {
        match self {
            Self::Leaf { title, .. } | Self::Section { title, .. } => title,
        }
    }

    /// Number of documents in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Section { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }
}

/// Serializes as a single-entry mapping, the MkDocs `nav` shape:
/// `{title: path}` for a document, `{title: [children]}` for a section.
impl Serialize for NavNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Leaf { title, path } => map.serialize_entry(title, path)?,
            Self::Section { title, children } => map.serialize_entry(title, children)?,
        }
        map.end()
    }
}

/// Options for [`build_tree`].
#[derive(Debug, Clone)]
pub struct NavOptions {
    /// Document extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Section label lookup.
    pub section_titles: SectionTitles,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_owned()],
            section_titles: SectionTitles::default(),
        }
    }
}

impl NavOptions {
    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Build the navigation tree of a docs directory.
///
/// # Errors
///
/// Returns [`NavError::DocsDirNotFound`] if `root` is not a directory.
pub fn build_tree(root: &Path, options: &NavOptions) -> Result<Vec<NavNode>, NavError> {
    if !root.is_dir() {
        return Err(NavError::DocsDirNotFound(root.to_path_buf()));
    }
    let nodes = scan_directory(root, "", options, &mut Vec::new());
    tracing::debug!(
        root = %root.display(),
        documents = nodes.iter().map(NavNode::leaf_count).sum::<usize>(),
        "Navigation tree built"
    );
    Ok(nodes)
}

fn scan_directory(
    dir_path: &Path,
    url_prefix: &str,
    options: &NavOptions,
    ancestors: &mut Vec<PathBuf>,
) -> Vec<NavNode> {
    // Symlinked directories are followed, so guard against cycles
    let canonical = fs::canonicalize(dir_path).unwrap_or_else(|_| dir_path.to_path_buf());
    if ancestors.contains(&canonical) {
        tracing::warn!(path = %dir_path.display(), "Skipping directory cycle");
        return Vec::new();
    }

    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir_path.display(), error = %e, "Failed to list directory");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            subdirs.push((name, path));
        } else if options.is_document(&path) {
            files.push((name, path));
        }
    }
    files.sort();
    subdirs.sort();

    let mut nodes = Vec::with_capacity(files.len() + subdirs.len());
    for (name, path) in files {
        let title = read_title(&path).unwrap_or_else(|| title_from_filename(&path));
        nodes.push(NavNode::Leaf {
            title,
            path: join_url(url_prefix, &name),
        });
    }

    ancestors.push(canonical);
    for (name, path) in subdirs {
        let children = scan_directory(&path, &join_url(url_prefix, &name), options, ancestors);
        if children.is_empty() {
            continue;
        }
        nodes.push(NavNode::Section {
            title: options.section_titles.label(&name),
            children,
        });
    }
    ancestors.pop();
    nodes
}

fn join_url(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
