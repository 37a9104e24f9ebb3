//! Title extraction with an ordered list of strategies.
//!
//! Resolution order: front matter `title` > first level-1 heading. Callers
//! that need a label for every file fall back to [`title_from_filename`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::frontmatter::{body, extract_yaml_title, split_front_matter};

/// A strategy inspects raw document text and may produce a title.
type TitleStrategy = fn(&str) -> Option<String>;

/// Strategies tried in order; the first one returning a title wins.
const STRATEGIES: &[TitleStrategy] = &[front_matter_title, first_heading_title];

/// Extract a document title from raw markdown text.
///
/// Returns `None` when neither the front matter nor the body provides one.
pub fn extract_title(content: &str) -> Option<String> {
    STRATEGIES.iter().find_map(|strategy| strategy(content))
}

/// Title declared in the front matter block, if any.
///
/// Malformed front matter yields `None` so the next strategy runs.
pub fn front_matter_title(content: &str) -> Option<String> {
    split_front_matter(content).and_then(|fm| extract_yaml_title(fm.yaml))
}

/// Text of the first level-1 heading (`# Title`) in the document body.
///
/// Lines inside fenced code blocks are ignored, so a shell comment in an
/// example never becomes a title.
pub fn first_heading_title(content: &str) -> Option<String> {
    let mut in_fence = false;
    for line in body(content).lines() {
        let line = line.trim();
        if line.starts_with("```") || line.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(text) = line.strip_prefix("# ").map(str::trim)
            && !text.is_empty()
        {
            return Some(text.to_owned());
        }
    }
    None
}

/// Read a file and extract its title.
///
/// Unreadable files are logged and reported as having no title.
pub fn read_title(file_path: &Path) -> Option<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => extract_title(&content),
        Err(e) => {
            tracing::warn!(path = %file_path.display(), error = %e, "Failed to read document");
            None
        }
    }
}

/// Generate a title from a file path's stem.
///
/// `guide-d_installation.md` becomes `Guide D Installation`.
pub fn title_from_filename(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|stem| title_from_name(&stem.to_string_lossy()))
        .unwrap_or_default()
}

/// Generate a title from a file or directory name.
///
/// Replaces `-` and `_` with spaces, then title-cases the result.
pub fn title_from_name(name: &str) -> String {
    titlecase(&name.replace(['-', '_'], " "))
}

/// Title-case a string: the first letter of every run of letters is
/// uppercased and the rest of the run lowercased.
///
/// `"FAQ"` becomes `"Faq"` and `"l'équipe"` becomes `"L'Équipe"`.
pub fn titlecase(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

/// A markdown document read from disk, reduced to what the tools need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Location of the source file.
    pub file_path: PathBuf,
    /// `title` key of the front matter block.
    pub front_matter_title: Option<String>,
    /// First level-1 heading of the body.
    pub first_heading_title: Option<String>,
}

impl Document {
    /// Build a document from already-loaded text.
    pub fn parse(file_path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            file_path: file_path.into(),
            front_matter_title: front_matter_title(content),
            first_heading_title: first_heading_title(content),
        }
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read as UTF-8 text.
    pub fn read(file_path: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(file_path)?;
        Ok(Self::parse(file_path, &content))
    }

    /// Resolved title, in the same order as [`extract_title`].
    pub fn title(&self) -> Option<&str> {
        self.front_matter_title
            .as_deref()
            .or(self.first_heading_title.as_deref())
    }

    /// Title to display: the resolved title, or one derived from the filename.
    pub fn display_title(&self) -> String {
        self.title()
            .map_or_else(|| title_from_filename(&self.file_path), str::to_owned)
    }
}
