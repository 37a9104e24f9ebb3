//! Front matter splitting and YAML field parsing.
//!
//! A front matter block is a YAML mapping at the very start of a document,
//! opened by a `---` line and closed by a `---` (or `...`) line.

use serde_yaml::Value;

/// Opening and closing delimiter line.
const DELIMITER: &str = "---";

/// Alternative closing delimiter (YAML document end marker).
const DOCUMENT_END: &str = "...";

/// A document split into its front matter block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw YAML between the delimiter lines.
    pub yaml: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split a document into front matter and body.
///
/// Returns `None` when the document does not open with a delimiter line or
/// the block is never closed. A leading byte-order mark is ignored.
pub fn split_front_matter(content: &str) -> Option<FrontMatter<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == DOCUMENT_END {
            return Some(FrontMatter {
                yaml: &content[start..offset],
                body: &content[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    None
}

/// Body of a document: the text after the front matter, or the whole text.
pub fn body(content: &str) -> &str {
    split_front_matter(content).map_or(content, |fm| fm.body)
}

/// Parse the `title` field from front matter YAML.
///
/// Returns `None` if the content is empty, not valid YAML, not a mapping,
/// or has no usable `title` value. Numbers and booleans are rendered as
/// text so that `title: 2024` still produces a label.
pub(crate) fn extract_yaml_title(yaml: &str) -> Option<String> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = match serde_yaml::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed front matter");
            return None;
        }
    };
    if !value.is_mapping() {
        tracing::debug!("Ignoring front matter that is not a mapping");
        return None;
    }

    match value.get("title")? {
        Value::String(title) if !title.trim().is_empty() => Some(title.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
