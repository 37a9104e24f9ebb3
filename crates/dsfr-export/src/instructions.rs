//! Sort instruction table parsing.
//!
//! The table is a CSV export of a spreadsheet with (at least) four columns:
//! article title, current path (informational), export directory and
//! destination directory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use dsfr_config::SortColumns;

use crate::SortError;

/// One row of the instruction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortInstruction {
    /// Human-readable article title (used to name the copy).
    pub title: String,
    /// Location in the old site, informational only.
    pub current_path: String,
    /// Source directory, relative to the export base directory.
    pub export_dir: String,
    /// Destination directory.
    pub destination: String,
}

/// Column positions resolved from the header row.
///
/// `None` marks a column that is neither named in the header nor available
/// at its historical position; its cells read as empty.
struct ColumnIndices {
    title: Option<usize>,
    current_path: Option<usize>,
    export_dir: Option<usize>,
    destination: Option<usize>,
}

impl ColumnIndices {
    /// Resolve header names, falling back to the historical column order for
    /// columns whose position is not already taken by a named match.
    fn resolve(headers: &csv::StringRecord, columns: &SortColumns) -> Self {
        let names = [
            &columns.title,
            &columns.current_path,
            &columns.export_dir,
            &columns.destination,
        ];
        let matched =
            names.map(|name| headers.iter().position(|header| header_matches(header, name)));

        let mut resolved = [None; 4];
        for (fallback, (name, found)) in names.iter().zip(matched).enumerate() {
            resolved[fallback] = found.or_else(|| {
                if matched.contains(&Some(fallback)) {
                    tracing::debug!(column = %name, "Header not found, position already taken");
                    None
                } else {
                    tracing::debug!(column = %name, fallback, "Header not found, using position");
                    Some(fallback)
                }
            });
        }

        let [title, current_path, export_dir, destination] = resolved;
        Self {
            title,
            current_path,
            export_dir,
            destination,
        }
    }
}

/// Compare a header cell with a configured name, ignoring surrounding
/// whitespace, a byte-order mark and ASCII case.
fn header_matches(header: &str, name: &str) -> bool {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .eq_ignore_ascii_case(name.trim())
}

/// Read the instruction table from a file.
///
/// # Errors
///
/// Returns [`SortError::InstructionsNotFound`] if the file does not exist, or
/// a CSV error if it cannot be parsed.
pub fn read_instructions(
    path: &Path,
    columns: &SortColumns,
) -> Result<Vec<SortInstruction>, SortError> {
    if !path.is_file() {
        return Err(SortError::InstructionsNotFound(path.to_path_buf()));
    }
    parse_instructions(File::open(path)?, columns)
}

/// Parse the instruction table from any reader.
///
/// Rows whose export directory or destination is empty are skipped.
///
/// # Errors
///
/// Returns a CSV error if the content is not valid CSV or not UTF-8.
pub fn parse_instructions<R: Read>(
    reader: R,
    columns: &SortColumns,
) -> Result<Vec<SortInstruction>, SortError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let indices = ColumnIndices::resolve(reader.headers()?, columns);

    let mut instructions = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .trim()
                .to_owned()
        };

        let instruction = SortInstruction {
            title: field(indices.title),
            current_path: field(indices.current_path),
            export_dir: field(indices.export_dir),
            destination: field(indices.destination),
        };

        if instruction.export_dir.is_empty() || instruction.destination.is_empty() {
            // Header is line 1, first data row is line 2
            tracing::debug!(line = row + 2, "Skipping row without source or destination");
            continue;
        }
        instructions.push(instruction);
    }

    Ok(instructions)
}
