//! Title report for an exported WordPress tree.
//!
//! Every subdirectory of the export is one article; its title is read from
//! the article's index file and written to a two-column CSV (`folder`,
//! `title`).

use std::fs;
use std::path::{Path, PathBuf};

use dsfr_meta::read_title;

/// Error returned while building or writing the title report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Base directory not found: {}", .0.display())]
    BaseDirNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    /// Article directory name.
    pub folder: String,
    /// Extracted title.
    pub title: String,
}

/// Result of scanning one article directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTitle {
    /// Article directory name.
    pub folder: String,
    /// Extracted title, `None` when the index file has neither front matter
    /// title nor heading.
    pub title: Option<String>,
}

/// Titles found in an export, in directory name order.
#[derive(Debug, Default)]
pub struct TitleReport {
    /// Every article directory that has an index file.
    pub entries: Vec<FolderTitle>,
}

impl TitleReport {
    /// Rows for the CSV report (articles with a title).
    pub fn records(&self) -> impl Iterator<Item = TitleRecord> + '_ {
        self.entries.iter().filter_map(|entry| {
            entry.title.as_ref().map(|title| TitleRecord {
                folder: entry.folder.clone(),
                title: title.clone(),
            })
        })
    }

    /// Article directories whose index file yielded no title.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.title.is_none())
            .map(|entry| entry.folder.as_str())
    }
}

/// Scan the export directory and extract each article's title.
///
/// Subdirectories without `index_file` are skipped.
///
/// # Errors
///
/// Returns [`ReportError::BaseDirNotFound`] if `base_dir` is not a directory,
/// or an I/O error if it cannot be listed.
pub fn collect_titles(base_dir: &Path, index_file: &str) -> Result<TitleReport, ReportError> {
    if !base_dir.is_dir() {
        return Err(ReportError::BaseDirNotFound(base_dir.to_path_buf()));
    }

    let mut folders: Vec<_> = fs::read_dir(base_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut report = TitleReport::default();
    for folder in folders {
        let index_path = folder.join(index_file);
        if !index_path.is_file() {
            tracing::debug!(path = %folder.display(), "No index file, skipping");
            continue;
        }

        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        report.entries.push(FolderTitle {
            folder: name,
            title: read_title(&index_path),
        });
    }

    tracing::info!(
        articles = report.entries.len(),
        base_dir = %base_dir.display(),
        "Title scan completed"
    );
    Ok(report)
}

/// Write report rows as CSV, header included.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_report<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a TitleRecord>,
) -> Result<usize, ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["folder", "title"])?;

    let mut count = 0;
    for record in records {
        writer.write_record([record.folder.as_str(), record.title.as_str()])?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_article(base: &Path, folder: &str, content: &str) {
        let dir = base.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.md"), content).unwrap();
    }

    #[test]
    fn test_collect_titles_sorted_by_folder() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_article(temp_dir.path(), "b-article", "---\ntitle: Second\n---\n");
        create_article(temp_dir.path(), "a-article", "# First\n");

        let report = collect_titles(temp_dir.path(), "index.md").unwrap();

        let records: Vec<_> = report.records().collect();
        assert_eq!(
            records,
            vec![
                TitleRecord {
                    folder: "a-article".to_owned(),
                    title: "First".to_owned(),
                },
                TitleRecord {
                    folder: "b-article".to_owned(),
                    title: "Second".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_collect_titles_reports_missing_titles() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_article(temp_dir.path(), "untitled", "Just some text.\n");
        create_article(temp_dir.path(), "titled", "# Title\n");

        let report = collect_titles(temp_dir.path(), "index.md").unwrap();

        assert_eq!(report.missing().collect::<Vec<_>>(), vec!["untitled"]);
        assert_eq!(report.records().count(), 1);
    }

    #[test]
    fn test_collect_titles_skips_dirs_without_index_and_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("empty")).unwrap();
        fs::write(temp_dir.path().join("loose.md"), "# Loose\n").unwrap();

        let report = collect_titles(temp_dir.path(), "index.md").unwrap();

        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_collect_titles_missing_base_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = collect_titles(&temp_dir.path().join("absent"), "index.md").unwrap_err();
        assert!(matches!(err, ReportError::BaseDirNotFound(_)));
    }

    #[test]
    fn test_write_report_includes_header_and_quotes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("titles.csv");
        let records = vec![
            TitleRecord {
                folder: "console".to_owned(),
                title: "Console Cloud π : ajouter, supprimer".to_owned(),
            },
            TitleRecord {
                folder: "faq".to_owned(),
                title: "FAQ".to_owned(),
            },
        ];

        let written = write_report(&path, &records).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "folder,title\nconsole,\"Console Cloud π : ajouter, supprimer\"\nfaq,FAQ\n"
        );
    }

    #[test]
    fn test_write_report_empty_still_has_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("titles.csv");

        let written = write_report(&path, &[]).unwrap();

        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "folder,title\n");
    }
}
