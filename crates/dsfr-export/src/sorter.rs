//! CSV-driven copy of exported articles into the documentation tree.
//!
//! Each instruction copies `<base_dir>/<export_dir>` to
//! `<dest_root>/<destination>/<slug>`, where the slug is the sanitized
//! article title. Failures are recorded per item and never stop the batch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::SortError;
use crate::instructions::SortInstruction;
use crate::slug::sanitize;

/// Options for a sort run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// Directory containing the exported articles.
    pub base_dir: PathBuf,
    /// Root joined in front of every destination directory.
    pub dest_root: PathBuf,
    /// Report what would be copied without touching the filesystem.
    pub dry_run: bool,
}

/// Error for a single instruction.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Unsupported source type: {}", .0.display())]
    UnsupportedSource(PathBuf),
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened (or would happen) for one instruction.
#[derive(Debug)]
pub enum SortStatus {
    /// Content copied to the target path.
    Copied,
    /// Dry run: the source exists and would be copied.
    WouldCopy,
    /// The copy failed (or would fail in a dry run).
    Failed(ItemError),
}

/// Outcome of one instruction.
#[derive(Debug)]
pub struct SortOutcome {
    /// The instruction as read from the table.
    pub instruction: SortInstruction,
    /// Sanitized name given to the copy.
    pub slug: String,
    /// Full source path.
    pub source: PathBuf,
    /// Full target path.
    pub target: PathBuf,
    /// Result.
    pub status: SortStatus,
}

impl SortOutcome {
    /// True when the item was copied, or would be in a dry run.
    pub fn is_success(&self) -> bool {
        matches!(self.status, SortStatus::Copied | SortStatus::WouldCopy)
    }
}

/// Aggregated outcomes of a run.
#[derive(Debug, Default)]
pub struct SortSummary {
    /// One outcome per instruction, in table order.
    pub outcomes: Vec<SortOutcome>,
}

impl SortSummary {
    /// Number of successful items.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed items.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Number of processed items.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Copies exported articles according to sort instructions.
#[derive(Debug)]
pub struct Sorter {
    options: SortOptions,
}

impl Sorter {
    /// Create a sorter.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::BaseDirNotFound`] if the export directory does
    /// not exist.
    pub fn new(options: SortOptions) -> Result<Self, SortError> {
        if !options.base_dir.is_dir() {
            return Err(SortError::BaseDirNotFound(options.base_dir));
        }
        Ok(Self { options })
    }

    /// Process every instruction in order.
    ///
    /// `on_outcome` is called after each item with its 1-based position and
    /// the total count, so callers can report progress.
    pub fn run(
        &self,
        instructions: Vec<SortInstruction>,
        mut on_outcome: impl FnMut(usize, usize, &SortOutcome),
    ) -> SortSummary {
        let total = instructions.len();
        let mut summary = SortSummary::default();

        for (index, instruction) in instructions.into_iter().enumerate() {
            let outcome = self.process(instruction);
            on_outcome(index + 1, total, &outcome);
            summary.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            dry_run = self.options.dry_run,
            "Sort completed"
        );
        summary
    }

    /// Process a single instruction.
    pub fn process(&self, instruction: SortInstruction) -> SortOutcome {
        let slug = sanitize(Some(&instruction.title));
        let source = self.options.base_dir.join(&instruction.export_dir);
        let dest_dir = self.options.dest_root.join(&instruction.destination);
        let target = dest_dir.join(target_name(&source, &slug));

        let status = if !source.exists() {
            tracing::warn!(source = %source.display(), "Source not found");
            SortStatus::Failed(ItemError::SourceNotFound(source.clone()))
        } else if self.options.dry_run {
            SortStatus::WouldCopy
        } else {
            match copy_item(&source, &dest_dir, &target) {
                Ok(()) => {
                    tracing::info!(dest = %target.display(), "Copied");
                    SortStatus::Copied
                }
                Err(e) => {
                    tracing::warn!(source = %source.display(), error = %e, "Copy failed");
                    SortStatus::Failed(e)
                }
            }
        };

        SortOutcome {
            instruction,
            slug,
            source,
            target,
            status,
        }
    }
}

/// Name of the copy: the slug, plus the source extension for files.
fn target_name(source: &Path, slug: &str) -> String {
    match source.extension() {
        Some(ext) if source.is_file() => format!("{slug}.{}", ext.to_string_lossy()),
        _ => slug.to_owned(),
    }
}

/// Copy a file or directory into `dest_dir` as `target`.
///
/// An existing entry at `target` is replaced.
fn copy_item(source: &Path, dest_dir: &Path, target: &Path) -> Result<(), ItemError> {
    fs::create_dir_all(dest_dir).map_err(|e| ItemError::CreateDir {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let result = if source.is_file() {
        fs::copy(source, target).map(|_| ())
    } else if source.is_dir() {
        replace_dir(source, target)
    } else {
        return Err(ItemError::UnsupportedSource(source.to_path_buf()));
    };

    result.map_err(|e| ItemError::Copy {
        from: source.to_path_buf(),
        to: target.to_path_buf(),
        source: e,
    })
}

/// Replace `target` with a recursive copy of the `source` directory.
fn replace_dir(source: &Path, target: &Path) -> io::Result<()> {
    if target.is_dir() {
        fs::remove_dir_all(target)?;
    } else if target.exists() {
        fs::remove_file(target)?;
    }
    copy_dir_recursive(source, target)
}

/// Copy a directory tree.
///
/// Symbolic links are not followed: links to files are copied as regular
/// files, links to directories are skipped.
fn copy_dir_recursive(source: &Path, target: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let path = entry.path();
        let relative = match path.strip_prefix(source) {
            Ok(rel) if rel.as_os_str().is_empty() => {
                fs::create_dir_all(target)?;
                continue;
            }
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest = target.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::warn!(path = %path.display(), "Skipping symlinked directory");
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixture {
        _temp_dir: tempfile::TempDir,
        base_dir: PathBuf,
        dest_root: PathBuf,
    }

    fn create_fixture() -> Fixture {
        let temp_dir = tempfile::tempdir().unwrap();
        let base_dir = temp_dir.path().join("wordpress-content-to-sort");
        let dest_root = temp_dir.path().join("site");

        let article = base_dir.join("archi-microservices");
        fs::create_dir_all(article.join("images")).unwrap();
        fs::write(article.join("index.md"), "# Architecture\n").unwrap();
        fs::write(article.join("images/schema.png"), b"png").unwrap();
        fs::write(base_dir.join("faq.md"), "# FAQ\n").unwrap();
        fs::create_dir_all(&dest_root).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            base_dir,
            dest_root,
        }
    }

    fn instruction(title: &str, export_dir: &str, destination: &str) -> SortInstruction {
        SortInstruction {
            title: title.to_owned(),
            current_path: String::new(),
            export_dir: export_dir.to_owned(),
            destination: destination.to_owned(),
        }
    }

    fn sorter(fixture: &Fixture, dry_run: bool) -> Sorter {
        Sorter::new(SortOptions {
            base_dir: fixture.base_dir.clone(),
            dest_root: fixture.dest_root.clone(),
            dry_run,
        })
        .unwrap()
    }

    #[test]
    fn test_new_requires_base_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Sorter::new(SortOptions {
            base_dir: temp_dir.path().join("absent"),
            dest_root: temp_dir.path().to_path_buf(),
            dry_run: false,
        })
        .unwrap_err();
        assert!(matches!(err, SortError::BaseDirNotFound(_)));
    }

    #[test]
    fn test_copies_directory_with_sanitized_name() {
        let fixture = create_fixture();
        let sorter = sorter(&fixture, false);

        let outcome = sorter.process(instruction(
            "Architecture de microservices",
            "archi-microservices",
            "docs/explanation",
        ));

        assert!(matches!(outcome.status, SortStatus::Copied));
        let target = fixture
            .dest_root
            .join("docs/explanation/architecture-de-microservices");
        assert_eq!(outcome.target, target);
        assert_eq!(outcome.slug, "architecture-de-microservices");
        assert_eq!(
            fs::read_to_string(target.join("index.md")).unwrap(),
            "# Architecture\n"
        );
        assert!(target.join("images/schema.png").is_file());
    }

    #[test]
    fn test_copies_file_keeping_extension() {
        let fixture = create_fixture();
        let sorter = sorter(&fixture, false);

        let outcome = sorter.process(instruction("Foire aux questions", "faq.md", "docs"));

        assert!(outcome.is_success());
        assert_eq!(
            outcome.target,
            fixture.dest_root.join("docs/foire-aux-questions.md")
        );
        assert!(outcome.target.is_file());
    }

    #[test]
    fn test_existing_directory_is_replaced() {
        let fixture = create_fixture();
        let stale = fixture.dest_root.join("docs/archi/architecture");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("stale.md"), "old").unwrap();
        let sorter = sorter(&fixture, false);

        let outcome = sorter.process(instruction("Architecture", "archi-microservices", "docs/archi"));

        assert!(outcome.is_success());
        assert!(!stale.join("stale.md").exists());
        assert!(stale.join("index.md").is_file());
    }

    #[test]
    fn test_missing_source_is_recorded_and_batch_continues() {
        let fixture = create_fixture();
        let sorter = sorter(&fixture, false);
        let mut seen = Vec::new();

        let summary = sorter.run(
            vec![
                instruction("Absent", "does-not-exist", "docs"),
                instruction("FAQ", "faq.md", "docs"),
            ],
            |index, total, outcome| seen.push((index, total, outcome.is_success())),
        );

        assert_eq!(seen, vec![(1, 2, false), (2, 2, true)]);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.outcomes[0].status,
            SortStatus::Failed(ItemError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let fixture = create_fixture();
        let sorter = sorter(&fixture, true);

        let summary = sorter.run(
            vec![
                instruction("Architecture", "archi-microservices", "docs/explanation"),
                instruction("Absent", "does-not-exist", "docs"),
            ],
            |_, _, _| {},
        );

        assert!(matches!(summary.outcomes[0].status, SortStatus::WouldCopy));
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!fixture.dest_root.join("docs").exists());
    }

    #[test]
    fn test_untitled_instruction_uses_sentinel_name() {
        let fixture = create_fixture();
        let sorter = sorter(&fixture, true);

        let outcome = sorter.process(instruction("", "archi-microservices", "docs"));

        assert_eq!(outcome.slug, crate::UNTITLED_SLUG);
        assert_eq!(
            outcome.target,
            fixture.dest_root.join("docs/article_sans_titre")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_followed() {
        let fixture = create_fixture();
        let article = fixture.base_dir.join("archi-microservices");
        std::os::unix::fs::symlink("..", article.join("up")).unwrap();
        std::os::unix::fs::symlink("index.md", article.join("alias.md")).unwrap();
        let sorter = sorter(&fixture, false);

        let outcome = sorter.process(instruction("Architecture", "archi-microservices", "docs"));

        assert!(outcome.is_success(), "{:?}", outcome.status);
        let target = fixture.dest_root.join("docs/architecture");
        assert!(target.join("images/schema.png").is_file());
        assert!(!target.join("up").exists());
        assert_eq!(
            fs::read_to_string(target.join("alias.md")).unwrap(),
            "# Architecture\n"
        );
    }

    #[test]
    fn test_create_dir_failure_is_reported() {
        let fixture = create_fixture();
        // A file where the destination directory should be
        fs::write(fixture.dest_root.join("blocked"), "").unwrap();
        let sorter = sorter(&fixture, false);

        let outcome = sorter.process(instruction("FAQ", "faq.md", "blocked/sub"));

        assert!(matches!(
            outcome.status,
            SortStatus::Failed(ItemError::CreateDir { .. })
        ));
    }
}
