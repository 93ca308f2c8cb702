use std::fmt;
use std::path::{Path, PathBuf};

use crate::base_url::{scoped_base_url, trim_trailing_slash};
use crate::diff::build_unified_diff;
use crate::error::{RebaseError, RebaseResult};
use crate::fs::{atomic_write, read_markdown};
use crate::paths::converted_path;
use crate::rewrite::{LinkRewriter, RewriteResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebaseOptions {
    /// Compute and report without writing.
    pub dry_run: bool,
    /// Write back to the source path instead of a `_converted` sibling.
    pub overwrite: bool,
    /// Attach a unified diff to every rewritten file.
    pub diff: bool,
}

/// Per-file outcome. Failures are values so one bad file never stops a batch.
#[derive(Debug)]
pub enum FileReport {
    Rewritten {
        path: PathBuf,
        output: PathBuf,
        rewrites: usize,
        written: bool,
        diff: Option<String>,
    },
    Unchanged {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: RebaseError,
    },
}

impl FileReport {
    pub fn path(&self) -> &Path {
        match self {
            Self::Rewritten { path, .. } | Self::Unchanged { path } | Self::Failed { path, .. } => {
                path
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rewritten {
                path,
                output,
                written: true,
                ..
            } => write!(f, "✓ converted {} -> {}", path.display(), output.display()),
            Self::Rewritten { path, output, .. } => {
                write!(f, "→ would convert {} -> {}", path.display(), output.display())
            }
            Self::Unchanged { path } => write!(f, "· no changes needed for {}", path.display()),
            Self::Failed { path, error } => {
                write!(f, "✗ error processing {}: {}", path.display(), error)
            }
        }
    }
}

/// Aggregate of every file processed in one run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub dry_run: bool,
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.reports.len()
    }

    pub fn changed(&self) -> usize {
        self.count(|report| matches!(report, FileReport::Rewritten { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|report| matches!(report, FileReport::Unchanged { .. }))
    }

    pub fn errors(&self) -> usize {
        self.count(FileReport::is_failure)
    }

    fn count(&self, predicate: impl Fn(&FileReport) -> bool) -> usize {
        self.reports.iter().filter(|report| predicate(report)).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "to convert" } else { "converted" };
        write!(
            f,
            "Processed {} file(s): {} {verb}, {} unchanged, {} error(s)",
            self.processed(),
            self.changed(),
            self.unchanged(),
            self.errors()
        )
    }
}

/// Rewrites a tree of Markdown files whose `root` is published at `base_url`.
#[derive(Debug, Clone)]
pub struct Rebaser {
    base_url: String,
    root: PathBuf,
    options: RebaseOptions,
}

impl Rebaser {
    pub fn new(base_url: &str, root: impl Into<PathBuf>, options: RebaseOptions) -> Self {
        Self {
            base_url: trim_trailing_slash(base_url).to_string(),
            root: root.into(),
            options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> RebaseOptions {
        self.options
    }

    /// Base URL that links inside `file` resolve against.
    pub fn scoped_base_url(&self, file: &Path) -> String {
        let file_dir = file.parent().unwrap_or(self.root.as_path());
        scoped_base_url(&self.base_url, file_dir, &self.root)
    }

    /// Rewrite `content` as if it lived at `file`. Nothing touches the disk.
    pub fn rewrite_content(&self, file: &Path, content: &str) -> RewriteResult {
        let scoped = self.scoped_base_url(file);
        let result = LinkRewriter::new(&scoped).rewrite(content);
        tracing::debug!(
            path = %file.display(),
            base = %scoped,
            rewrites = result.rewrites,
            "Rewrote links"
        );
        result
    }

    pub fn process_file(&self, path: &Path) -> FileReport {
        match self.try_process_file(path) {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "Failed to process file");
                FileReport::Failed {
                    path: path.to_path_buf(),
                    error,
                }
            }
        }
    }

    /// Process `files` in order, handing each report to `on_report` as soon as
    /// it is available.
    pub fn process_all<F>(&self, files: &[PathBuf], mut on_report: F) -> BatchSummary
    where
        F: FnMut(&FileReport),
    {
        let mut summary = BatchSummary {
            dry_run: self.options.dry_run,
            reports: Vec::with_capacity(files.len()),
        };

        for file in files {
            let report = self.process_file(file);
            on_report(&report);
            summary.reports.push(report);
        }

        summary
    }

    fn try_process_file(&self, path: &Path) -> RebaseResult<FileReport> {
        let content = read_markdown(path)?;
        let result = self.rewrite_content(path, &content);

        if !result.changed {
            return Ok(FileReport::Unchanged {
                path: path.to_path_buf(),
            });
        }

        let output = if self.options.overwrite {
            path.to_path_buf()
        } else {
            converted_path(path)
        };

        let diff = if self.options.diff {
            build_unified_diff(&content, &result.content, &path.to_string_lossy())
        } else {
            None
        };

        if !self.options.dry_run {
            atomic_write(&output, &result.content)?;
        }

        Ok(FileReport::Rewritten {
            path: path.to_path_buf(),
            output,
            rewrites: result.rewrites,
            written: !self.options.dry_run,
            diff,
        })
    }
}
