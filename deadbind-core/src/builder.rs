//! Builder pattern API for running deadbind over files on disk.
//!
//! ```rust,ignore
//! use deadbind_core::prelude::*;
//!
//! let result = Deadbind::new("./web/src")
//!     .operation(Operation::CleanAll)
//!     .action(UnusedVariableAction::Prefix)
//!     .dry_run(true)
//!     .run()?;
//!
//! println!("{} files would change", result.changed_count());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{DeadbindConfig, EngineOptions, UnusedVariableAction};
use crate::engine::{analyze_source, Finding, Operation};
use crate::error::{DeadbindError, DeadbindResult, IoResultExt};
use crate::logging::log_file_error;
use crate::parse::FileKind;
use crate::scan::gather_source_files_with_excludes;

/// Builder for configuring a cleanup run.
#[derive(Debug, Clone)]
pub struct Deadbind {
    /// Files or directories to process
    paths: Vec<PathBuf>,

    operation: Operation,

    options: EngineOptions,

    /// Extra directory names to prune while scanning
    excluded_dirs: Vec<String>,

    /// Path substrings to skip
    ignored_patterns: Vec<String>,

    /// Compute results without writing files
    dry_run: bool,
}

impl Deadbind {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
            operation: Operation::CleanAll,
            options: EngineOptions::default(),
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
            dry_run: false,
        }
    }

    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn action(mut self, action: UnusedVariableAction) -> Self {
        self.options.unused_variable_action = action;
        self
    }

    pub fn remove_trailing_parameters(mut self, enabled: bool) -> Self {
        self.options.remove_trailing_parameters = enabled;
        self
    }

    /// Applies engine options and ignore patterns from a loaded config.
    pub fn with_config(mut self, config: &DeadbindConfig) -> Self {
        self.options = config.engine_options();
        self.ignored_patterns.extend(config.ignore.iter().cloned());
        self
    }

    /// Add directory names to prune while scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add path substrings to skip.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Source files selected by the configured paths, deduplicated and sorted.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let mut files = Vec::new();
        for path in &self.paths {
            let found = gather_source_files_with_excludes(path, &excludes)
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            files.extend(found.into_iter().filter(|f| !self.is_ignored(f)));
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignored_patterns.iter().any(|p| path.contains(p.as_str()))
    }

    /// Runs the operation on every file in parallel, writing changes back
    /// unless in dry-run mode.
    pub fn run(&self) -> Result<RunResult> {
        let files = self.files()?;
        info!(files = files.len(), operation = %self.operation, dry_run = self.dry_run, "starting run");

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| {
                let status = match self.process(path) {
                    Ok(true) => FileStatus::Changed,
                    Ok(false) => FileStatus::Unchanged,
                    Err(e) => {
                        log_file_error(path, &e);
                        FileStatus::Failed(e.to_string())
                    }
                };
                FileOutcome {
                    path: path.clone(),
                    status,
                }
            })
            .collect();

        Ok(RunResult { files: outcomes })
    }

    fn process(&self, path: &Path) -> DeadbindResult<bool> {
        let kind = FileKind::from_path(path).ok_or_else(|| DeadbindError::unsupported(path))?;
        let source = fs::read_to_string(path).with_path(path)?;
        let Some(text) = self.operation.run(&source, kind, path, &self.options)? else {
            debug!(path = %path.display(), "no change");
            return Ok(false);
        };
        if !self.dry_run {
            fs::write(path, text).with_path(path)?;
        }
        Ok(true)
    }

    /// Reports unused bindings without changing anything.
    pub fn check(&self) -> Result<CheckResult> {
        let files = self.files()?;
        let results: Vec<(PathBuf, DeadbindResult<Vec<Finding>>)> = files
            .par_iter()
            .map(|path| (path.clone(), check_file(path)))
            .collect();

        let mut result = CheckResult::default();
        for (path, outcome) in results {
            match outcome {
                Ok(findings) if findings.is_empty() => {}
                Ok(findings) => result.files.push(FileFindings { path, findings }),
                Err(e) => {
                    log_file_error(&path, &e);
                    result.failures.push(FileOutcome {
                        path,
                        status: FileStatus::Failed(e.to_string()),
                    });
                }
            }
        }
        Ok(result)
    }
}

fn check_file(path: &Path) -> DeadbindResult<Vec<Finding>> {
    let kind = FileKind::from_path(path).ok_or_else(|| DeadbindError::unsupported(path))?;
    let source = fs::read_to_string(path).with_path(path)?;
    analyze_source(&source, kind, path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "error")]
pub enum FileStatus {
    Unchanged,
    Changed,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Result of [`Deadbind::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunResult {
    pub files: Vec<FileOutcome>,
}

impl RunResult {
    pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.status == FileStatus::Changed)
    }

    pub fn changed_count(&self) -> usize {
        self.changed().count()
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed(_)))
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFindings {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

/// Result of [`Deadbind::check`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    /// Files with at least one finding
    pub files: Vec<FileFindings>,
    /// Files that could not be analyzed
    pub failures: Vec<FileOutcome>,
}

impl CheckResult {
    pub fn total_findings(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    pub fn has_findings(&self) -> bool {
        self.total_findings() > 0
    }
}
