//! Best-effort staging of runtime shared libraries.
//!
//! Staging copies a runtime library next to the binaries that load it. It is
//! a convenience on top of the runtime-dependency declarations in
//! [`ResolvedConfig`](crate::assembler::ResolvedConfig): every failure is
//! captured as a [`StageStatus::Failed`] value and logged, never raised.
//!
//! A destination is only rewritten when it is missing or strictly older than
//! the source, and copies inherit the source modification time, so repeated
//! passes leave incremental build caches alone.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A runtime artifact and the directories it must be copied into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingTask {
    /// Capability that requested the staging.
    pub capability_id: String,
    /// Library to copy.
    pub source_artifact: PathBuf,
    /// Directories that must end up containing the library.
    pub destination_directories: Vec<PathBuf>,
}

/// What happened at one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    /// The artifact was copied.
    Copied,
    /// The destination already held a copy at least as new as the source.
    UpToDate,
    /// Directory creation or copy failed; the error is recorded only.
    Failed { error: String },
}

/// Result for a single destination directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationOutcome {
    /// Destination directory.
    pub directory: PathBuf,
    /// Full path of the staged file.
    pub target: PathBuf,
    /// Outcome of staging into this directory.
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Result of staging one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Capability that requested the staging.
    pub capability_id: String,
    /// Library that was staged.
    pub source_artifact: PathBuf,
    /// True when the source did not exist and nothing was attempted.
    pub source_missing: bool,
    /// Per-destination results, in declared order.
    pub destinations: Vec<DestinationOutcome>,
}

impl StageReport {
    /// Number of destinations that received a fresh copy.
    pub fn copies(&self) -> usize {
        self.destinations
            .iter()
            .filter(|d| d.status == StageStatus::Copied)
            .count()
    }

    /// Destinations that failed.
    pub fn failures(&self) -> impl Iterator<Item = &DestinationOutcome> {
        self.destinations
            .iter()
            .filter(|d| matches!(d.status, StageStatus::Failed { .. }))
    }
}

/// Copy a task's source artifact into each destination directory.
pub fn stage(task: &StagingTask) -> StageReport {
    let mut report = StageReport {
        capability_id: task.capability_id.clone(),
        source_artifact: task.source_artifact.clone(),
        source_missing: false,
        destinations: Vec::new(),
    };

    let file_name = match task.source_artifact.file_name() {
        Some(name) if task.source_artifact.is_file() => name.to_owned(),
        _ => {
            tracing::debug!(
                "[{}] nothing to stage, {} does not exist",
                task.capability_id,
                task.source_artifact.display()
            );
            report.source_missing = true;
            return report;
        }
    };

    for directory in &task.destination_directories {
        let target = directory.join(&file_name);
        let status = match stage_into(&task.source_artifact, directory, &target) {
            Ok(true) => {
                tracing::info!(
                    "[{}] staged {} into {}",
                    task.capability_id,
                    file_name.to_string_lossy(),
                    directory.display()
                );
                StageStatus::Copied
            }
            Ok(false) => StageStatus::UpToDate,
            Err(e) => {
                tracing::warn!(
                    "[{}] could not stage {} into {}: {}",
                    task.capability_id,
                    file_name.to_string_lossy(),
                    directory.display(),
                    e
                );
                StageStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        report.destinations.push(DestinationOutcome {
            directory: directory.clone(),
            target,
            status,
        });
    }

    report
}

/// Returns `Ok(true)` when a copy was made.
fn stage_into(source: &Path, directory: &Path, target: &Path) -> io::Result<bool> {
    fs::create_dir_all(directory)?;

    if !needs_copy(source, target)? {
        return Ok(false);
    }

    fs::copy(source, target)?;
    preserve_mtime(source, target);
    Ok(true)
}

/// A copy is needed when the target is missing or strictly older than the source.
fn needs_copy(source: &Path, target: &Path) -> io::Result<bool> {
    let target_meta = match fs::metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let source_mtime = fs::metadata(source)?.modified()?;
    Ok(target_meta.modified()? < source_mtime)
}

fn preserve_mtime(source: &Path, target: &Path) {
    let result = fs::metadata(source)
        .and_then(|m| m.modified())
        .and_then(|mtime| File::options().write(true).open(target)?.set_modified(mtime));
    if let Err(e) = result {
        tracing::debug!(
            "Could not carry modification time over to {}: {}",
            target.display(),
            e
        );
    }
}

/// Outcome of making sure an output directory exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// The directory already existed.
    Existing,
    /// The directory was created.
    Created,
    /// Creation failed; the error is recorded only.
    Failed { error: String },
}

/// Best-effort creation of a directory a later build step writes into.
pub fn ensure_directory(path: &Path) -> DirectoryStatus {
    if path.is_dir() {
        return DirectoryStatus::Existing;
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            tracing::debug!("Created output directory {}", path.display());
            DirectoryStatus::Created
        }
        Err(e) => {
            tracing::warn!("Could not create {}: {}", path.display(), e);
            DirectoryStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}
