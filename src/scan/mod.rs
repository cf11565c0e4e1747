//! Batch scanning of a directory of mesh files.
//!
//! [`scan_directory`] looks at every `.stl` file directly inside a directory
//! (any letter case, no recursion), loads it, counts its shells and sorts it
//! into "good" (one shell) or "needs repair" (more than one shell). Files that
//! cannot be opened or parsed are reported and skipped; they never stop the scan.
//!
//! All tallies live in the returned [`ScanSummary`]. For any scan,
//! `multi_shell + single_shell == total`, where `total` counts the files that
//! loaded successfully.
//!
//! # Example
//!
//! ```no_run
//! use shellscan::scan::{scan_directory, ScanListener, ScanOptions};
//!
//! let summary = scan_directory(".", &ScanOptions::default(), &ScanListener::none()).unwrap();
//! println!("{} of {} files need repair", summary.multi_shell, summary.total);
//! ```

mod listener;
pub mod report;

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

pub use listener::ScanListener;

use crate::algo::{classify_with_options, Connectivity, ShellOptions};
use crate::error::{MeshError, Result};
use crate::io;
use crate::mesh::TriangleMesh;

/// Folder name used for relocating multi-shell files when none is given.
pub const DEFAULT_QUARANTINE_DIR: &str = "Please_Repair";

/// Options for a directory scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Process files in file-name order instead of directory order.
    pub sort: bool,

    /// Move multi-shell files into this folder. Relative paths are resolved
    /// against the scanned directory. `None` leaves files in place.
    pub quarantine: Option<PathBuf>,

    /// How shells are determined.
    pub shell: ShellOptions,

    /// Load and classify files on the rayon thread pool.
    /// Reports are still delivered in the same order as a sequential scan.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sort: true,
            quarantine: None,
            shell: ShellOptions::default(),
            parallel: false,
        }
    }
}

impl ScanOptions {
    /// Enable or disable file-name ordering.
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Move multi-shell files into `folder`.
    pub fn with_quarantine(mut self, folder: impl Into<PathBuf>) -> Self {
        self.quarantine = Some(folder.into());
        self
    }

    /// Set the adjacency definition used for shells.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.shell = self.shell.with_connectivity(connectivity);
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Shell analysis of one successfully loaded mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCheck {
    /// Number of welded vertices.
    pub vertices: usize,
    /// Number of faces.
    pub faces: usize,
    /// Face count of each shell, in shell-id order.
    pub shell_sizes: Vec<usize>,
}

impl ShellCheck {
    /// Number of shells.
    pub fn shells(&self) -> usize {
        self.shell_sizes.len()
    }

    /// Whether the mesh has more than one shell.
    pub fn needs_repair(&self) -> bool {
        self.shells() > 1
    }
}

/// What happened to a multi-shell file when relocation was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// Relocation is disabled.
    NotRequested,
    /// The file was moved to this path.
    Moved(PathBuf),
    /// The move failed; the file stays where it was.
    Failed(String),
}

/// Result of checking one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Exactly one shell.
    Good(ShellCheck),
    /// More than one shell.
    NeedsRepair {
        /// The shell analysis.
        check: ShellCheck,
        /// Where the file went, if relocation was requested.
        relocation: Relocation,
    },
    /// The file could not be loaded.
    Failed(MeshError),
}

/// One line of the scan report.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the scanned file.
    pub path: PathBuf,
    /// 1-based position among successfully loaded files; `None` for failures.
    pub ordinal: Option<usize>,
    /// What the scan found.
    pub outcome: FileOutcome,
}

impl FileReport {
    /// File name for display.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map_or_else(|| self.path.to_string_lossy(), |n| n.to_string_lossy())
    }

    /// Shell count, if the file loaded.
    pub fn shells(&self) -> Option<usize> {
        match &self.outcome {
            FileOutcome::Good(check) | FileOutcome::NeedsRepair { check, .. } => {
                Some(check.shells())
            }
            FileOutcome::Failed(_) => None,
        }
    }
}

/// Aggregated result of a directory scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files that loaded successfully.
    pub total: usize,
    /// Loaded files with more than one shell.
    pub multi_shell: usize,
    /// Loaded files with exactly one shell.
    pub single_shell: usize,
    /// Files that could not be loaded.
    pub failed: usize,
    /// Wall-clock duration of the whole scan.
    pub elapsed: Duration,
    /// Every file report, in report order.
    pub files: Vec<FileReport>,
}

impl ScanSummary {
    /// Reports of files that need repair.
    pub fn needs_repair(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::NeedsRepair { .. }))
    }

    /// Reports of files that failed to load.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Failed(_)))
    }

    /// Whether any multi-shell file was relocated.
    pub fn any_relocated(&self) -> bool {
        self.needs_repair().any(|r| {
            matches!(
                r.outcome,
                FileOutcome::NeedsRepair {
                    relocation: Relocation::Moved(_),
                    ..
                }
            )
        })
    }

    /// Fold one file's result into the tallies and return its report.
    fn record(
        &mut self,
        path: PathBuf,
        result: Result<ShellCheck>,
        quarantine: Option<&Path>,
    ) -> &FileReport {
        let (ordinal, outcome) = match result {
            Err(err) => {
                self.failed += 1;
                debug!(path = %path.display(), error = %err, "skipping file");
                (None, FileOutcome::Failed(err))
            }
            Ok(check) => {
                self.total += 1;
                if check.needs_repair() {
                    self.multi_shell += 1;
                    let relocation = match quarantine {
                        None => Relocation::NotRequested,
                        Some(folder) => match relocate(&path, folder) {
                            Ok(dest) => {
                                debug!(from = %path.display(), to = %dest.display(), "relocated");
                                Relocation::Moved(dest)
                            }
                            Err(err) => {
                                warn!(path = %path.display(), error = %err, "failed to relocate");
                                Relocation::Failed(err.to_string())
                            }
                        },
                    };
                    (Some(self.total), FileOutcome::NeedsRepair { check, relocation })
                } else {
                    self.single_shell += 1;
                    (Some(self.total), FileOutcome::Good(check))
                }
            }
        };

        self.files.push(FileReport {
            path,
            ordinal,
            outcome,
        });
        &self.files[self.files.len() - 1]
    }
}

/// Load a file and count its shells.
///
/// A file that parses but has no faces fails with [`MeshError::EmptyMesh`];
/// shells are not counted for it.
pub fn check_file<P: AsRef<Path>>(path: P, options: &ShellOptions) -> Result<ShellCheck> {
    let mesh: TriangleMesh = io::load(path)?;
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let shells = classify_with_options(&mesh, options);
    Ok(ShellCheck {
        vertices: mesh.num_vertices(),
        faces: mesh.num_faces(),
        shell_sizes: shells.shell_sizes().to_vec(),
    })
}

/// List the mesh files directly inside `dir`.
///
/// Only regular files (or links to them) with a supported extension are returned.
/// Entries that cannot be read are logged and skipped; only a directory that
/// cannot be opened is an error.
pub fn collect_candidates<P: AsRef<Path>>(dir: P, sort: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                warn!(dir = %dir.as_ref().display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if io::is_mesh_file(&path) && path.is_file() {
            paths.push(path);
        }
    }

    if sort {
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }
    Ok(paths)
}

/// Scan a directory and count the shells of every mesh file in it.
///
/// # Errors
///
/// Only fails if the directory itself cannot be read. Problems with individual
/// files are recorded in the summary.
pub fn scan_directory<P: AsRef<Path>>(
    dir: P,
    options: &ScanOptions,
    listener: &ScanListener,
) -> Result<ScanSummary> {
    let start = Instant::now();
    let dir = dir.as_ref();

    let candidates = collect_candidates(dir, options.sort)?;
    let quarantine = options.quarantine.as_ref().map(|q| dir.join(q));
    info!(dir = %dir.display(), files = candidates.len(), "scanning");

    let mut summary = ScanSummary::default();

    if options.parallel {
        let results: Vec<Result<ShellCheck>> = candidates
            .par_iter()
            .map(|path| check_file(path, &options.shell))
            .collect();

        for (path, result) in candidates.into_iter().zip(results) {
            let report = summary.record(path, result, quarantine.as_deref());
            listener.notify(report);
        }
    } else {
        for path in candidates {
            let result = check_file(&path, &options.shell);
            let report = summary.record(path, result, quarantine.as_deref());
            listener.notify(report);
        }
    }

    summary.elapsed = start.elapsed();
    info!(
        total = summary.total,
        multi_shell = summary.multi_shell,
        single_shell = summary.single_shell,
        failed = summary.failed,
        elapsed = ?summary.elapsed,
        "scan finished"
    );

    Ok(summary)
}

fn relocate(path: &Path, folder: &Path) -> std::io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    fs::create_dir_all(folder)?;
    let dest = folder.join(name);
    // rename would silently replace a file quarantined by an earlier run
    if fs::symlink_metadata(&dest).is_ok() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", dest.display()),
        ));
    }
    fs::rename(path, &dest)?;
    Ok(dest)
}
