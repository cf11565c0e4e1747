//! Per-file notifications from a running scan.
//!
//! The batch driver hands every [`FileReport`] to a listener as soon as it is
//! known, so a front end can print results while the scan is still running.
//!
//! # Example
//!
//! ```
//! use shellscan::scan::ScanListener;
//!
//! let listener = ScanListener::new(|report| {
//!     println!("{}: {:?}", report.file_name(), report.shells());
//! });
//! # let _ = listener;
//! ```

use super::FileReport;

/// A callback that receives each file's report during a scan.
pub struct ScanListener {
    callback: Box<dyn Fn(&FileReport) + Send + Sync>,
}

impl ScanListener {
    /// Create a new listener with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&FileReport) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Deliver one report.
    #[inline]
    pub fn notify(&self, report: &FileReport) {
        (self.callback)(report);
    }

    /// Create a listener that discards all reports.
    pub fn none() -> Self {
        Self::new(|_| {})
    }
}

impl Default for ScanListener {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for ScanListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanListener").finish_non_exhaustive()
    }
}
