//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✓ | Binary only |
//!
//! Extensions are matched case-insensitively, so `part.STL` and `part.Stl` are
//! picked up as well.
//!
//! # Usage
//!
//! ```no_run
//! use shellscan::io::{load, save};
//! use shellscan::mesh::TriangleMesh;
//!
//! let mesh: TriangleMesh = load("model.stl").unwrap();
//! save(&mesh, "copy.stl").unwrap();
//! ```

pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Binary STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        if ext.eq_ignore_ascii_case("stl") {
            Some(Format::Stl)
        } else {
            None
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Whether the path carries an extension of a supported mesh format.
pub fn is_mesh_file<P: AsRef<Path>>(path: P) -> bool {
    Format::from_path(path).is_some()
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Stl => stl::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &TriangleMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Stl => stl::save(mesh, path),
    }
}
