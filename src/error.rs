//! Error types for shellscan.
//!
//! Per-file failures ([`MeshError::Open`], [`MeshError::Parse`],
//! [`MeshError::EmptyMesh`]) are reported and skipped by the batch driver.
//! Only a directory that cannot be read ends a scan early.

use std::path::PathBuf;
use thiserror::Error;

use crate::io::stl::ParseError;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while loading, classifying or scanning meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The file could not be opened or read.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid binary STL.
    #[error("cannot read {}: {reason}", path.display())]
    Parse {
        /// The file path.
        path: PathBuf,
        /// What was wrong with the content.
        #[source]
        reason: ParseError,
    },

    /// The mesh has no faces.
    #[error("not a valid mesh (no faces)")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// More elements than the mesh index type can address.
    #[error("{count} {element} exceed the index limit of {max}")]
    IndexOverflow {
        /// What overflowed ("vertices" or "faces").
        element: &'static str,
        /// The number of elements requested.
        count: usize,
        /// The largest index the index type can hold.
        max: usize,
    },

    /// File I/O error outside of a single mesh file (e.g. reading a directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving mesh to file.
    #[error("failed to save mesh to {}: {message}", path.display())]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_names_file() {
        let err = MeshError::Open {
            path: PathBuf::from("parts/bracket.stl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("bracket.stl"), "{}", message);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parse_error_carries_reason() {
        let err = MeshError::Parse {
            path: PathBuf::from("cube.stl"),
            reason: ParseError::TooShort { len: 12 },
        };
        assert!(err.to_string().contains("12 bytes"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_converts() {
        let err: MeshError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no").into();
        assert!(matches!(err, MeshError::Io(_)));
    }
}
