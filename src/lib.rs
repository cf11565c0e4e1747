//! # Shellscan
//!
//! Finds triangle meshes that are not a single solid.
//!
//! Shellscan loads binary STL files, welds their triangle soup into an indexed
//! mesh and partitions the faces into shells: maximal groups of faces connected
//! through shared edges. A printable part has exactly one shell; files with more
//! are flagged for repair.
//!
//! ## Features
//!
//! - **Binary STL loader**: strict length checks, exact vertex welding
//! - **Face adjacency**: edge or vertex connectivity, tolerant of non-manifold input
//! - **Shell classification**: linear-time union-find with per-face labels
//! - **Batch scanning**: per-directory reports with optional relocation of flagged files
//!
//! ## Quick Start
//!
//! ```no_run
//! use shellscan::prelude::*;
//!
//! let mesh: TriangleMesh = shellscan::io::load("part.stl").unwrap();
//! let shells = classify(&mesh);
//!
//! println!("Faces: {}", mesh.num_faces());
//! println!("Shells: {}", shells.count());
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use shellscan::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(count_shells(&mesh), 1);
//! ```
//!
//! ## Scanning a Directory
//!
//! ```no_run
//! use shellscan::prelude::*;
//!
//! let summary = scan_directory(".", &ScanOptions::default(), &ScanListener::none()).unwrap();
//! for report in summary.needs_repair() {
//!     println!("{} has {:?} shells", report.file_name(), report.shells());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod prompt;
pub mod scan;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use shellscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        classify, classify_with_options, count_shells, Connectivity, FaceAdjacency, ShellLabels,
        ShellOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{weld_triangles, FaceId, MeshIndex, TriangleMesh, VertexId};
    pub use crate::scan::{scan_directory, ScanListener, ScanOptions, ScanSummary};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
