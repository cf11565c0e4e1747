//! Core mesh data structures.
//!
//! The primary type is [`TriangleMesh`], an indexed triangle mesh: a list of
//! vertex positions and a list of faces, each face a triple of vertex indices.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are typically loaded from STL files, built from face-vertex lists, or
//! welded from a triangle soup:
//!
//! ```
//! use shellscan::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod triangle;

pub use builder::{to_triangle_soup, weld_triangles, MeshWelder};
pub use index::{FaceId, MeshIndex, VertexId};
pub use triangle::TriangleMesh;
