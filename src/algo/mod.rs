//! Mesh connectivity algorithms.
//!
//! - **Adjacency**: which faces share an edge (or a vertex)
//! - **Shells**: connected components of the face-adjacency graph

pub mod adjacency;
pub mod shells;
mod union_find;

pub use adjacency::{Connectivity, FaceAdjacency};
pub use shells::{classify, classify_with_options, count_shells, ShellLabels, ShellOptions};
