//! Shell classification.
//!
//! A shell is a maximal group of faces connected through the face-adjacency
//! relation (see [`adjacency`](super::adjacency)). A mesh made of more than one
//! shell is not a single solid and usually needs repair before printing.
//!
//! Faces are partitioned with a disjoint-set forest: every group of faces sharing
//! an edge is merged, then shell ids are handed out in face order. The whole pass
//! is linear in the number of faces plus edges.
//!
//! # Example
//!
//! ```
//! use shellscan::algo::shells::classify;
//! use shellscan::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![Point3::origin(); 6];
//! let faces = vec![[0, 1, 2], [3, 4, 5]];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(&vertices, &faces).unwrap();
//!
//! let shells = classify(&mesh);
//! assert_eq!(shells.count(), 2);
//! ```

use tracing::trace;

use super::adjacency::{Connectivity, FaceAdjacency};
use super::union_find::DisjointSet;
use crate::mesh::{FaceId, MeshIndex, TriangleMesh};

/// Options for shell classification.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// Which shared element makes two faces part of the same shell.
    pub connectivity: Connectivity,
}

impl ShellOptions {
    /// Set the adjacency definition.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Per-face shell labels.
///
/// Shell ids are dense (`0..count()`) and assigned in order of first appearance
/// in the face list, so face 0 always belongs to shell 0. Only the grouping is
/// meaningful; the id values themselves carry no geometric meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLabels {
    labels: Vec<usize>,
    sizes: Vec<usize>,
}

impl ShellLabels {
    /// Number of shells. Zero only for a mesh without faces.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the faces form exactly one shell.
    pub fn is_single_shell(&self) -> bool {
        self.count() == 1
    }

    /// Shell id of a face.
    pub fn label<I: MeshIndex>(&self, face: FaceId<I>) -> usize {
        self.labels[face.index()]
    }

    /// Shell id of every face, indexed by face.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of faces in each shell, indexed by shell id.
    pub fn shell_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Id and face count of the largest shell. Ties go to the lower id.
    pub fn largest_shell(&self) -> Option<(usize, usize)> {
        self.sizes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (id, size)| match best {
                Some((_, best_size)) if best_size >= size => best,
                _ => Some((id, size)),
            })
    }

    /// Faces belonging to `shell`, in face order.
    pub fn faces_in<I: MeshIndex>(&self, shell: usize) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| l == shell)
            .map(|(f, _)| FaceId::new(f))
    }
}

/// Classify the faces of a mesh into shells using edge connectivity.
pub fn classify<I: MeshIndex>(mesh: &TriangleMesh<I>) -> ShellLabels {
    classify_with_options(mesh, &ShellOptions::default())
}

/// Classify the faces of a mesh into shells.
pub fn classify_with_options<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    options: &ShellOptions,
) -> ShellLabels {
    let adjacency = FaceAdjacency::build_with(mesh, options.connectivity);
    classify_adjacency(&adjacency)
}

/// Classify faces given a prebuilt adjacency.
pub fn classify_adjacency<I: MeshIndex>(adjacency: &FaceAdjacency<I>) -> ShellLabels {
    let num_faces = adjacency.num_faces();
    let mut sets = DisjointSet::new(num_faces);

    for group in adjacency.incident_groups() {
        if let Some((first, rest)) = group.split_first() {
            for other in rest {
                sets.union(first.index(), other.index());
            }
        }
    }

    const UNLABELED: usize = usize::MAX;
    let mut root_label = vec![UNLABELED; num_faces];
    let mut labels = Vec::with_capacity(num_faces);
    let mut sizes: Vec<usize> = Vec::with_capacity(sets.set_count());

    for face in 0..num_faces {
        let root = sets.find(face);
        if root_label[root] == UNLABELED {
            root_label[root] = sizes.len();
            sizes.push(0);
        }
        let label = root_label[root];
        sizes[label] += 1;
        labels.push(label);
    }

    trace!(faces = num_faces, shells = sizes.len(), "classified shells");

    ShellLabels { labels, sizes }
}

/// Count the shells of a mesh using edge connectivity.
pub fn count_shells<I: MeshIndex>(mesh: &TriangleMesh<I>) -> usize {
    classify(mesh).count()
}
