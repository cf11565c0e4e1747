//! Face adjacency.
//!
//! Two faces are adjacent when they share an edge, meaning two vertex indices
//! regardless of winding. [`Connectivity::Vertex`] relaxes this to any shared vertex.
//!
//! Edges with more than two incident faces (non-manifold edges) are ordinary
//! input here; every face on such an edge is adjacent to every other one.

use std::collections::HashMap;

use crate::mesh::{FaceId, MeshIndex, TriangleMesh, VertexId};

/// Which shared boundary element makes two faces adjacent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Faces sharing an edge (two vertices) are adjacent.
    #[default]
    Edge,
    /// Faces sharing at least one vertex are adjacent.
    Vertex,
}

/// An undirected edge with `v0 <= v1`.
pub type Edge<I> = (VertexId<I>, VertexId<I>);

/// Face adjacency derived from an indexed face list.
#[derive(Debug, Clone)]
pub struct FaceAdjacency<I: MeshIndex = u32> {
    connectivity: Connectivity,
    faces: Vec<[VertexId<I>; 3]>,
    /// Maps each normalized edge to the faces using it, in face order.
    edge_faces: HashMap<Edge<I>, Vec<FaceId<I>>>,
    /// Faces around each vertex; only filled for [`Connectivity::Vertex`].
    vertex_faces: Vec<Vec<FaceId<I>>>,
}

impl<I: MeshIndex> FaceAdjacency<I> {
    /// Build edge adjacency for a mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use shellscan::algo::adjacency::FaceAdjacency;
    /// use shellscan::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![Point3::origin(); 4];
    /// let mesh: TriangleMesh = TriangleMesh::from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
    /// let adj = FaceAdjacency::build(&mesh);
    ///
    /// assert_eq!(adj.edge_count(), 5);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// ```
    pub fn build(mesh: &TriangleMesh<I>) -> Self {
        Self::build_with(mesh, Connectivity::Edge)
    }

    /// Build adjacency under the given connectivity.
    pub fn build_with(mesh: &TriangleMesh<I>, connectivity: Connectivity) -> Self {
        let mut edge_faces: HashMap<Edge<I>, Vec<FaceId<I>>> =
            HashMap::with_capacity(mesh.num_faces() * 3 / 2 + 1);

        for (fi, face) in mesh.faces().iter().enumerate() {
            let face_id = FaceId::new(fi);
            for edge in face_edges(face) {
                let incident = edge_faces.entry(edge).or_default();
                // A degenerate face can list the same edge twice.
                if incident.last() != Some(&face_id) {
                    incident.push(face_id);
                }
            }
        }

        let vertex_faces = match connectivity {
            Connectivity::Edge => Vec::new(),
            Connectivity::Vertex => {
                let mut around = vec![Vec::new(); mesh.num_vertices()];
                for (fi, face) in mesh.faces().iter().enumerate() {
                    let face_id = FaceId::new(fi);
                    for v in face {
                        let list: &mut Vec<FaceId<I>> = &mut around[v.index()];
                        if list.last() != Some(&face_id) {
                            list.push(face_id);
                        }
                    }
                }
                around
            }
        };

        Self {
            connectivity,
            faces: mesh.faces().to_vec(),
            edge_faces,
            vertex_faces,
        }
    }

    /// The connectivity this adjacency was built for.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Number of faces covered.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Groups of faces that are pairwise adjacent through one shared element.
    ///
    /// Under edge connectivity these are the incident-face lists of each edge;
    /// under vertex connectivity, the faces around each vertex.
    pub fn incident_groups(&self) -> Box<dyn Iterator<Item = &[FaceId<I>]> + '_> {
        match self.connectivity {
            Connectivity::Edge => Box::new(self.edge_faces.values().map(Vec::as_slice)),
            Connectivity::Vertex => Box::new(self.vertex_faces.iter().map(Vec::as_slice)),
        }
    }

    /// Faces adjacent to `face`, sorted and without duplicates. Never contains `face` itself.
    pub fn neighbors(&self, face: FaceId<I>) -> Vec<FaceId<I>> {
        let tri = &self.faces[face.index()];
        let mut out: Vec<FaceId<I>> = match self.connectivity {
            Connectivity::Edge => face_edges(tri)
                .filter_map(|e| self.edge_faces.get(&e))
                .flatten()
                .copied()
                .collect(),
            Connectivity::Vertex => tri
                .iter()
                .flat_map(|v| self.vertex_faces[v.index()].iter().copied())
                .collect(),
        };
        out.retain(|&f| f != face);
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Faces using the edge between `v0` and `v1`, in either direction.
    ///
    /// Returns `None` if no face uses that edge.
    pub fn faces_for_edge(&self, v0: VertexId<I>, v1: VertexId<I>) -> Option<&[FaceId<I>]> {
        self.edge_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Number of distinct non-degenerate edges.
    pub fn edge_count(&self) -> usize {
        self.edge_faces.len()
    }

    /// Number of edges used by exactly one face.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_faces.values().filter(|f| f.len() == 1).count()
    }

    /// Number of edges used by more than two faces.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_faces.values().filter(|f| f.len() > 2).count()
    }

    /// No edge is used by more than two faces.
    pub fn is_manifold(&self) -> bool {
        self.edge_faces.values().all(|f| f.len() <= 2)
    }

    /// Every edge is used by at least two faces.
    pub fn is_watertight(&self) -> bool {
        self.edge_faces.values().all(|f| f.len() >= 2)
    }
}

/// Normalize edge direction so `v0 <= v1`.
#[inline]
fn normalize_edge<I: MeshIndex>(v0: VertexId<I>, v1: VertexId<I>) -> Edge<I> {
    if v0 <= v1 {
        (v0, v1)
    } else {
        (v1, v0)
    }
}

/// The non-degenerate edges of a triangle.
fn face_edges<I: MeshIndex>(face: &[VertexId<I>; 3]) -> impl Iterator<Item = Edge<I>> {
    let [a, b, c] = *face;
    [(a, b), (b, c), (c, a)]
        .into_iter()
        .filter(|(u, v)| u != v)
        .map(|(u, v)| normalize_edge(u, v))
}
