//! Mesh construction utilities.
//!
//! STL and similar formats store every triangle with its own copy of the corner
//! coordinates. Shell analysis needs shared vertex indices, so corners with
//! identical coordinates are welded into a single vertex here.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::triangle::TriangleMesh;

/// Incrementally welds a triangle soup into an indexed [`TriangleMesh`].
///
/// Two corners are merged only when their coordinates are bit-identical (with
/// `-0.0` treated as `0.0`). No tolerance is applied: nearby but distinct
/// points stay distinct, so welding never changes the topology a file encodes.
#[derive(Debug)]
pub struct MeshWelder<I: MeshIndex = u32> {
    mesh: TriangleMesh<I>,
    lookup: HashMap<[u64; 3], VertexId<I>>,
}

impl<I: MeshIndex> Default for MeshWelder<I> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<I: MeshIndex> MeshWelder<I> {
    /// Create a welder sized for `num_triangles` triangles.
    pub fn with_capacity(num_triangles: usize) -> Self {
        // Closed triangle meshes have roughly half as many vertices as faces.
        let num_vertices = num_triangles / 2 + 3;
        Self {
            mesh: TriangleMesh::with_capacity(num_vertices, num_triangles),
            lookup: HashMap::with_capacity(num_vertices),
        }
    }

    /// Return the id of the vertex at `p`, adding it if not seen before.
    pub fn vertex(&mut self, p: Point3<f64>) -> VertexId<I> {
        let key = weld_key(&p);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = self.mesh.add_vertex(p);
        self.lookup.insert(key, id);
        id
    }

    /// Add one triangle given by its corner positions.
    pub fn push_triangle(&mut self, corners: [Point3<f64>; 3]) {
        let face = corners.map(|p| self.vertex(p));
        self.mesh.add_face(face);
    }

    /// Number of triangles added so far.
    pub fn num_faces(&self) -> usize {
        self.mesh.num_faces()
    }

    /// Finish welding and return the mesh.
    pub fn finish(self) -> TriangleMesh<I> {
        self.mesh
    }
}

/// Build an indexed mesh from a triangle soup.
///
/// # Example
/// ```
/// use shellscan::mesh::{weld_triangles, TriangleMesh};
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
/// let d = Point3::new(1.0, 1.0, 0.0);
///
/// let mesh: TriangleMesh = weld_triangles(&[[a, b, c], [b, d, c]]);
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 2);
/// ```
pub fn weld_triangles<I: MeshIndex>(triangles: &[[Point3<f64>; 3]]) -> TriangleMesh<I> {
    let mut welder = MeshWelder::with_capacity(triangles.len());
    for tri in triangles {
        welder.push_triangle(*tri);
    }
    welder.finish()
}

/// Expand an indexed mesh back into a triangle soup.
pub fn to_triangle_soup<I: MeshIndex>(mesh: &TriangleMesh<I>) -> Vec<[Point3<f64>; 3]> {
    mesh.face_ids().map(|f| mesh.face_positions(f)).collect()
}

#[inline]
fn weld_key(p: &Point3<f64>) -> [u64; 3] {
    // Adding 0.0 maps -0.0 to +0.0 and leaves every other value unchanged.
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}
