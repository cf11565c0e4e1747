//! Indexed triangle mesh.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// An indexed triangle mesh: shared vertex positions plus one index triple per face.
///
/// Unlike a half-edge structure this representation accepts any face soup,
/// including non-manifold edges and degenerate triangles, which is exactly
/// what files coming off a slicer or a CAD export tend to contain.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) faces: Vec<[VertexId<I>; 3]>,
}

impl<I: MeshIndex> Default for TriangleMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> TriangleMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    /// Build a mesh from vertex positions and triangle index triples.
    ///
    /// Every index must refer to an existing vertex, and both vertex and face
    /// counts must be addressable with `I`. An empty face list is accepted;
    /// callers that need a non-empty mesh check [`is_empty`](Self::is_empty).
    ///
    /// # Example
    /// ```
    /// use shellscan::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh: TriangleMesh = TriangleMesh::from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Self> {
        check_fits::<I>("vertices", vertices.len())?;
        check_fits::<I>("faces", faces.len())?;

        for (fi, face) in faces.iter().enumerate() {
            if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }

        let mut mesh = Self::with_capacity(vertices.len(), faces.len());
        mesh.vertices.extend_from_slice(vertices);
        mesh.faces.extend(
            faces
                .iter()
                .map(|f| [VertexId::new(f[0]), VertexId::new(f[1]), VertexId::new(f[2])]),
        );
        Ok(mesh)
    }

    // ==================== Construction ====================

    /// Append a vertex and return its id.
    ///
    /// # Panics
    /// Panics if the new vertex cannot be addressed with `I`.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        assert!(
            I::fits(self.vertices.len() + 1),
            "vertex count exceeds the index type limit"
        );
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(position);
        id
    }

    /// Append a face over existing vertices and return its id.
    ///
    /// # Panics
    /// Panics if any vertex id is out of range, or if the new face cannot be
    /// addressed with `I`.
    pub fn add_face(&mut self, face: [VertexId<I>; 3]) -> FaceId<I> {
        assert!(
            I::fits(self.faces.len() + 1),
            "face count exceeds the index type limit"
        );
        assert!(
            face.iter().all(|v| v.index() < self.vertices.len()),
            "face {:?} references a missing vertex",
            face
        );
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        id
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// A mesh without faces is not a usable mesh for shell analysis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertices[v.index()]
    }

    /// The three vertices of a face.
    #[inline]
    pub fn face_vertices(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        self.faces[f.index()]
    }

    /// All vertex positions, in index order.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// All faces, in index order.
    pub fn faces(&self) -> &[[VertexId<I>; 3]] {
        &self.faces
    }

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Geometry ====================

    /// Corner positions of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [a, b, c] = self.face_vertices(f);
        [*self.position(a), *self.position(b), *self.position(c)]
    }

    /// Unnormalized face normal (length is twice the face area).
    fn face_cross(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Unit face normal, or the zero vector for a zero-area face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        self.face_cross(f)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Face area.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        0.5 * self.face_cross(f).norm()
    }

    /// Whether a face repeats a vertex index.
    pub fn is_degenerate_face(&self, f: FaceId<I>) -> bool {
        let [a, b, c] = self.face_vertices(f);
        a == b || b == c || a == c
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Axis-aligned bounding box of all vertices, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }
}

fn check_fits<I: MeshIndex>(element: &'static str, count: usize) -> Result<()> {
    if I::fits(count) {
        Ok(())
    } else {
        Err(MeshError::IndexOverflow {
            element,
            count,
            max: I::MAX.to_usize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> TriangleMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriangleMesh::from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_from_triangles_rejects_bad_index() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let err = TriangleMesh::<u32>::from_triangles(&vertices, &[[0, 1, 5]]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidVertexIndex { face: 0, vertex: 5 }
        ));
    }

    #[test]
    fn test_from_triangles_rejects_too_many_vertices() {
        // 70000 vertices cannot be addressed with u16; the last faces would
        // otherwise wrap around onto low vertex ids.
        let vertices = vec![Point3::origin(); 70_000];
        let faces: Vec<[usize; 3]> = (0..23_333).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect();

        let err = TriangleMesh::<u16>::from_triangles(&vertices, &faces).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOverflow {
                element: "vertices",
                count: 70_000,
                max: 65_535,
            }
        ));

        let wide = TriangleMesh::<u32>::from_triangles(&vertices, &faces).unwrap();
        assert_eq!(wide.num_faces(), 23_333);
    }

    #[test]
    fn test_from_triangles_rejects_too_many_faces() {
        let vertices = vec![Point3::origin(); 3];
        let faces = vec![[0, 1, 2]; 65_537];

        let err = TriangleMesh::<u16>::from_triangles(&vertices, &faces).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOverflow { element: "faces", count: 65_537, .. }
        ));
        assert!(TriangleMesh::<u16>::from_triangles(&vertices, &faces[..65_536]).is_ok());
    }

    #[test]
    #[should_panic(expected = "vertex count exceeds")]
    fn test_add_vertex_past_index_limit_panics() {
        let mut mesh = TriangleMesh::<u16>::with_capacity(65_537, 0);
        for _ in 0..=65_536 {
            mesh.add_vertex(Point3::origin());
        }
    }

    #[test]
    fn test_empty_face_list_is_allowed() {
        let mesh = TriangleMesh::<u32>::from_triangles(&[Point3::origin()], &[]).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 1);
    }

    #[test]
    fn test_normal_and_area() {
        let mesh = unit_triangle();
        let f = FaceId::new(0);
        assert!((mesh.face_area(f) - 0.5).abs() < 1e-12);
        assert!((mesh.face_normal(f) - Vector3::z()).norm() < 1e-12);
        assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_face() {
        let mut mesh = unit_triangle();
        let v0 = VertexId::new(0);
        let v1 = VertexId::new(1);
        let f = mesh.add_face([v0, v1, v1]);
        assert!(mesh.is_degenerate_face(f));
        assert_eq!(mesh.face_normal(f), Vector3::zeros());
        assert!(!mesh.is_degenerate_face(FaceId::new(0)));
    }

    #[test]
    fn test_bounding_box() {
        let mesh = unit_triangle();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));

        assert!(TriangleMesh::<u32>::new().bounding_box().is_none());
    }
}
