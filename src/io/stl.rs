//! Binary STL (stereolithography) support.
//!
//! Only the binary layout is read:
//!
//! ```text
//! UINT8[80]    - Header (ignored)
//! UINT32       - Number of triangles (little-endian)
//! foreach triangle
//!     REAL32[3] - Normal vector (ignored)
//!     REAL32[3] - Vertex 1
//!     REAL32[3] - Vertex 2
//!     REAL32[3] - Vertex 3
//!     UINT16    - Attribute byte count
//! end
//! ```
//!
//! The declared triangle count must match the file length exactly. Corners with
//! identical coordinates are welded so that faces share vertex indices.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use thiserror::Error;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, MeshWelder, TriangleMesh};

/// Size of the free-form header at the start of a binary STL.
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle record (normal + 3 vertices + attribute).
pub const RECORD_SIZE: usize = 50;

/// Header plus the triangle count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Ways a byte stream can fail to be a binary STL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not even room for the header and triangle count.
    #[error("file is {len} bytes, too short for a binary STL header")]
    TooShort {
        /// Length of the input in bytes.
        len: usize,
    },

    /// The declared triangle count disagrees with the file length.
    #[error("header declares {declared} triangles ({expected} bytes) but the file has {actual} bytes")]
    LengthMismatch {
        /// Triangle count stored in the file.
        declared: u32,
        /// Byte length implied by `declared`.
        expected: u64,
        /// Actual byte length.
        actual: u64,
    },

    /// The file looks like ASCII STL, which is not supported.
    #[error("file starts with `solid` and its length does not fit the binary layout; ASCII STL is not supported")]
    AsciiNotSupported,

    /// The triangle count cannot be addressed with the requested index type.
    #[error("{triangles} triangles exceed the capacity of the mesh index type")]
    TooLarge {
        /// Triangle count stored in the file.
        triangles: u32,
    },
}

/// Load a mesh from a binary STL file.
///
/// # Errors
///
/// - [`MeshError::Open`] if the file cannot be opened or read.
/// - [`MeshError::Parse`] if the content is not a valid binary STL.
///
/// A file with zero triangles loads successfully into an empty mesh.
///
/// # Example
///
/// ```no_run
/// use shellscan::io::stl;
/// use shellscan::mesh::TriangleMesh;
///
/// let mesh: TriangleMesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| MeshError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    from_bytes(&bytes).map_err(|reason| MeshError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse a binary STL held in memory.
pub fn from_bytes<I: MeshIndex>(bytes: &[u8]) -> std::result::Result<TriangleMesh<I>, ParseError> {
    if bytes.len() < PREAMBLE_SIZE {
        return Err(ParseError::TooShort { len: bytes.len() });
    }

    let declared = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);

    let expected = PREAMBLE_SIZE as u64 + u64::from(declared) * RECORD_SIZE as u64;
    let actual = bytes.len() as u64;
    if expected != actual {
        if looks_like_ascii(bytes) {
            return Err(ParseError::AsciiNotSupported);
        }
        return Err(ParseError::LengthMismatch {
            declared,
            expected,
            actual,
        });
    }

    let num_triangles = declared as usize;
    if !I::fits(num_triangles.saturating_mul(3)) {
        return Err(ParseError::TooLarge {
            triangles: declared,
        });
    }

    let mut welder = MeshWelder::with_capacity(num_triangles);
    for record in bytes[PREAMBLE_SIZE..].chunks_exact(RECORD_SIZE) {
        // Skip the normal (12 bytes), then three vertices of 12 bytes each.
        welder.push_triangle([
            read_point(&record[12..24]),
            read_point(&record[24..36]),
            read_point(&record[36..48]),
        ]);
    }

    Ok(welder.finish())
}

/// Read a point from 12 bytes (3 little-endian f32s).
fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn looks_like_ascii(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"solid")
}

/// Write a mesh as binary STL to any writer.
pub fn write<W: Write, I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    writer: &mut W,
) -> std::io::Result<()> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .face_ids()
        .map(|f| {
            let [p0, p1, p2] = mesh.face_positions(f);
            let n = mesh.face_normal(f);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter())
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use shellscan::io::stl;
/// use shellscan::mesh::TriangleMesh;
///
/// let mesh: TriangleMesh = TriangleMesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &TriangleMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let save_error = |e: std::io::Error| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::create(path).map_err(save_error)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer).map_err(save_error)?;
    writer.flush().map_err(save_error)?;

    Ok(())
}
