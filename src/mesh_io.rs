//! Mesh file loading: binary/ASCII STL and Wavefront OBJ.
//!
//! Produces the interleaved vertex layout the GL renderer consumes. Formats
//! carrying no normals (OBJ without `vn`, zero-normal STL facets) get flat
//! per-face normals computed from the winding.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

use crate::viewport::mesh::{push_vert, MeshData};

/// Base color applied to every loaded surface.
pub const SURFACE_COLOR: [f32; 3] = [0.72, 0.74, 0.78];

const BINARY_STL_HEADER: usize = 80;
const BINARY_STL_TRIANGLE: usize = 50;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read mesh file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("malformed mesh file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("mesh file {0} contains no triangles")]
    Empty(PathBuf),
}

/// Load a mesh file, dispatching on the extension.
pub fn load_mesh(path: &Path) -> Result<MeshData, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let mesh = match ext.as_deref() {
        Some("stl") => parse_stl(&bytes, path)?,
        Some("obj") => parse_obj(&bytes, path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    if mesh.indices.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    Ok(mesh)
}

// ── STL ──────────────────────────────────────────────────────

fn parse_stl(bytes: &[u8], path: &Path) -> Result<MeshData, LoadError> {
    // ASCII files start with "solid" and contain facet records; binary
    // files may also start with "solid" in the comment header, so require
    // both before taking the text path.
    let looks_ascii = bytes.starts_with(b"solid")
        && bytes
            .windows(b"facet".len())
            .any(|w| w == b"facet");

    if looks_ascii {
        parse_ascii_stl(bytes, path)
    } else {
        parse_binary_stl(bytes, path)
    }
}

fn parse_binary_stl(bytes: &[u8], path: &Path) -> Result<MeshData, LoadError> {
    if bytes.len() < BINARY_STL_HEADER + 4 {
        return Err(malformed(path, "truncated binary STL header"));
    }

    let count_bytes: [u8; 4] = bytes[BINARY_STL_HEADER..BINARY_STL_HEADER + 4]
        .try_into()
        .expect("slice length checked above");
    let triangle_count = u32::from_le_bytes(count_bytes) as usize;

    let expected = BINARY_STL_HEADER + 4 + triangle_count * BINARY_STL_TRIANGLE;
    if bytes.len() < expected {
        return Err(malformed(
            path,
            &format!(
                "binary STL claims {triangle_count} triangles but holds {} bytes",
                bytes.len()
            ),
        ));
    }

    let mut mesh = MeshData::default();
    for t in 0..triangle_count {
        let base = BINARY_STL_HEADER + 4 + t * BINARY_STL_TRIANGLE;
        let mut floats = [0.0_f32; 12];
        for (i, f) in floats.iter_mut().enumerate() {
            let off = base + i * 4;
            let raw: [u8; 4] = bytes[off..off + 4]
                .try_into()
                .expect("triangle record length checked above");
            *f = f32::from_le_bytes(raw);
        }

        let normal = Vec3::new(floats[0], floats[1], floats[2]);
        let a = Vec3::new(floats[3], floats[4], floats[5]);
        let b = Vec3::new(floats[6], floats[7], floats[8]);
        let c = Vec3::new(floats[9], floats[10], floats[11]);
        push_triangle(&mut mesh, a, b, c, normal);
    }

    Ok(mesh)
}

fn parse_ascii_stl(bytes: &[u8], path: &Path) -> Result<MeshData, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| malformed(path, "ASCII STL is not valid UTF-8"))?;

    let mut mesh = MeshData::default();
    let mut normal = Vec3::ZERO;
    let mut corners: Vec<Vec3> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("facet") => {
                // "facet normal nx ny nz"
                let _ = words.next();
                normal = parse_vec3(&mut words)
                    .ok_or_else(|| malformed(path, &format!("bad facet normal on line {}", line_no + 1)))?;
                corners.clear();
            }
            Some("vertex") => {
                let v = parse_vec3(&mut words)
                    .ok_or_else(|| malformed(path, &format!("bad vertex on line {}", line_no + 1)))?;
                corners.push(v);
            }
            Some("endfacet") => {
                if corners.len() != 3 {
                    return Err(malformed(
                        path,
                        &format!("facet ending on line {} has {} vertices", line_no + 1, corners.len()),
                    ));
                }
                push_triangle(&mut mesh, corners[0], corners[1], corners[2], normal);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_vec3<'a, I: Iterator<Item = &'a str>>(words: &mut I) -> Option<Vec3> {
    let x = words.next()?.parse().ok()?;
    let y = words.next()?.parse().ok()?;
    let z = words.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

// ── OBJ ──────────────────────────────────────────────────────

fn parse_obj(bytes: &[u8], path: &Path) -> Result<MeshData, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| malformed(path, "OBJ file is not valid UTF-8"))?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut mesh = MeshData::default();

    for (line_no, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("v") => {
                let v = parse_vec3(&mut words)
                    .ok_or_else(|| malformed(path, &format!("bad vertex on line {}", line_no + 1)))?;
                positions.push(v);
            }
            Some("f") => {
                let mut face: Vec<Vec3> = Vec::new();
                for word in words {
                    let idx = resolve_obj_index(word, positions.len()).ok_or_else(|| {
                        malformed(path, &format!("bad face index '{word}' on line {}", line_no + 1))
                    })?;
                    face.push(positions[idx]);
                }
                if face.len() < 3 {
                    return Err(malformed(
                        path,
                        &format!("face on line {} has fewer than 3 vertices", line_no + 1),
                    ));
                }
                // Fan triangulation; flat normal per triangle.
                for i in 1..face.len() - 1 {
                    push_triangle(&mut mesh, face[0], face[i], face[i + 1], Vec3::ZERO);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// OBJ indices are 1-based, may carry `/vt/vn` suffixes, and may be
/// negative (relative to the end of the list so far).
fn resolve_obj_index(word: &str, len: usize) -> Option<usize> {
    let first = word.split('/').next()?;
    let idx: i64 = first.parse().ok()?;
    let resolved = if idx > 0 {
        idx - 1
    } else if idx < 0 {
        len as i64 + idx
    } else {
        return None;
    };
    if resolved < 0 || resolved as usize >= len {
        return None;
    }
    Some(resolved as usize)
}

// ── Shared ───────────────────────────────────────────────────

fn push_triangle(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3, normal: Vec3) {
    let n = if normal.length_squared() > 1e-12 {
        normal.normalize()
    } else {
        (b - a).cross(c - a).normalize_or_zero()
    };

    let base = (mesh.vertices.len() / 9) as u32;
    for p in [a, b, c] {
        push_vert(&mut mesh.vertices, p.x, p.y, p.z, n, SURFACE_COLOR);
    }
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

fn malformed(path: &Path, reason: &str) -> LoadError {
    LoadError::Malformed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_binary_stl() {
        let (_dir, path) = write_temp("tri.stl", &fixtures::tiny_binary_stl());
        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn loads_ascii_stl() {
        let (_dir, path) = write_temp("tri.stl", fixtures::tiny_ascii_stl().as_bytes());
        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        // Normal comes from the facet record
        assert_eq!(&mesh.vertices[3..6], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn loads_obj_and_triangulates_quads() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let (_dir, path) = write_temp("quad.obj", obj.as_bytes());
        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn obj_negative_and_slashed_indices() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3/1/1 -2/2/2 -1/3/3\n";
        let (_dir, path) = write_temp("rel.obj", obj.as_bytes());
        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn empty_stl_is_rejected() {
        // Valid binary STL with a zero triangle count
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let (_dir, path) = write_temp("empty.stl", &bytes);
        assert!(matches!(load_mesh(&path), Err(LoadError::Empty(_))));
    }

    #[test]
    fn truncated_binary_stl_is_malformed() {
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 10]);
        let (_dir, path) = write_temp("short.stl", &bytes);
        assert!(matches!(load_mesh(&path), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let (_dir, path) = write_temp("mesh.xyz", b"whatever");
        assert!(matches!(load_mesh(&path), Err(LoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mesh(&dir.path().join("gone.stl")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
