//! Thin adapter owning the currently displayed mesh.
//!
//! `load` swaps the scene geometry and bumps a version counter the GL
//! renderer keys its uploads on. The camera lives elsewhere and is never
//! touched here, so the view transform survives reloads.

use std::path::{Path, PathBuf};

use crate::mesh_io::{self, LoadError};
use crate::viewport::mesh::{self, Aabb, LineMeshData, MeshData};

/// Wireframe overlay color
const EDGE_COLOR: [f32; 4] = [0.1, 0.1, 0.12, 1.0];

pub struct Viewer {
    mesh: MeshData,
    wireframe: LineMeshData,
    bbox: Aabb,
    mesh_path: Option<PathBuf>,
    version: u64,
}

impl Viewer {
    /// Starts out showing the placeholder unit cube.
    pub fn new() -> Self {
        let mesh = mesh::unit_cube(mesh_io::SURFACE_COLOR);
        let wireframe = mesh::wireframe(&mesh, EDGE_COLOR);
        let bbox = mesh.aabb();
        Self {
            mesh,
            wireframe,
            bbox,
            mesh_path: None,
            version: 1,
        }
    }

    /// Replace the scene geometry with the contents of `mesh_path`. On
    /// error the previous scene stays visible and the caller's loop keeps
    /// running.
    pub fn load(&mut self, mesh_path: &Path) -> Result<(), LoadError> {
        let mesh = mesh_io::load_mesh(mesh_path)?;
        self.wireframe = mesh::wireframe(&mesh, EDGE_COLOR);
        self.bbox = mesh.aabb();
        self.mesh = mesh;
        self.mesh_path = Some(mesh_path.to_path_buf());
        self.version += 1;
        tracing::info!(
            "loaded {} ({} triangles)",
            mesh_path.display(),
            self.mesh.triangle_count()
        );
        Ok(())
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn wireframe(&self) -> &LineMeshData {
        &self.wireframe
    }

    pub fn aabb(&self) -> &Aabb {
        &self.bbox
    }

    pub fn mesh_path(&self) -> Option<&Path> {
        self.mesh_path.as_deref()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Monotonic counter bumped on every successful load; the GPU uploader
    /// skips work while it is unchanged.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}
