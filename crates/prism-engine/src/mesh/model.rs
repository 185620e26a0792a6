use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use super::mesh::Mesh;
use super::obj::{load_obj, LoadOptions};

/// A model slot that may or may not hold loaded geometry.
///
/// Callers must check [`Model::mesh`] before drawing; a failed or absent
/// load leaves the slot empty rather than panicking at draw time.
#[derive(Default)]
pub struct Model {
    source: Option<PathBuf>,
    mesh: Option<Mesh>,
    triangle_count: usize,
}

impl Model {
    /// Loads geometry from an OBJ file, replacing any previously held mesh.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        path: impl AsRef<Path>,
        options: LoadOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        // Discard the old mesh up front so a failed load reads as "not
        // loaded" instead of keeping stale geometry around.
        self.mesh = None;
        self.triangle_count = 0;
        self.source = None;

        let data = load_obj(path, options)?;
        info!(
            "loaded model {} ({} vertices, {} triangles)",
            path.display(),
            data.vertices.len(),
            data.triangle_count()
        );
        self.triangle_count = data.triangle_count();
        self.mesh = Some(Mesh::upload(device, &path.display().to_string(), &data));
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}
