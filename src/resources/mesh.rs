//! CPU-side mesh loading.
//!
//! Models are loaded with `tobj` (triangulated, single index buffer) and kept
//! as plain vertex/index data. Uploading them to the GPU is the render
//! layer's job; the engine core only needs the data and a vertex count for
//! draw telemetry.

use std::path::Path;

use anyhow::Context;

use crate::resources::cache::Asset;

/// One mesh of a model: flat position/normal/texcoord arrays plus indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Vertices this mesh submits when drawn (one per index).
    pub fn vertex_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// A model as loaded from an .obj file; one or more meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn vertex_count(&self) -> u32 {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }
}

impl Asset for Model {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .with_context(|| format!("failed to load model {}", path.display()))?;

        let meshes = models
            .into_iter()
            .map(|m| {
                let positions = (0..m.mesh.positions.len() / 3)
                    .map(|i| {
                        [
                            m.mesh.positions[i * 3],
                            m.mesh.positions[i * 3 + 1],
                            m.mesh.positions[i * 3 + 2],
                        ]
                    })
                    .collect::<Vec<_>>();
                let normals = (0..positions.len())
                    .map(|i| {
                        [
                            m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                            m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                            m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                        ]
                    })
                    .collect::<Vec<_>>();
                let tex_coords = (0..positions.len())
                    .map(|i| {
                        [
                            m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                            1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                        ]
                    })
                    .collect::<Vec<_>>();

                Mesh {
                    name: m.name,
                    positions,
                    normals,
                    tex_coords,
                    indices: m.mesh.indices,
                }
            })
            .collect::<Vec<_>>();

        Ok(Model { meshes })
    }
}
