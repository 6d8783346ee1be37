//! OBJ decoding via tobj.
//!
//! Faces are triangulated and re-indexed to a single index stream on load.
//! Material libraries are deliberately not resolved; every model is drawn
//! with the viewer's flat placeholder material, so the `.mtl` loader hands
//! back an empty set instead of touching the filesystem.

use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
};

use crate::resources::{LoadError, MeshData};

pub fn decode_obj(name: &str, bytes: &[u8]) -> Result<Vec<MeshData>, LoadError> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok((Vec::new(), HashMap::new())),
    )?;

    let meshes = models
        .into_iter()
        .map(|m| {
            let mesh_name = if m.name.is_empty() {
                name.to_string()
            } else {
                m.name
            };
            let positions = (0..m.mesh.positions.len() / 3)
                .map(|i| {
                    [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ]
                })
                .collect();
            // `vn` data survives the re-index when present; an empty vector
            // marks the mesh for recomputation later in the load pipeline.
            let normals = (0..m.mesh.normals.len() / 3)
                .map(|i| {
                    [
                        m.mesh.normals[i * 3],
                        m.mesh.normals[i * 3 + 1],
                        m.mesh.normals[i * 3 + 2],
                    ]
                })
                .collect();
            MeshData {
                name: mesh_name,
                positions,
                normals,
                indices: m.mesh.indices,
            }
        })
        .collect();

    Ok(meshes)
}
