use cgmath::{InnerSpace, Vector3, Zero};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::model,
    resources::{DecodedModel, MeshData},
};

/**
 * STL files carry facet normals we choose to ignore and OBJ files may omit
 * `vn` lines entirely, so vertex normals have to be derivable from geometry
 * alone for lighting to work on every input.
 */
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::<f32>::zero(); positions.len()];

    // Accumulate unnormalized face cross products so larger faces weigh in
    // proportionally; degenerate faces contribute nothing.
    for triangle in indices.chunks_exact(3) {
        let p0: Vector3<f32> = positions[triangle[0] as usize].into();
        let p1: Vector3<f32> = positions[triangle[1] as usize].into();
        let p2: Vector3<f32> = positions[triangle[2] as usize].into();
        let face = (p1 - p0).cross(p2 - p0);
        for &index in triangle {
            normals[index as usize] += face;
        }
    }

    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                // Unreferenced or fully degenerate vertices get an arbitrary
                // but valid normal.
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

/// Recompute the mesh's normals from geometry unless it already carries one
/// normal per vertex.
pub fn ensure_normals(mesh: &mut MeshData) {
    if mesh.normals.len() != mesh.positions.len() {
        mesh.normals = compute_vertex_normals(&mesh.positions, &mesh.indices);
    }
}

/// Upload a decoded model into GPU buffers.
///
/// Every mesh becomes one vertex/index buffer pair; all of them share a
/// single flat-colour material.
pub fn upload_model(
    device: &wgpu::Device,
    decoded: &DecodedModel,
    color: [f32; 3],
    material_layout: &wgpu::BindGroupLayout,
) -> model::Model {
    let meshes = decoded
        .meshes
        .iter()
        .map(|m| upload_mesh(device, m))
        .collect();
    let material = model::Material::new(device, &decoded.name, color, material_layout);
    model::Model { meshes, material }
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> model::Mesh {
    let vertices = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(&position, &normal)| model::ModelVertex { position, normal })
        .collect::<Vec<_>>();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", mesh.name)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", mesh.name)),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: mesh.name.clone(),
        vertex_buffer,
        index_buffer,
        num_elements: mesh.indices.len() as u32,
    }
}
