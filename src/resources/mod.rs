//! Model loading: format dispatch and decoding into CPU-side mesh data.
//!
//! Decoding is pure (bytes in, [`DecodedModel`] out) so it can run on a
//! worker task and be tested without a GPU; the upload step in
//! [`mesh::upload_model`] turns the result into buffers.

use std::path::Path;

use thiserror::Error;

pub mod mesh;
pub mod obj;
pub mod stl;

/// Everything that can go wrong between picking a file and having decoded
/// mesh data. `UnsupportedFormat` fires before any bytes are inspected, so
/// rejected files leave no trace in the viewer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported model format {extension:?}, expected .stl or .obj")]
    UnsupportedFormat { extension: String },
    #[error("failed to read model file")]
    Io(#[from] std::io::Error),
    #[error("malformed STL data: {0}")]
    Stl(String),
    #[error("malformed OBJ data: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("model contains no triangles")]
    EmptyModel,
}

/// Recognized input formats, derived from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Stl,
    Obj,
}

impl ModelFormat {
    /// Determine the format from a file name, ASCII case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        let extension = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "stl" => Ok(ModelFormat::Stl),
            "obj" => Ok(ModelFormat::Obj),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

/// One decoded mesh: positions, normals (possibly pending recomputation)
/// and triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A fully decoded model, ready for normalization and upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedModel {
    pub name: String,
    pub meshes: Vec<MeshData>,
}

impl DecodedModel {
    /// All vertex positions across all meshes, in mesh order.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.meshes.iter().flat_map(|m| m.positions.iter().copied())
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }
}

/// Decode in-memory model bytes named `name` (the extension selects the
/// decoder). Shared by the file loader, drag-and-drop and embedders that
/// hand bytes across directly.
pub fn decode_model(name: &str, bytes: &[u8]) -> Result<DecodedModel, LoadError> {
    let format = ModelFormat::from_name(name)?;
    let mut meshes = match format {
        ModelFormat::Stl => vec![stl::decode_stl(name, bytes)?],
        ModelFormat::Obj => obj::decode_obj(name, bytes)?,
    };

    if meshes.iter().map(MeshData::triangle_count).sum::<usize>() == 0 {
        return Err(LoadError::EmptyModel);
    }
    for mesh in &mut meshes {
        mesh::ensure_normals(mesh);
    }

    Ok(DecodedModel {
        name: name.to_string(),
        meshes,
    })
}

/// Read and decode a model file from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_model(path: &Path) -> Result<DecodedModel, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    // Dispatch on the name before touching the filesystem so unsupported
    // selections fail the same way whether or not the file exists.
    ModelFormat::from_name(&name)?;
    let bytes = std::fs::read(path)?;
    decode_model(&name, &bytes)
}
