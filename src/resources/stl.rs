//! STL decoding, binary and ASCII.
//!
//! Binary STL is an 80-byte header, a little-endian `u32` triangle count,
//! then 50 bytes per triangle (normal + three vertices as f32 triples + a
//! 2-byte attribute). ASCII STL is the `solid`/`facet`/`vertex` grammar.
//! Stored facet normals are ignored either way; vertex normals are
//! recomputed from geometry after decoding, which on the triangle soup
//! emitted here yields flat per-facet shading.

use crate::resources::{LoadError, MeshData};

const HEADER_LEN: usize = 80;
const COUNT_LEN: usize = 4;
const TRIANGLE_LEN: usize = 50;

/// Decode an STL file of either encoding into a single mesh.
///
/// Encoding detection follows the common loader heuristic: a file whose
/// length matches the declared binary triangle count exactly is binary even
/// if it happens to begin with the bytes `solid`; otherwise a leading
/// `solid` means ASCII; anything else is parsed as binary and fails with a
/// descriptive error if the payload does not add up.
pub fn decode_stl(name: &str, bytes: &[u8]) -> Result<MeshData, LoadError> {
    if matches_binary_length(bytes) {
        decode_binary(name, bytes)
    } else if bytes.starts_with(b"solid") {
        decode_ascii(name, bytes)
    } else {
        decode_binary(name, bytes)
    }
}

fn matches_binary_length(bytes: &[u8]) -> bool {
    declared_triangles(bytes)
        .and_then(|count| expected_binary_len(count))
        .is_some_and(|expected| expected == bytes.len())
}

fn declared_triangles(bytes: &[u8]) -> Option<usize> {
    let raw: [u8; 4] = bytes
        .get(HEADER_LEN..HEADER_LEN + COUNT_LEN)?
        .try_into()
        .ok()?;
    Some(u32::from_le_bytes(raw) as usize)
}

fn expected_binary_len(count: usize) -> Option<usize> {
    count
        .checked_mul(TRIANGLE_LEN)
        .and_then(|payload| payload.checked_add(HEADER_LEN + COUNT_LEN))
}

fn decode_binary(name: &str, bytes: &[u8]) -> Result<MeshData, LoadError> {
    let count = declared_triangles(bytes).ok_or_else(|| {
        LoadError::Stl(format!(
            "file is {} bytes, too short for the 84-byte binary header",
            bytes.len()
        ))
    })?;
    let expected = expected_binary_len(count)
        .ok_or_else(|| LoadError::Stl(format!("implausible triangle count {}", count)))?;
    if bytes.len() < expected {
        return Err(LoadError::Stl(format!(
            "truncated: {} triangles need {} bytes, got {}",
            count,
            expected,
            bytes.len()
        )));
    }

    let mut positions = Vec::with_capacity(count * 3);
    let mut offset = HEADER_LEN + COUNT_LEN;
    for _ in 0..count {
        // The stored facet normal occupies the first 12 bytes; skip it.
        let mut vertex_offset = offset + 12;
        for _ in 0..3 {
            positions.push([
                read_f32(bytes, vertex_offset),
                read_f32(bytes, vertex_offset + 4),
                read_f32(bytes, vertex_offset + 8),
            ]);
            vertex_offset += 12;
        }
        offset += TRIANGLE_LEN;
    }

    Ok(soup_mesh(name, positions))
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn decode_ascii(name: &str, bytes: &[u8]) -> Result<MeshData, LoadError> {
    let text = String::from_utf8_lossy(bytes);
    let mut positions: Vec<[f32; 3]> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut vertex = [0.0f32; 3];
        for component in &mut vertex {
            let token = tokens.next().ok_or_else(|| {
                LoadError::Stl(format!("line {}: vertex with missing coordinate", line_no + 1))
            })?;
            *component = token.parse().map_err(|_| {
                LoadError::Stl(format!("line {}: invalid coordinate {:?}", line_no + 1, token))
            })?;
        }
        positions.push(vertex);
    }

    if positions.len() % 3 != 0 {
        return Err(LoadError::Stl(format!(
            "{} vertices do not form whole facets",
            positions.len()
        )));
    }

    Ok(soup_mesh(name, positions))
}

/// Triangle-soup mesh: vertices stay duplicated per facet, indices run
/// sequentially. Normal recomputation happens later in the load pipeline.
fn soup_mesh(name: &str, positions: Vec<[f32; 3]>) -> MeshData {
    let indices = (0..positions.len() as u32).collect();
    MeshData {
        name: name.to_string(),
        positions,
        normals: Vec::new(),
        indices,
    }
}
