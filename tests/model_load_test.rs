use std::path::Path;

use asciiview::resources::{DecodedModel, LoadError, MeshData, ModelFormat, decode_model, load_model};

/// Assemble a binary STL in memory: 80-byte header, little-endian triangle
/// count, then 50 bytes per facet.
fn binary_stl(header: &[u8], triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    let header_len = header.len().min(80);
    bytes[..header_len].copy_from_slice(&header[..header_len]);
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for triangle in triangles {
        bytes.extend_from_slice(&[0u8; 12]);
        for vertex in triangle {
            for component in vertex {
                bytes.extend_from_slice(&component.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]);
    }
    bytes
}

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

#[test]
fn should_decode_binary_stl() {
    let bytes = binary_stl(b"exported part", &[TRIANGLE]);
    let model = decode_model("part.stl", &bytes).unwrap();

    assert_eq!(model.name, "part.stl");
    assert_eq!(model.triangle_count(), 1);
    let mesh = &model.meshes[0];
    assert_eq!(mesh.positions, TRIANGLE.to_vec());
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    // Stored facet normals are ignored; these come from the geometry.
    assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 3]);
}

#[test]
fn should_decode_ascii_stl() {
    let text = "solid wedge\n\
                  facet normal 0 0 1\n\
                    outer loop\n\
                      vertex 0 0 0\n\
                      vertex 2 0 0\n\
                      vertex 0 2 0\n\
                    endloop\n\
                  endfacet\n\
                endsolid wedge\n";
    let model = decode_model("wedge.stl", text.as_bytes()).unwrap();

    assert_eq!(model.triangle_count(), 1);
    assert_eq!(model.meshes[0].positions[1], [2.0, 0.0, 0.0]);
}

#[test]
fn should_decode_binary_stl_whose_header_starts_with_solid() {
    // Some exporters write "solid" into the binary header; the exact length
    // match must win over the ASCII heuristic.
    let bytes = binary_stl(b"solid binary-part", &[TRIANGLE]);
    let model = decode_model("tricky.stl", &bytes).unwrap();

    assert_eq!(model.triangle_count(), 1);
    assert_eq!(model.meshes[0].positions, TRIANGLE.to_vec());
}

#[test]
fn should_reject_truncated_binary_stl() {
    let mut bytes = binary_stl(b"", &[TRIANGLE, TRIANGLE]);
    bytes.truncate(bytes.len() - 10);
    let error = decode_model("broken.stl", &bytes).unwrap_err();

    assert!(matches!(error, LoadError::Stl(_)));
    assert!(error.to_string().contains("truncated"));
}

#[test]
fn should_reject_stl_files_shorter_than_the_header() {
    let error = decode_model("tiny.stl", b"hi").unwrap_err();
    assert!(matches!(error, LoadError::Stl(_)));
}

#[test]
fn should_reject_vertices_that_do_not_form_whole_facets() {
    let text = "solid bad\nvertex 0 0 0\nvertex 1 0 0\nendsolid bad\n";
    let error = decode_model("bad.stl", text.as_bytes()).unwrap_err();

    assert!(matches!(error, LoadError::Stl(_)));
}

#[test]
fn should_report_the_line_of_an_invalid_coordinate() {
    let text = "solid bad\nvertex 0 zero 0\nvertex 1 0 0\nvertex 0 1 0\nendsolid bad\n";
    let error = decode_model("bad.stl", text.as_bytes()).unwrap_err();

    assert!(error.to_string().contains("line 2"));
}

#[test]
fn should_reject_empty_solids() {
    let text = "solid hollow\nendsolid hollow\n";
    let error = decode_model("hollow.stl", text.as_bytes()).unwrap_err();

    assert!(matches!(error, LoadError::EmptyModel));
}

#[test]
fn should_decode_obj_and_keep_supplied_normals() {
    let text = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
    let model = decode_model("tri.obj", text.as_bytes()).unwrap();

    assert_eq!(model.triangle_count(), 1);
    let mesh = &model.meshes[0];
    assert_eq!(mesh.name, "tri");
    assert_eq!(mesh.normals.len(), mesh.positions.len());
    assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
}

#[test]
fn should_compute_normals_for_obj_without_vn_lines() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    let model = decode_model("flat.obj", text.as_bytes()).unwrap();

    assert_eq!(model.meshes[0].normals, vec![[0.0, 0.0, 1.0]; 3]);
}

#[test]
fn should_triangulate_quad_faces() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
    let model = decode_model("quad.obj", text.as_bytes()).unwrap();

    assert_eq!(model.triangle_count(), 2);
}

#[test]
fn should_reject_obj_without_faces() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
    let error = decode_model("points.obj", text.as_bytes()).unwrap_err();

    assert!(matches!(error, LoadError::EmptyModel));
}

#[test]
fn should_reject_unsupported_extensions() {
    let error = decode_model("model.ply", b"ply").unwrap_err();
    assert!(matches!(error, LoadError::UnsupportedFormat { extension } if extension == "ply"));
}

#[test]
fn should_reject_names_without_an_extension() {
    let error = decode_model("model", b"").unwrap_err();
    assert!(matches!(error, LoadError::UnsupportedFormat { extension } if extension.is_empty()));
}

#[test]
fn should_match_extensions_case_insensitively() {
    assert_eq!(ModelFormat::from_name("PART.STL").unwrap(), ModelFormat::Stl);
    assert_eq!(ModelFormat::from_name("Scene.Obj").unwrap(), ModelFormat::Obj);
}

#[test]
fn should_count_triangles_across_meshes() {
    let model = DecodedModel {
        name: "two.obj".to_string(),
        meshes: vec![
            MeshData {
                indices: vec![0, 1, 2, 0, 2, 3],
                ..Default::default()
            },
            MeshData {
                indices: vec![0, 1, 2],
                ..Default::default()
            },
        ],
    };

    assert_eq!(model.triangle_count(), 3);
}

#[test]
fn should_dispatch_on_the_extension_before_reading() {
    // The path does not exist; an unsupported extension must still win over
    // the I/O error.
    let error = load_model(Path::new("/nonexistent/model.gltf")).unwrap_err();
    assert!(matches!(error, LoadError::UnsupportedFormat { .. }));
}

#[test]
fn should_surface_missing_files_as_io_errors() {
    let error = load_model(Path::new("/nonexistent/model.stl")).unwrap_err();
    assert!(matches!(error, LoadError::Io(_)));
}
