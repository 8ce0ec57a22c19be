//! # OBJ Import
//!
//! Reads triangulated OBJ text through `tobj`. Faces must reference full
//! `v/vt/vn` triplets; identical triplets are welded into a single output
//! vertex, numbered in order of first appearance.
//!
//! Tangents and bitangents are computed per triangle from UV deltas and
//! assigned to a vertex the first time a triangle emits it. Later triangles
//! sharing that vertex do not overwrite the value.

use std::io::BufReader;

use super::GeometryData;
use crate::error::ObjError;

/// Parse OBJ source text into welded geometry with tangents.
///
/// Multiple `o`/`g` groups are concatenated into one index space.
/// Material libraries are ignored.
pub fn parse_obj(source: &str) -> Result<GeometryData, ObjError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let mut reader = BufReader::new(source.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &options, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut data = GeometryData::new();
    for model in models {
        let mesh = model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }
        if mesh.texcoords.is_empty() {
            return Err(ObjError::MissingAttribute("texture coordinates"));
        }
        if mesh.normals.is_empty() {
            return Err(ObjError::MissingAttribute("normals"));
        }

        let base = data.vertices.len() as u32;
        data.vertices
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        data.tex_coords
            .extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));
        data.normals
            .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        data.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    if data.vertices.is_empty() || data.indices.is_empty() {
        return Err(ObjError::Empty);
    }

    assign_tangents(&mut data);
    Ok(data)
}

fn assign_tangents(data: &mut GeometryData) {
    let count = data.vertices.len();
    data.tangents = vec![[0.0; 3]; count];
    data.bitangents = vec![[0.0; 3]; count];
    let mut assigned = vec![false; count];

    for triangle in data.indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let (tangent, bitangent) = calculate_tangents(
            [data.vertices[a], data.vertices[b], data.vertices[c]],
            [data.tex_coords[a], data.tex_coords[b], data.tex_coords[c]],
        );

        for index in [a, b, c] {
            if !assigned[index] {
                assigned[index] = true;
                data.tangents[index] = tangent;
                data.bitangents[index] = bitangent;
            }
        }
    }
}

/// Tangent and bitangent of one triangle from its positions and UVs.
///
/// Triangles whose UVs have a zero determinant get zero vectors.
pub fn calculate_tangents(verts: [[f32; 3]; 3], uvs: [[f32; 2]; 3]) -> ([f32; 3], [f32; 3]) {
    let edge1 = sub3(verts[1], verts[0]);
    let edge2 = sub3(verts[2], verts[0]);
    let duv1 = [uvs[1][0] - uvs[0][0], uvs[1][1] - uvs[0][1]];
    let duv2 = [uvs[2][0] - uvs[0][0], uvs[2][1] - uvs[0][1]];

    let det = duv1[0] * duv2[1] - duv2[0] * duv1[1];
    if det == 0.0 || !det.is_finite() {
        return ([0.0; 3], [0.0; 3]);
    }
    let f = 1.0 / det;

    let tangent = [0, 1, 2].map(|k| f * (duv2[1] * edge1[k] - duv1[1] * edge2[k]));
    let bitangent = [0, 1, 2].map(|k| f * (-duv2[0] * edge1[k] + duv1[0] * edge2[k]));
    (tangent, bitangent)
}

fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad in the xy plane
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn test_shared_triplets_are_welded() {
        let data = parse_obj(QUAD).unwrap();
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(data.vertices[3], [0.0, 1.0, 0.0]);
        assert_eq!(data.tex_coords[2], [1.0, 1.0]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_obj(QUAD).unwrap();
        let second = parse_obj(QUAD).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_quad_tangents_follow_uv_axes() {
        let data = parse_obj(QUAD).unwrap();
        for i in 0..data.vertex_count() {
            assert_eq!(data.tangents[i], [1.0, 0.0, 0.0]);
            assert_eq!(data.bitangents[i], [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_degenerate_uvs_give_zero_tangents() {
        let (tangent, bitangent) = calculate_tangents(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]],
        );
        assert_eq!(tangent, [0.0; 3]);
        assert_eq!(bitangent, [0.0; 3]);
    }

    #[test]
    fn test_missing_normals_is_an_error() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
        assert!(matches!(
            parse_obj(source),
            Err(ObjError::MissingAttribute("normals"))
        ));
    }

    #[test]
    fn test_empty_source_is_an_error() {
        assert!(parse_obj("# nothing here\n").is_err());
    }
}
