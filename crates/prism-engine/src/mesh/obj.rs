use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use log::warn;

use super::vertex::{Vertex, VertexKey};

/// Error produced by [`parse_obj`] when a source yields no usable geometry.
#[derive(Debug, Clone)]
pub struct ObjError {
    message: String,
}

impl ObjError {
    fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj parse error: {}", self.message)
    }
}

impl std::error::Error for ObjError {}

/// Normal-generation switches for OBJ loading.
///
/// `face_normals` replaces every corner's normal with the flat face normal,
/// even when the file carries `vn` data. `vertex_normals` computes smooth
/// area-weighted normals in a post-pass, but only when the file carries no
/// `vn` data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub face_normals: bool,
    pub vertex_normals: bool,
}

/// Deduplicated, triangulated geometry ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Reads and parses a Wavefront OBJ file.
pub fn load_obj(path: impl AsRef<Path>, options: LoadOptions) -> Result<MeshData> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    let data = parse_obj(&src, options)
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    Ok(data)
}

/// One corner reference of a face line, resolved to 0-based list indices.
#[derive(Clone, Copy)]
struct CornerRef {
    position: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Parses OBJ source text into deduplicated triangle geometry.
///
/// Leniency policy: malformed lines and out-of-range face references are
/// logged and skipped rather than failing the whole load. Only a source that
/// produces no triangles at all is an error.
pub fn parse_obj(src: &str, options: LoadOptions) -> Result<MeshData, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<Vec<CornerRef>> = Vec::new();

    for (line_no, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };
        match tag {
            "v" => match parse_floats::<3>(&mut tokens) {
                Some(p) => positions.push(p),
                None => warn!("obj line {}: malformed position, skipping", line_no + 1),
            },
            "vt" => match parse_floats::<2>(&mut tokens) {
                // OBJ texcoords are bottom-up; flip V for top-down sampling.
                Some([u, v]) => texcoords.push([u, 1.0 - v]),
                None => warn!("obj line {}: malformed texcoord, skipping", line_no + 1),
            },
            "vn" => match parse_floats::<3>(&mut tokens) {
                Some(n) => normals.push(n),
                None => warn!("obj line {}: malformed normal, skipping", line_no + 1),
            },
            "f" => {
                let mut corners = Vec::new();
                let mut ok = true;
                for token in tokens {
                    match parse_corner(token, positions.len(), texcoords.len(), normals.len()) {
                        Some(corner) => corners.push(corner),
                        None => {
                            warn!(
                                "obj line {}: bad face reference {:?}, skipping face",
                                line_no + 1,
                                token
                            );
                            ok = false;
                            break;
                        }
                    }
                }
                if ok && corners.len() >= 3 {
                    faces.push(corners);
                } else if ok {
                    warn!(
                        "obj line {}: face with {} corners, skipping",
                        line_no + 1,
                        corners.len()
                    );
                }
            }
            // Groups, objects, materials, smoothing groups.
            "g" | "o" | "s" | "usemtl" | "mtllib" => {}
            other => warn!("obj line {}: unknown directive {:?}, skipping", line_no + 1, other),
        }
    }

    let mut data = MeshData::default();
    let mut dedup: HashMap<VertexKey, u32> = HashMap::new();

    for corners in &faces {
        let face_normal = options.face_normals.then(|| {
            let a = Vec3::from(positions[corners[0].position]);
            let b = Vec3::from(positions[corners[1].position]);
            let c = Vec3::from(positions[corners[2].position]);
            (b - a).cross(c - a).normalize_or_zero().to_array()
        });

        // Fan triangulation: (0,1,2), (0,2,3), ...
        for i in 1..corners.len() - 1 {
            for corner in [corners[0], corners[i], corners[i + 1]] {
                let vertex = Vertex {
                    position: positions[corner.position],
                    normal: face_normal
                        .or_else(|| corner.normal.map(|n| normals[n]))
                        .unwrap_or([0.0; 3]),
                    texcoord: corner.texcoord.map(|t| texcoords[t]).unwrap_or([0.0; 2]),
                };
                let next = data.vertices.len() as u32;
                let index = *dedup.entry(vertex.key()).or_insert_with(|| {
                    data.vertices.push(vertex);
                    next
                });
                data.indices.push(index);
            }
        }
    }

    if data.indices.is_empty() {
        return Err(ObjError::new("source contains no faces"));
    }

    if options.vertex_normals && normals.is_empty() && !options.face_normals {
        compute_vertex_normals(&mut data);
    }

    Ok(data)
}

/// Smooth-normal post-pass: accumulate each triangle's unnormalized cross
/// product into its three vertices, then normalize once at the end. Larger
/// faces contribute proportionally more, giving area-weighted shading.
fn compute_vertex_normals(data: &mut MeshData) {
    let mut accum = vec![Vec3::ZERO; data.vertices.len()];
    for tri in data.indices.chunks_exact(3) {
        let a = Vec3::from(data.vertices[tri[0] as usize].position);
        let b = Vec3::from(data.vertices[tri[1] as usize].position);
        let c = Vec3::from(data.vertices[tri[2] as usize].position);
        let cross = (b - a).cross(c - a);
        for &i in tri {
            accum[i as usize] += cross;
        }
    }
    for (vertex, sum) in data.vertices.iter_mut().zip(&accum) {
        vertex.normal = sum.normalize_or_zero().to_array();
    }
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<[f32; N]> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

/// Parses one `f` entry of the form `p`, `p/t`, `p//n`, or `p/t/n`.
///
/// Indices are 1-based; negative indices count back from the end of the
/// respective list. Out-of-range references reject the corner.
fn parse_corner(token: &str, np: usize, nt: usize, nn: usize) -> Option<CornerRef> {
    let mut parts = token.split('/');
    let position = resolve_index(parts.next()?, np)?;
    let texcoord = match parts.next() {
        Some("") | None => None,
        Some(t) => Some(resolve_index(t, nt)?),
    };
    let normal = match parts.next() {
        Some("") | None => None,
        Some(n) => Some(resolve_index(n, nn)?),
    };
    if parts.next().is_some() {
        return None;
    }
    Some(CornerRef { position, texcoord, normal })
}

fn resolve_index(token: &str, len: usize) -> Option<usize> {
    let raw: i64 = token.parse().ok()?;
    let idx = if raw > 0 {
        raw as usize - 1
    } else if raw < 0 {
        len.checked_sub(raw.unsigned_abs() as usize)?
    } else {
        return None;
    };
    (idx < len).then_some(idx)
}

// ── tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_face_fans_into_two_triangles() {
        let data = parse_obj(QUAD, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn shared_corner_is_emitted_once() {
        // Two triangles sharing the corner at (1,0,0) with identical
        // attributes must reuse one vertex entry.
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 2 0 0
f 1 2 3
f 2 4 3
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        assert_eq!(data.indices[1], data.indices[3]);
    }

    #[test]
    fn texcoord_v_axis_is_flipped() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.2 0.8
f 1/1 2/1 3/1
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices[0].texcoord, [0.2, 0.2]);
    }

    #[test]
    fn vertex_normals_match_face_normal_for_single_triangle() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let opts = LoadOptions { vertex_normals: true, ..Default::default() };
        let data = parse_obj(src, opts).unwrap();
        // One face in the +Z plane; every accumulated normal is its unit
        // cross product.
        for vertex in &data.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn face_normals_override_file_normals() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//1
";
        let opts = LoadOptions { face_normals: true, ..Default::default() };
        let data = parse_obj(src, opts).unwrap();
        for vertex in &data.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn pentagon_fans_into_three_triangles() {
        let src = "\
v 0 0 0
v 1 0 0
v 2 1 0
v 1 2 0
v 0 1 0
f 1 2 3 4 5
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices.len(), 5);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let src = "\
v 0 0 0
v nonsense here
v 1 0 0
v 0 1 0
f 1 2 99
f 1 2 3
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        // The bad position line and the out-of-range face are dropped.
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.indices.len(), 3);
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(parse_obj("", LoadOptions::default()).is_err());
    }

    #[test]
    fn missing_attributes_fall_back_to_zero() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let data = parse_obj(src, LoadOptions::default()).unwrap();
        assert_eq!(data.vertices[0].normal, [0.0; 3]);
        assert_eq!(data.vertices[0].texcoord, [0.0; 2]);
    }
}
