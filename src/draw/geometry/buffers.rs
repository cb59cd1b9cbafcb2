//! Serializable mesh buffers for the rendering backend
//!
//! Flat little-endian Float32/Uint32 arrays, base64-encoded for compact JSON
//! transfer. The host wraps the decoded bytes in typed arrays directly.

use base64::{engine::general_purpose, Engine as _};
use serde::{Serialize, Serializer};

use super::mesh::Mesh;

fn f32_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Serialize Vec<f32> as base64-encoded string
pub fn serialize_f32_vec_base64<S>(data: &Vec<f32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&general_purpose::STANDARD.encode(f32_bytes(data)))
}

/// Serialize Option<Vec<f32>> as base64-encoded string
pub fn serialize_f32_vec_as_base64<S>(
    data: &Option<Vec<f32>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match data {
        Some(vec) => serializer.serialize_some(&general_purpose::STANDARD.encode(f32_bytes(vec))),
        None => serializer.serialize_none(),
    }
}

/// Serialize Vec<u32> as base64-encoded string
pub fn serialize_u32_vec_base64<S>(data: &Vec<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
    serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
}

/// Inverse of `serialize_f32_vec_base64`
pub fn decode_f32_base64(encoded: &str) -> Option<Vec<f32>> {
    let bytes = general_purpose::STANDARD.decode(encoded).ok()?;
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

/// Vertex/index data of one mesh
#[derive(Serialize, Clone, Debug)]
pub struct MeshBuffers {
    /// x, y, z per vertex
    #[serde(rename = "positionData", serialize_with = "serialize_f32_vec_base64")]
    pub positions: Vec<f32>,

    #[serde(rename = "normalData", serialize_with = "serialize_f32_vec_base64")]
    pub normals: Vec<f32>,

    #[serde(rename = "uvData", serialize_with = "serialize_f32_vec_base64")]
    pub uvs: Vec<f32>,

    #[serde(rename = "indexData", serialize_with = "serialize_u32_vec_base64")]
    pub indices: Vec<u32>,

    /// Number of vertices (not floats)
    #[serde(rename = "vertexCount")]
    pub vertex_count: usize,

    #[serde(rename = "indexCount")]
    pub index_count: usize,
}

impl From<&Mesh> for MeshBuffers {
    fn from(mesh: &Mesh) -> Self {
        let positions = mesh.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        let normals = mesh.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect();
        let uvs = mesh.uvs.iter().flat_map(|uv| [uv.x, uv.y]).collect();
        MeshBuffers {
            positions,
            normals,
            uvs,
            indices: mesh.indices.clone(),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.indices.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_mesh_buffers_serialization() {
        let mut mesh = Mesh::new();
        mesh.push_vertex(Point3::new(1.0, 2.0, 3.0), Point2::new(0.0, 1.0));
        mesh.push_vertex(Point3::new(4.0, 5.0, 6.0), Point2::new(1.0, 1.0));
        mesh.push_vertex(Point3::new(7.0, 8.0, 10.0), Point2::new(1.0, 0.0));
        mesh.push_triangle(0, 1, 2);
        mesh.finalize();

        let buffers = MeshBuffers::from(&mesh);
        let json = serde_json::to_value(&buffers).unwrap();
        assert_eq!(json["vertexCount"], 3);
        assert_eq!(json["indexCount"], 3);

        let positions = decode_f32_base64(json["positionData"].as_str().unwrap()).unwrap();
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
    }
}
