use bytemuck::{Pod, Zeroable};

/// Interleaved mesh vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Deduplication key comparing all components bitwise, so that e.g.
    /// `0.0` and `-0.0` are distinct and NaNs never collapse spuriously.
    pub(crate) fn key(&self) -> VertexKey {
        VertexKey {
            position: self.position.map(f32::to_bits),
            normal: self.normal.map(f32::to_bits),
            texcoord: self.texcoord.map(f32::to_bits),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VertexKey {
    position: [u32; 3],
    normal: [u32; 3],
    texcoord: [u32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vertices_share_a_key() {
        let a = Vertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            texcoord: [0.5, 0.5],
        };
        let b = a;
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn signed_zero_is_a_distinct_key() {
        let a = Vertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 0.0],
            texcoord: [0.0, 0.0],
        };
        let mut b = a;
        b.position[0] = -0.0;
        assert_ne!(a.key(), b.key());
    }
}
