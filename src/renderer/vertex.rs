//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::ObstacleKind;

    pub const SKY: [f32; 4] = [0.05, 0.06, 0.15, 1.0];
    pub const STAR: [f32; 4] = [0.9, 0.9, 1.0, 0.8];
    pub const GROUND: [f32; 4] = [0.28, 0.2, 0.12, 1.0];
    pub const GRASS: [f32; 4] = [0.25, 0.55, 0.2, 1.0];
    pub const HEDGEHOG: [f32; 4] = [0.55, 0.38, 0.22, 1.0];
    pub const HEDGEHOG_SPIKES: [f32; 4] = [0.3, 0.2, 0.12, 1.0];
    pub const HEDGEHOG_FACE: [f32; 4] = [0.9, 0.78, 0.6, 1.0];
    pub const STEM: [f32; 4] = [0.95, 0.92, 0.85, 1.0];

    /// Cap colour per mushroom kind
    pub fn mushroom_cap(kind: ObstacleKind) -> [f32; 4] {
        match kind {
            ObstacleKind::Red => [0.85, 0.15, 0.15, 1.0],
            ObstacleKind::Brown => [0.55, 0.35, 0.2, 1.0],
            ObstacleKind::Purple => [0.55, 0.2, 0.75, 1.0],
            ObstacleKind::Golden => [0.95, 0.8, 0.2, 1.0],
            ObstacleKind::Blue => [0.2, 0.45, 0.9, 1.0],
            ObstacleKind::Spotted => [0.9, 0.45, 0.35, 1.0],
            ObstacleKind::Shadow => [0.2, 0.2, 0.25, 1.0],
        }
    }
}
