//! GPU-ready packing of per-frame data
//!
//! Layouts are `#[repr(C)]` with 16-byte rows so a backend can upload the
//! byte slices straight into instance and uniform buffers.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Transform;
use crate::scene::{LightComponent, LightType};

/// Per-instance data for an instanced batch
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World matrix, column-major
    pub model: [[f32; 4]; 4],
}

impl InstanceData {
    /// Pack a world transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().into(),
        }
    }
}

/// Light entry for a lighting uniform array
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightData {
    /// World position in xyz, intensity in w
    pub position_intensity: [f32; 4],
    /// Linear color in rgb, cutoff distance in w
    pub color_distance: [f32; 4],
    /// Decay, cone angle, penumbra, light type
    pub params: [f32; 4],
}

impl LightData {
    /// Pack a light at a world position with its current intensity
    pub fn new(light: &LightComponent, world_position: [f32; 3], intensity: f32) -> Self {
        let kind = match light.light_type {
            LightType::Ambient => 0.0,
            LightType::Directional => 1.0,
            LightType::Point => 2.0,
            LightType::Spot => 3.0,
        };
        let [x, y, z] = world_position;
        Self {
            position_intensity: [x, y, z, intensity],
            color_distance: [light.color.r, light.color.g, light.color.b, light.distance],
            params: [light.decay, light.angle, light.penumbra, kind],
        }
    }
}

/// Byte view of packed records
pub fn as_bytes<T: Pod>(records: &[T]) -> &[u8] {
    bytemuck::cast_slice(records)
}
