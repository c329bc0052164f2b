//! Per-frame output handed to the renderer

use crate::foundation::math::Vec3;
use crate::scene::NodeId;

/// Fresh values for one node this frame
///
/// Fields left as `None` keep the node's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpdate {
    /// Target node
    pub node: NodeId,
    /// Local position
    pub position: Option<Vec3>,
    /// Local Euler XYZ rotation
    pub rotation: Option<Vec3>,
    /// Local scale
    pub scale: Option<Vec3>,
    /// Intensity of a light node
    pub light_intensity: Option<f32>,
    /// Emissive intensity of a mesh node's material
    pub emissive_intensity: Option<f32>,
}

impl NodeUpdate {
    /// Update that changes nothing yet
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            position: None,
            rotation: None,
            scale: None,
            light_intensity: None,
            emissive_intensity: None,
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Builder pattern: Set light intensity
    pub fn with_light_intensity(mut self, intensity: f32) -> Self {
        self.light_intensity = Some(intensity);
        self
    }

    /// Builder pattern: Set emissive intensity
    pub fn with_emissive_intensity(mut self, intensity: f32) -> Self {
        self.emissive_intensity = Some(intensity);
        self
    }

    /// Clamp scale components and intensities to zero from below
    ///
    /// NaN magnitudes also become zero.
    pub fn clamp_magnitudes(&mut self) {
        let clamp = |value: f32| if value > 0.0 { value } else { 0.0 };
        if let Some(scale) = self.scale.as_mut() {
            scale.apply(|c| *c = clamp(*c));
        }
        if let Some(intensity) = self.light_intensity.as_mut() {
            *intensity = clamp(*intensity);
        }
        if let Some(intensity) = self.emissive_intensity.as_mut() {
            *intensity = clamp(*intensity);
        }
    }

    /// Smallest scale component or intensity carried, if any
    pub fn min_magnitude(&self) -> Option<f32> {
        let scale = self.scale.map(|s| s.min());
        [scale, self.light_intensity, self.emissive_intensity]
            .into_iter()
            .flatten()
            .reduce(f32::min)
    }

    /// Whether the update carries no values
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.light_intensity.is_none()
            && self.emissive_intensity.is_none()
    }
}

/// All node updates for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUpdate {
    /// Zero-based frame index
    pub frame: u64,
    /// Elapsed scene time in seconds
    pub time: f32,
    /// Updates in binding registration order
    pub updates: Vec<NodeUpdate>,
}

impl FrameUpdate {
    /// Empty update for a frame
    pub fn new(frame: u64, time: f32) -> Self {
        Self {
            frame,
            time,
            updates: Vec::new(),
        }
    }

    /// Number of node updates
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether the frame updates nothing
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn node() -> NodeId {
        NodeId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_clamp_magnitudes() {
        let mut update = NodeUpdate::new(node())
            .with_scale(Vec3::new(1.0, -0.2, f32::NAN))
            .with_light_intensity(-3.0)
            .with_emissive_intensity(2.5);
        update.clamp_magnitudes();

        assert_eq!(update.scale, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(update.light_intensity, Some(0.0));
        assert_eq!(update.emissive_intensity, Some(2.5));
        assert_eq!(update.min_magnitude(), Some(0.0));
    }

    #[test]
    fn test_empty_update() {
        let update = NodeUpdate::new(node());
        assert!(update.is_empty());
        assert_eq!(update.min_magnitude(), None);
        assert!(!update.with_rotation(Vec3::y()).is_empty());
    }
}
