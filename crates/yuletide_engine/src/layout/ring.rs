//! Ring placement for the dancing figures
//!
//! `count` slots sit evenly around a circle, each turned to face the center
//! and given a staggered phase so their animations do not line up.

use serde::{Deserialize, Serialize};

use super::{require_finite, require_positive, LayoutError};
use crate::foundation::math::{constants::PI, constants::TAU, Vec3};

/// Parameters of a ring of figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingLayout {
    /// Number of figures
    pub count: u32,
    /// Distance of every figure from the ring center
    pub radius: f32,
    /// Phase offset added per figure index
    pub stagger: f32,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            count: 4,
            radius: 5.0,
            stagger: 1.5,
        }
    }
}

impl RingLayout {
    /// Check the ring can be placed
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.count == 0 {
            return Err(LayoutError::ZeroCount { name: "ring count" });
        }
        require_positive("ring radius", self.radius)?;
        require_finite("ring stagger", self.stagger)
    }
}

/// One placed figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSlot {
    /// Position in the ring, `0..count`
    pub index: u32,
    /// Angle around the ring, `2*pi*index/count`
    pub angle: f32,
    /// Position relative to the ring center, on the ground plane
    pub position: Vec3,
    /// Yaw that turns the figure toward the center
    pub rotation_y: f32,
    /// Phase offset for the figure's animation
    pub phase_offset: f32,
}

/// Angle of item `index` in an evenly spaced ring of `count` items
///
/// The full circle is covered exactly once: no gaps and no overlap.
pub fn ring_angle(index: u32, count: u32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    TAU * index as f32 / count as f32
}

/// Place `layout.count` figures around the ring
///
/// Positions use `x = sin(angle) * r`, `z = cos(angle) * r`.
pub fn place_ring(layout: &RingLayout) -> Result<Vec<RingSlot>, LayoutError> {
    layout.validate()?;

    let slots = (0..layout.count)
        .map(|index| {
            let angle = ring_angle(index, layout.count);
            RingSlot {
                index,
                angle,
                position: Vec3::new(angle.sin() * layout.radius, 0.0, angle.cos() * layout.radius),
                rotation_y: angle + PI,
                phase_offset: index as f32 * layout.stagger,
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Placed {} ring slots at radius {} (stagger {})",
        slots.len(),
        layout.radius,
        layout.stagger
    );
    Ok(slots)
}
