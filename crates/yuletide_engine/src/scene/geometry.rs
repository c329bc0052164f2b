//! Primitive geometry descriptors
//!
//! The renderer tessellates these; the scene only names the shape and its
//! dimensions.

/// A parametric primitive shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Flat rectangle in the local XY plane
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
    },
    /// Cone standing on its base, centered on its mid-height
    Cone {
        /// Base radius
        radius: f32,
        /// Height
        height: f32,
        /// Segments around the axis
        radial_segments: u32,
    },
    /// Cylinder or truncated cone along Y
    Cylinder {
        /// Radius at the top
        radius_top: f32,
        /// Radius at the bottom
        radius_bottom: f32,
        /// Height
        height: f32,
        /// Segments around the axis
        radial_segments: u32,
    },
    /// UV sphere
    Sphere {
        /// Radius
        radius: f32,
        /// Segments around the equator
        width_segments: u32,
        /// Segments pole to pole
        height_segments: u32,
    },
    /// Ring in the local XY plane
    Torus {
        /// Distance from the center to the tube center
        radius: f32,
        /// Tube radius
        tube: f32,
        /// Segments around the tube
        radial_segments: u32,
        /// Segments around the ring
        tubular_segments: u32,
    },
    /// Regular octahedron
    Octahedron {
        /// Circumradius
        radius: f32,
    },
    /// Regular dodecahedron
    Dodecahedron {
        /// Circumradius
        radius: f32,
    },
    /// Cylinder with hemispherical caps along Y
    Capsule {
        /// Cap and body radius
        radius: f32,
        /// Length of the straight section
        length: f32,
        /// Segments per cap
        cap_segments: u32,
        /// Segments around the axis
        radial_segments: u32,
    },
}

impl Geometry {
    /// Sphere with the same segment count in both directions
    pub const fn sphere(radius: f32, segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments: segments,
            height_segments: segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_shorthand_uses_segments_both_ways() {
        assert_eq!(
            Geometry::sphere(0.25, 16),
            Geometry::Sphere {
                radius: 0.25,
                width_segments: 16,
                height_segments: 16,
            }
        );
    }
}
