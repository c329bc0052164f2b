//! Light descriptors
//!
//! Pure data: a light's position comes from the scene node that carries it,
//! and any flicker is applied per frame by the animation bindings.

use crate::foundation::{color::Color, math::Vec3};

/// Types of lights supported by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Uniform fill light with no direction
    Ambient,
    /// Parallel rays (moonlight) aimed at a target
    Directional,
    /// Radiates in all directions from a position
    Point,
    /// Cone of light from a position toward a target
    Spot,
}

/// Light descriptor attached to a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// The type of light
    pub light_type: LightType,
    /// Light color
    pub color: Color,
    /// Intensity at rest; flickering lights start here
    pub intensity: f32,
    /// Cutoff distance for point/spot lights (0 = unlimited)
    pub distance: f32,
    /// Falloff exponent for point/spot lights
    pub decay: f32,
    /// Cone half-angle for spot lights in radians
    pub angle: f32,
    /// Soft edge fraction of the spot cone
    pub penumbra: f32,
    /// Point aimed at by directional and spot lights, in the node's parent space
    pub target: Vec3,
    /// Whether this light should cast shadows
    pub cast_shadows: bool,
    /// Depth bias applied when sampling the shadow map
    pub shadow_bias: f32,
    /// Shadow map resolution, when overriding the renderer default
    pub shadow_map_size: Option<[u32; 2]>,
}

impl LightComponent {
    fn base(light_type: LightType, color: Color, intensity: f32) -> Self {
        Self {
            light_type,
            color,
            intensity: intensity.max(0.0),
            distance: 0.0,
            decay: 2.0,
            angle: 0.0,
            penumbra: 0.0,
            target: Vec3::zeros(),
            cast_shadows: false,
            shadow_bias: 0.0,
            shadow_map_size: None,
        }
    }

    /// Enable shadow casting
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }

    /// Set the shadow depth bias
    pub fn with_shadow_bias(mut self, bias: f32) -> Self {
        self.shadow_bias = bias;
        self
    }

    /// Override the shadow map resolution
    pub fn with_shadow_map_size(mut self, width: u32, height: u32) -> Self {
        self.shadow_map_size = Some([width, height]);
        self
    }

    /// Aim a directional or spot light
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }
}

/// Factory functions for creating light components
pub struct LightFactory;

impl LightFactory {
    /// Uniform fill light
    pub fn ambient(color: Color, intensity: f32) -> LightComponent {
        LightComponent::base(LightType::Ambient, color, intensity)
    }

    /// Parallel light aimed at the origin of the parent space
    pub fn directional(color: Color, intensity: f32) -> LightComponent {
        LightComponent::base(LightType::Directional, color, intensity)
    }

    /// Omnidirectional light with a cutoff distance
    pub fn point(color: Color, intensity: f32, distance: f32) -> LightComponent {
        LightComponent {
            distance: distance.max(0.0),
            ..LightComponent::base(LightType::Point, color, intensity)
        }
    }

    /// Cone light
    pub fn spot(color: Color, intensity: f32, angle: f32, penumbra: f32) -> LightComponent {
        LightComponent {
            angle,
            penumbra: penumbra.clamp(0.0, 1.0),
            ..LightComponent::base(LightType::Spot, color, intensity)
        }
    }
}
