//! Materials and the shared preset registry
//!
//! Many meshes share a handful of looks (emerald foliage, gold trim, fur).
//! Presets are built once into a [`MaterialRegistry`] and handed out as
//! `Arc<Material>`, so every mesh references the same value instead of
//! carrying its own copy. The registry is read-only once built.

mod registry;

pub use registry::{MaterialError, MaterialRegistry, MaterialRegistryBuilder};

use crate::foundation::color::Color;

/// Material properties for physically based shading
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (albedo)
    pub base_color: Color,

    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,

    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,

    /// Opacity (0.0 = invisible, 1.0 = opaque)
    pub opacity: f32,

    /// Whether the material is alpha blended
    pub transparent: bool,

    /// Self-illumination color
    pub emissive: Color,

    /// Self-illumination strength; animated for twinkling bulbs
    pub emissive_intensity: f32,

    /// Whether output passes through tone mapping (off lets bloom pick it up)
    pub tone_mapped: bool,

    /// Skip lighting entirely
    pub unlit: bool,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            base_color: Color::WHITE,
            metallic: 0.0,
            roughness: 1.0,
            opacity: 1.0,
            transparent: false,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            tone_mapped: true,
            unlit: false,
        }
    }

    /// Set the base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    /// Set the metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Make the material alpha blended at the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Set the emissive color and strength
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity.max(0.0);
        self
    }

    /// Exclude the material from tone mapping
    pub fn without_tone_mapping(mut self) -> Self {
        self.tone_mapped = false;
        self
    }

    /// Render without lighting
    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the shared presets
pub mod presets {
    /// Tree foliage
    pub const EMERALD: &str = "emerald";
    /// Ornaments and garlands
    pub const GOLD: &str = "gold";
    /// Ornaments
    pub const SILVER: &str = "silver";
    /// Tree trunk
    pub const BARK: &str = "bark";
    /// Campfire logs
    pub const LOG_WOOD: &str = "log_wood";
    /// Ground plane
    pub const GROUND: &str = "ground";
    /// Inner flame particles
    pub const FLAME_CORE: &str = "flame_core";
    /// Outer flame particles
    pub const FLAME_OUTER: &str = "flame_outer";
    /// Tree-top star
    pub const STAR: &str = "star";
    /// Dark fur patches
    pub const BLACK_FUR: &str = "black_fur";
    /// Light fur patches
    pub const WHITE_FUR: &str = "white_fur";
    /// Noses
    pub const PINK_SKIN: &str = "pink_skin";
    /// Eyes
    pub const EYE: &str = "eye";
}

/// Material for a twinkling bulb: its own color, glowing, outside tone mapping
pub fn bulb_material(color: Color, intensity: f32) -> Material {
    Material::new()
        .with_color(color)
        .with_emissive(color, intensity)
        .without_tone_mapping()
}
