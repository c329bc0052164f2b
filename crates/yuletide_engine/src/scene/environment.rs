//! Scene-wide settings carried as data for the renderer
//!
//! Nothing here is animated. The backend receives a [`SceneEnvironment`]
//! together with the graph and is free to map each section onto its own
//! facilities (fog, image-based lighting, post-processing chain).

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::{
    color::Color,
    math::{constants::HALF_PI, constants::PI, Vec3},
};

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    /// Fog color, normally the background color
    pub color: Color,
    /// Distance where fog starts
    pub near: f32,
    /// Distance where fog is opaque
    pub far: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x020205),
            near: 10.0,
            far: 60.0,
        }
    }
}

/// Uniform fill light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientSettings {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x4c5c70),
            intensity: 0.15,
        }
    }
}

/// Shadow-casting moonlight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonSettings {
    /// Light position; rays travel from here toward the origin
    pub position: Vec3,
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Whether the moon casts shadows
    pub cast_shadows: bool,
    /// Shadow map resolution (square)
    pub shadow_map_size: u32,
}

impl Default for MoonSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(-10.0, 20.0, -10.0),
            color: Color::from_hex(0xaaccff),
            intensity: 0.8,
            cast_shadows: true,
            shadow_map_size: 2048,
        }
    }
}

/// Image-based lighting preset for reflections on metallic surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentMap {
    /// Named preset understood by the renderer
    pub preset: String,
    /// Background blur in `[0, 1]`
    pub blur: f32,
}

impl Default for EnvironmentMap {
    fn default() -> Self {
        Self {
            preset: "night".to_string(),
            blur: 0.6,
        }
    }
}

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Initial eye position
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 25.0),
            fov: 45.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

/// User camera orbit limits; input handling itself belongs to the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitControls {
    /// Allow panning the target
    pub enable_pan: bool,
    /// Smallest angle from straight up, radians
    pub min_polar_angle: f32,
    /// Largest angle from straight up, radians
    pub max_polar_angle: f32,
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance from the target
    pub max_distance: f32,
    /// Orbit center
    pub target: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_pan: false,
            min_polar_angle: PI / 4.0,
            max_polar_angle: HALF_PI - 0.05,
            min_distance: 10.0,
            max_distance: 40.0,
            target: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

/// Output surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Enable shadow maps
    pub shadows: bool,
    /// Lowest device pixel ratio
    pub dpr_min: f32,
    /// Highest device pixel ratio
    pub dpr_max: f32,
    /// Hardware multisampling
    pub antialias: bool,
    /// Stencil buffer
    pub stencil: bool,
    /// Depth buffer
    pub depth: bool,
    /// GPU selection hint
    pub power_preference: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            shadows: true,
            dpr_min: 1.0,
            dpr_max: 2.0,
            antialias: false,
            stencil: false,
            depth: true,
            power_preference: "high-performance".to_string(),
        }
    }
}

/// Bloom over bright, non-tone-mapped surfaces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Luminance above which pixels bloom
    pub luminance_threshold: f32,
    /// Bloom strength
    pub intensity: f32,
    /// Spread
    pub radius: f32,
    /// Use the mipmap blur chain
    pub mipmap_blur: bool,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            luminance_threshold: 0.8,
            intensity: 1.5,
            radius: 0.4,
            mipmap_blur: true,
        }
    }
}

/// Darkened frame edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteSettings {
    /// Distance from the center where darkening starts
    pub offset: f32,
    /// Strength of the darkening
    pub darkness: f32,
    /// Use the Eskil falloff variant
    pub eskil: bool,
}

impl Default for VignetteSettings {
    fn default() -> Self {
        Self {
            offset: 0.3,
            darkness: 0.6,
            eskil: false,
        }
    }
}

/// Adaptive luminance tone mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMappingSettings {
    /// Adapt exposure over time
    pub adaptive: bool,
    /// Luminance map resolution
    pub resolution: u32,
    /// Target middle grey
    pub middle_grey: f32,
    /// Brightest representable luminance
    pub max_luminance: f32,
    /// Starting average luminance
    pub average_luminance: f32,
    /// Exposure adaptation speed
    pub adaptation_rate: f32,
}

impl Default for ToneMappingSettings {
    fn default() -> Self {
        Self {
            adaptive: true,
            resolution: 256,
            middle_grey: 0.6,
            max_luminance: 16.0,
            average_luminance: 1.0,
            adaptation_rate: 1.0,
        }
    }
}

/// Post-processing chain, applied in field order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessing {
    /// First pass
    pub bloom: BloomSettings,
    /// Second pass
    pub vignette: VignetteSettings,
    /// Final pass
    pub tone_mapping: ToneMappingSettings,
}

/// Everything about the scene that is not a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneEnvironment {
    /// Clear color
    pub background: Color,
    /// Distance fog
    pub fog: FogSettings,
    /// Fill light
    pub ambient: AmbientSettings,
    /// Moonlight
    pub moon: MoonSettings,
    /// Reflection environment
    pub environment_map: EnvironmentMap,
    /// Initial camera
    pub camera: CameraSettings,
    /// Camera orbit limits
    pub controls: OrbitControls,
    /// Output surface
    pub canvas: CanvasSettings,
    /// Post-processing chain
    pub post_processing: PostProcessing,
}

impl Default for SceneEnvironment {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x020205),
            fog: FogSettings::default(),
            ambient: AmbientSettings::default(),
            moon: MoonSettings::default(),
            environment_map: EnvironmentMap::default(),
            camera: CameraSettings::default(),
            controls: OrbitControls::default(),
            canvas: CanvasSettings::default(),
            post_processing: PostProcessing::default(),
        }
    }
}

impl SceneEnvironment {
    /// Check ranges the renderer relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fog = &self.fog;
        if !(fog.near >= 0.0 && fog.near < fog.far) {
            return Err(ConfigError::invalid(
                "environment.fog",
                format!("need 0 <= near < far, got {}..{}", fog.near, fog.far),
            ));
        }

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::invalid(
                "environment.camera.fov",
                format!("must lie in (0, 180) degrees, got {}", camera.fov),
            ));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::invalid(
                "environment.camera",
                format!("need 0 < near < far, got {}..{}", camera.near, camera.far),
            ));
        }

        let controls = &self.controls;
        if !(0.0..=PI).contains(&controls.min_polar_angle)
            || !(0.0..=PI).contains(&controls.max_polar_angle)
            || controls.min_polar_angle > controls.max_polar_angle
        {
            return Err(ConfigError::invalid(
                "environment.controls",
                format!(
                    "polar range {}..{} must be ordered within [0, pi]",
                    controls.min_polar_angle, controls.max_polar_angle
                ),
            ));
        }
        if !(controls.min_distance > 0.0 && controls.min_distance <= controls.max_distance) {
            return Err(ConfigError::invalid(
                "environment.controls",
                format!(
                    "distance range {}..{} must be positive and ordered",
                    controls.min_distance, controls.max_distance
                ),
            ));
        }

        let canvas = &self.canvas;
        if !(canvas.dpr_min > 0.0 && canvas.dpr_min <= canvas.dpr_max) {
            return Err(ConfigError::invalid(
                "environment.canvas",
                format!("dpr range {}..{} must be positive and ordered", canvas.dpr_min, canvas.dpr_max),
            ));
        }

        if !(0.0..=1.0).contains(&self.environment_map.blur) {
            return Err(ConfigError::invalid(
                "environment.environment_map.blur",
                format!("must lie in [0, 1], got {}", self.environment_map.blur),
            ));
        }
        if self.moon.intensity < 0.0 || self.ambient.intensity < 0.0 {
            return Err(ConfigError::invalid(
                "environment",
                "light intensities must be non-negative".to_string(),
            ));
        }
        if self.post_processing.tone_mapping.resolution == 0 {
            return Err(ConfigError::invalid(
                "environment.post_processing.tone_mapping.resolution",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
