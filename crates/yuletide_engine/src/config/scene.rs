//! Scene configuration
//!
//! Defaults describe the standard holiday scene. Every section is
//! `#[serde(default)]`, so a config file only needs the values it changes.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::animation::{
    validate_finite, validate_speed, BounceParams, FlickerParams, Oscillator, RiseFadeParams,
    SecondaryMotion, TwinkleParams,
};
use crate::foundation::{
    color::Color,
    math::{constants::PI, Vec3},
};
use crate::layout::{RingLayout, TreeLayout};
use crate::scene::SceneEnvironment;

/// Decorated tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Tree base in world space
    pub position: Vec3,
    /// Yaw of the whole tree
    pub rotation_y: f32,
    /// Emissive intensity bulbs start at before the first twinkle update
    pub bulb_intensity: f32,
    /// Intensity of the spotlight aimed at the tree
    pub spotlight_intensity: f32,
    /// Intensity of the halo light around the star
    pub star_glow_intensity: f32,
    /// Decoration placement
    pub layout: TreeLayout,
    /// Bulb twinkle shape
    pub twinkle: TwinkleParams,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-8.0, 0.0, 0.0),
            rotation_y: PI / 6.0,
            bulb_intensity: 2.0,
            spotlight_intensity: 20.0,
            star_glow_intensity: 5.0,
            layout: TreeLayout::default(),
            twinkle: TwinkleParams::default(),
        }
    }
}

/// One instanced batch of flame particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Live particles
    pub count: u32,
    /// Instances reserved in the batch
    pub capacity: u32,
    /// Cycles per second of every particle
    pub speed: f32,
    /// Phase offset of particle 0
    pub offset_start: f32,
    /// Phase offset added per particle index
    pub offset_step: f32,
    /// Circumradius of the particle mesh
    pub particle_radius: f32,
}

impl EmitterConfig {
    /// Phase offset of particle `index`
    pub fn offset(&self, index: u32) -> f32 {
        self.offset_start + index as f32 * self.offset_step
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        validate_speed(name, self.speed)?;
        validate_finite(name, self.offset_start)?;
        validate_finite(name, self.offset_step)?;
        if self.count > self.capacity {
            return Err(ConfigError::invalid(
                format!("campfire.{name}"),
                format!("count {} exceeds capacity {}", self.count, self.capacity),
            ));
        }
        if !(self.particle_radius.is_finite() && self.particle_radius > 0.0) {
            return Err(ConfigError::invalid(
                format!("campfire.{name}.particle_radius"),
                format!("must be positive, got {}", self.particle_radius),
            ));
        }
        Ok(())
    }
}

/// Campfire with flames and a flickering light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampfireConfig {
    /// Fire center in world space
    pub position: Vec3,
    /// Fire light color
    pub light_color: Color,
    /// Fire light cutoff distance
    pub light_distance: f32,
    /// Height of the particle emitters above the fire center
    pub emitter_height: f32,
    /// Fire light flicker
    pub flicker: FlickerParams,
    /// Particle rise/fade cycle, shared by both batches
    pub particle: RiseFadeParams,
    /// Hot inner flame
    pub core: EmitterConfig,
    /// Orange outer flame
    pub outer: EmitterConfig,
}

impl Default for CampfireConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(8.0, 0.0, 2.0),
            light_color: Color::from_hex(0xffaa00),
            light_distance: 15.0,
            emitter_height: 0.5,
            flicker: FlickerParams::default(),
            particle: RiseFadeParams::default(),
            core: EmitterConfig {
                count: 15,
                capacity: 20,
                speed: 1.5,
                offset_start: 0.0,
                offset_step: 1.0,
                particle_radius: 0.3,
            },
            outer: EmitterConfig {
                count: 15,
                capacity: 20,
                speed: 2.0,
                offset_start: 10.0,
                offset_step: 1.0,
                particle_radius: 0.2,
            },
        }
    }
}

/// Ring of dancing figures around the fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DancerConfig {
    /// Angular speed of the whole ring about the fire
    pub orbit_speed: f32,
    /// Figure placement
    pub ring: RingLayout,
    /// Jump height and rate
    pub bounce: BounceParams,
    /// Head, body and tail channels
    pub motion: SecondaryMotion,
}

impl Default for DancerConfig {
    fn default() -> Self {
        Self {
            orbit_speed: 0.3,
            ring: RingLayout::default(),
            bounce: BounceParams::default(),
            motion: SecondaryMotion::default(),
        }
    }
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Decorated tree
    pub tree: TreeConfig,
    /// Campfire
    pub campfire: CampfireConfig,
    /// Dancers
    pub dancers: DancerConfig,
    /// Camera, lighting rig and post-processing
    pub environment: SceneEnvironment,
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Check every section before the scene is assembled
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tree.layout.validate()?;
        for (name, value) in [
            ("tree.rotation_y", self.tree.rotation_y),
            ("tree.twinkle.baseline", self.tree.twinkle.baseline),
            ("tree.twinkle.harmonic_ratio", self.tree.twinkle.harmonic_ratio),
        ] {
            validate_finite(name, value)?;
        }
        require_amplitude("tree.twinkle.harmonic_amplitude", self.tree.twinkle.harmonic_amplitude)?;
        for (name, value) in [
            ("tree.bulb_intensity", self.tree.bulb_intensity),
            ("tree.spotlight_intensity", self.tree.spotlight_intensity),
            ("tree.star_glow_intensity", self.tree.star_glow_intensity),
            ("campfire.light_distance", self.campfire.light_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(name, format!("must be non-negative, got {value}")));
            }
        }

        let campfire = &self.campfire;
        campfire.core.validate("core")?;
        campfire.outer.validate("outer")?;
        validate_finite("campfire.emitter_height", campfire.emitter_height)?;
        let flicker = &campfire.flicker;
        for (name, value) in [
            ("campfire.flicker.base_intensity", flicker.base_intensity),
            ("campfire.flicker.primary_amplitude", flicker.primary_amplitude),
            ("campfire.flicker.primary_frequency", flicker.primary_frequency),
            ("campfire.flicker.secondary_amplitude", flicker.secondary_amplitude),
            ("campfire.flicker.secondary_frequency", flicker.secondary_frequency),
            ("campfire.flicker.base_height", flicker.base_height),
            ("campfire.flicker.jitter_amplitude", flicker.jitter_amplitude),
            ("campfire.flicker.jitter_frequency", flicker.jitter_frequency),
        ] {
            validate_finite(name, value)?;
        }
        if flicker.floor() < 0.0 {
            log::warn!(
                "Fire flicker can dip to {} and will be clamped at zero",
                flicker.floor()
            );
        }
        if !(campfire.particle.max_height.is_finite() && campfire.particle.max_height > 0.0) {
            return Err(ConfigError::invalid(
                "campfire.particle.max_height",
                format!("must be positive, got {}", campfire.particle.max_height),
            ));
        }
        require_amplitude("campfire.particle.sway_amplitude", campfire.particle.sway_amplitude)?;
        require_frequency("campfire.particle.sway_frequency_x", campfire.particle.sway_frequency_x)?;
        require_frequency("campfire.particle.sway_frequency_z", campfire.particle.sway_frequency_z)?;

        let dancers = &self.dancers;
        dancers.ring.validate()?;
        validate_speed("dancers.orbit_speed", dancers.orbit_speed)?;
        require_frequency("dancers.bounce.frequency", dancers.bounce.frequency)?;
        require_amplitude("dancers.bounce.amplitude", dancers.bounce.amplitude)?;
        let motion = &dancers.motion;
        for (name, channel) in [
            ("dancers.motion.head_pitch", &motion.head_pitch),
            ("dancers.motion.head_roll", &motion.head_roll),
            ("dancers.motion.body_squish", &motion.body_squish),
            ("dancers.motion.tail_wag", &motion.tail_wag),
        ] {
            require_oscillator(name, channel)?;
        }

        self.environment.validate()
    }
}

fn require_amplitude(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a finite non-negative amplitude, got {value}")))
    }
}

fn require_frequency(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a finite frequency, got {value}")))
    }
}

fn require_oscillator(field: &str, channel: &Oscillator) -> Result<(), ConfigError> {
    require_amplitude(&format!("{field}.amplitude"), channel.amplitude)?;
    require_frequency(&format!("{field}.frequency"), channel.frequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationError;
    use crate::layout::LayoutError;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");

        let mut config = SceneConfig::default();
        config.dancers.ring.count = 6;
        config.tree.layout.light_palette = vec![Color::from_hex(0xff0000)];
        config.save_to_file(&path).unwrap();

        let loaded = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");

        let mut config = SceneConfig::default();
        config.campfire.core.speed = 2.5;
        config.save_to_file(&path).unwrap();

        assert_eq!(SceneConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[dancers]\norbit_speed = 0.5\n\n[dancers.ring]\ncount = 8\n").unwrap();

        let loaded = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.dancers.orbit_speed, 0.5);
        assert_eq!(loaded.dancers.ring.count, 8);
        assert_eq!(loaded.dancers.ring.radius, 5.0);
        assert_eq!(loaded.tree, TreeConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        assert!(matches!(
            SceneConfig::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SceneConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_speeds() {
        let mut config = SceneConfig::default();
        config.campfire.outer.speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Animation(AnimationError::InvalidSpeed { .. }))
        ));

        let mut config = SceneConfig::default();
        config.dancers.orbit_speed = -0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_layout_and_capacity() {
        let mut config = SceneConfig::default();
        config.dancers.ring.count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Layout(LayoutError::ZeroCount { .. }))
        ));

        let mut config = SceneConfig::default();
        config.campfire.core.count = 21;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_non_finite_animation_parameters() {
        let mut config = SceneConfig::default();
        config.campfire.particle.sway_amplitude = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "campfire.particle.sway_amplitude"
        ));

        let mut config = SceneConfig::default();
        config.campfire.particle.sway_frequency_z = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = SceneConfig::default();
        config.dancers.motion.tail_wag.amplitude = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "dancers.motion.tail_wag.amplitude"
        ));

        let mut config = SceneConfig::default();
        config.dancers.motion.head_roll.frequency = f32::NEG_INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "dancers.motion.head_roll.frequency"
        ));
    }

    #[test]
    fn test_rejects_negative_amplitudes() {
        let mut config = SceneConfig::default();
        config.dancers.bounce.amplitude = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "dancers.bounce.amplitude"
        ));

        let mut config = SceneConfig::default();
        config.dancers.motion.body_squish.amplitude = -0.05;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = SceneConfig::default();
        config.tree.twinkle.harmonic_amplitude = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "tree.twinkle.harmonic_amplitude"
        ));

        let mut config = SceneConfig::default();
        config.campfire.particle.sway_amplitude = -0.3;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_emitter_offsets() {
        let config = CampfireConfig::default();
        assert_eq!(config.core.offset(3), 3.0);
        assert_eq!(config.outer.offset(0), 10.0);
        assert_eq!(config.outer.offset(4), 14.0);
    }
}
