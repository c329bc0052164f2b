//! Rising/fading flame particles
//!
//! Each particle runs an endless rise-and-reset cycle: it climbs from the
//! ground to `max_height`, swaying less the higher it gets, and shrinks to
//! nothing at the top before wrapping back to the bottom. The phase offset
//! keeps particles from moving in lockstep.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Tunable constants for the rise/fade cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiseFadeParams {
    /// World height reached at the end of one cycle
    pub max_height: f32,
    /// Horizontal sway amplitude at the base of the flame
    pub sway_amplitude: f32,
    /// Angular frequency of the X sway
    pub sway_frequency_x: f32,
    /// Angular frequency of the Z sway
    pub sway_frequency_z: f32,
}

impl Default for RiseFadeParams {
    fn default() -> Self {
        Self {
            max_height: 3.0,
            sway_amplitude: 0.3,
            sway_frequency_x: 5.0,
            sway_frequency_z: 3.0,
        }
    }
}

/// One evaluated particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// Normalized height in `[0, 1)`
    pub height_fraction: f32,
    /// Local position relative to the emitter
    pub position: Vec3,
    /// Uniform scale in `[0, 1]`
    pub scale: f32,
}

/// Evaluate a flame particle at elapsed time `t`
///
/// `h = (speed * t + offset) mod 1`, `y = h * max_height`, the sway shrinks
/// linearly with `1 - h` and so does the scale.
pub fn rise_fade(t: f32, speed: f32, offset: f32, params: &RiseFadeParams) -> ParticleSample {
    let phase = speed * t + offset;
    let mut h = phase.rem_euclid(1.0);
    // rem_euclid may round up to exactly 1.0 for tiny negative phases
    if h >= 1.0 {
        h = 0.0;
    }

    let falloff = 1.0 - h;
    let x = params.sway_amplitude * (params.sway_frequency_x * phase).sin() * falloff;
    let z = params.sway_amplitude * (params.sway_frequency_z * phase).cos() * falloff;

    ParticleSample {
        height_fraction: h,
        position: Vec3::new(x, h * params.max_height, z),
        scale: falloff.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ranges_hold_for_any_phase() {
        let params = RiseFadeParams::default();
        for speed in [0.5_f32, 1.5, 2.0, 7.0] {
            for step in 0..400 {
                let t = step as f32 * 0.037;
                for offset in [-12.5_f32, -1.0, -1e-9, 0.0, 0.3, 10.0, 1234.5] {
                    let sample = rise_fade(t, speed, offset, &params);
                    assert!((0.0..1.0).contains(&sample.height_fraction));
                    assert!((0.0..=1.0).contains(&sample.scale));
                    assert!(sample.position.y >= 0.0 && sample.position.y < params.max_height);
                }
            }
        }
    }

    #[test]
    fn test_scale_vanishes_just_before_wrap() {
        let params = RiseFadeParams::default();
        let near_top = rise_fade(0.0, 1.0, 1.0 - 1e-6, &params);
        assert!(near_top.height_fraction > 0.99);
        assert!(near_top.scale < 1e-5);
        assert!(near_top.position.x.abs() < 1e-5);
        assert!(near_top.position.z.abs() < 1e-5);

        // One step later the cycle restarts at full size on the ground
        let wrapped = rise_fade(0.0, 1.0, 1.0, &params);
        assert_eq!(wrapped.height_fraction, 0.0);
        assert_eq!(wrapped.scale, 1.0);
        assert_eq!(wrapped.position.y, 0.0);
    }

    #[test]
    fn test_midpoint_matches_closed_form() {
        let params = RiseFadeParams::default();
        // speed 1.5 at t = 1 with offset 0 -> phase 1.5, h = 0.5
        let sample = rise_fade(1.0, 1.5, 0.0, &params);
        assert_relative_eq!(sample.height_fraction, 0.5);
        assert_relative_eq!(sample.position.y, 1.5);
        assert_relative_eq!(sample.position.x, 0.3 * (7.5_f32).sin() * 0.5, epsilon = 1e-6);
        assert_relative_eq!(sample.position.z, 0.3 * (4.5_f32).cos() * 0.5, epsilon = 1e-6);
        assert_relative_eq!(sample.scale, 0.5);
    }

    #[test]
    fn test_offsets_desynchronize_particles() {
        let params = RiseFadeParams::default();
        let a = rise_fade(0.4, 1.5, 0.0, &params);
        let b = rise_fade(0.4, 1.5, 0.35, &params);
        assert!((a.height_fraction - b.height_fraction).abs() > 0.1);
    }
}
