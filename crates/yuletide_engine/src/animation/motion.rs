//! Figure motion: rectified-sine bounce, secondary channels and group orbit

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Bounce constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParams {
    /// Angular frequency of the underlying sine
    pub frequency: f32,
    /// Peak height above the base
    pub amplitude: f32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            frequency: 8.0,
            amplitude: 0.5,
        }
    }
}

/// Height of a bouncing figure: `base_y + |sin((t + phase) * f)| * amplitude`
///
/// The rectified sine returns to the base every half period and never dips
/// below it for a non-negative amplitude.
pub fn bounce(t: f32, phase: f32, base_y: f32, params: &BounceParams) -> f32 {
    base_y + ((t + phase) * params.frequency).sin().abs() * params.amplitude.abs()
}

/// Group rotation about Y for a ring that orbits its center
pub fn orbit_rotation(t: f32, speed: f32) -> f32 {
    t * speed
}

/// Periodic shape of an oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// `sin(u * f)`
    Sine,
    /// `cos(u * f)`
    Cosine,
}

/// Low-amplitude sinusoid driving a single channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    /// Peak deviation
    pub amplitude: f32,
    /// Angular frequency
    pub frequency: f32,
    /// Sine or cosine
    pub waveform: Waveform,
}

impl Oscillator {
    /// Sine oscillator
    pub const fn sine(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            waveform: Waveform::Sine,
        }
    }

    /// Cosine oscillator
    pub const fn cosine(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            waveform: Waveform::Cosine,
        }
    }

    /// Value at phase-shifted time `u`
    pub fn sample(&self, u: f32) -> f32 {
        let angle = u * self.frequency;
        let wave = match self.waveform {
            Waveform::Sine => angle.sin(),
            Waveform::Cosine => angle.cos(),
        };
        self.amplitude * wave
    }
}

/// Independent secondary channels layered over a figure's base pose
///
/// No channel reads another; each is its own oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryMotion {
    /// Head nod about X
    pub head_pitch: Oscillator,
    /// Head tilt about Z
    pub head_roll: Oscillator,
    /// Vertical body stretch, relative to 1
    pub body_squish: Oscillator,
    /// Tail swing about Z
    pub tail_wag: Oscillator,
}

impl Default for SecondaryMotion {
    fn default() -> Self {
        Self {
            head_pitch: Oscillator::sine(0.1, 8.0),
            head_roll: Oscillator::cosine(0.1, 4.0),
            body_squish: Oscillator::sine(0.05, 16.0),
            tail_wag: Oscillator::sine(0.5, 10.0),
        }
    }
}

/// Evaluated secondary channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryPose {
    /// Euler rotation added to the head's base rotation
    pub head_rotation: Vec3,
    /// Per-axis factor multiplied into the body's base scale
    pub body_scale: Vec3,
    /// Z rotation added to the tail's base rotation
    pub tail_roll: f32,
}

impl SecondaryMotion {
    /// Evaluate every channel at phase-shifted time `u = t + phase`
    pub fn evaluate(&self, u: f32) -> SecondaryPose {
        SecondaryPose {
            head_rotation: self.head_rotation(u),
            body_scale: self.body_scale(u),
            tail_roll: self.tail_roll(u),
        }
    }

    /// Head rotation offset at `u`
    pub fn head_rotation(&self, u: f32) -> Vec3 {
        Vec3::new(self.head_pitch.sample(u), 0.0, self.head_roll.sample(u))
    }

    /// Body scale factor at `u`; the stretched axis never goes negative
    pub fn body_scale(&self, u: f32) -> Vec3 {
        Vec3::new(1.0, (1.0 + self.body_squish.sample(u)).max(0.0), 1.0)
    }

    /// Tail roll offset at `u`
    pub fn tail_roll(&self, u: f32) -> f32 {
        self.tail_wag.sample(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounce_never_below_base() {
        let params = BounceParams::default();
        for step in 0..4000 {
            let t = step as f32 * 0.009;
            for phase in [0.0_f32, 1.5, 3.0, 4.5] {
                assert!(bounce(t, phase, 0.0, &params) >= 0.0);
                assert!(bounce(t, phase, 2.0, &params) >= 2.0);
            }
        }
    }

    #[test]
    fn test_bounce_returns_to_base_each_half_period() {
        let params = BounceParams::default();
        let half_period = PI / params.frequency;
        for k in 0..5 {
            let y = bounce(k as f32 * half_period, 0.0, 1.0, &params);
            assert_relative_eq!(y, 1.0, epsilon = 1e-5);
        }
        // Peak halfway between landings
        assert_relative_eq!(bounce(half_period / 2.0, 0.0, 1.0, &params), 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_secondary_channels_match_closed_form() {
        let motion = SecondaryMotion::default();
        let u = 0.73_f32;
        let pose = motion.evaluate(u);
        assert_relative_eq!(pose.head_rotation.x, 0.1 * (8.0 * u).sin());
        assert_relative_eq!(pose.head_rotation.y, 0.0);
        assert_relative_eq!(pose.head_rotation.z, 0.1 * (4.0 * u).cos());
        assert_relative_eq!(pose.body_scale.y, 1.0 + 0.05 * (16.0 * u).sin());
        assert_relative_eq!(pose.tail_roll, 0.5 * (10.0 * u).sin());
    }

    #[test]
    fn test_body_scale_clamped_for_extreme_squish() {
        let motion = SecondaryMotion {
            body_squish: Oscillator::sine(3.0, 1.0),
            ..SecondaryMotion::default()
        };
        for step in 0..1000 {
            assert!(motion.body_scale(step as f32 * 0.01).y >= 0.0);
        }
    }

    #[test]
    fn test_orbit_is_linear_in_time() {
        assert_eq!(orbit_rotation(0.0, 0.3), 0.0);
        assert_relative_eq!(orbit_rotation(10.0, 0.3), 3.0);
    }
}
