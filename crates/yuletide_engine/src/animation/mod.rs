//! Per-frame animators
//!
//! Every animator is a pure function of elapsed time, a per-instance phase and
//! a small set of tunable constants. Nothing here holds state between frames;
//! callers recompute a fresh value every tick.
//!
//! - [`particle`]: rising, fading flame particles
//! - [`light`]: flickering point lights and twinkling emissive ornaments
//! - [`motion`]: rectified-sine bounce, secondary channels and group orbit

pub mod light;
pub mod motion;
pub mod particle;

pub use light::{flicker, flicker_intensity, twinkle, FlickerParams, LightState, TwinkleParams};
pub use motion::{
    bounce, orbit_rotation, BounceParams, Oscillator, SecondaryMotion, SecondaryPose, Waveform,
};
pub use particle::{rise_fade, ParticleSample, RiseFadeParams};

use crate::foundation::math::Vec3;
use thiserror::Error;

/// Animation configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Speed must be finite and strictly positive
    #[error("{name} must be a finite positive speed, got {value}")]
    InvalidSpeed {
        /// Which parameter was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Parameter must be a finite number
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Which parameter was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Reject zero, negative or non-finite speeds
pub fn validate_speed(name: &'static str, value: f32) -> Result<(), AnimationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidSpeed { name, value })
    }
}

/// Reject NaN and infinities
pub fn validate_finite(name: &'static str, value: f32) -> Result<(), AnimationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnimationError::NonFinite { name, value })
    }
}

/// Immutable per-instance animation state
///
/// Created once when the scene is built. Only the transform derived from it
/// changes over time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedInstance {
    base_position: Vec3,
    phase_offset: f32,
    speed: f32,
}

impl AnimatedInstance {
    /// Create an instance, failing fast on an unusable speed or phase
    pub fn new(base_position: Vec3, phase_offset: f32, speed: f32) -> Result<Self, AnimationError> {
        validate_speed("speed", speed)?;
        validate_finite("phase_offset", phase_offset)?;
        Ok(Self {
            base_position,
            phase_offset,
            speed,
        })
    }

    /// Rest position the animation is applied on top of
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// Phase shift added before evaluating the periodic function
    pub fn phase_offset(&self) -> f32 {
        self.phase_offset
    }

    /// Time scale of the animation
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sample this instance as a rising flame particle
    pub fn particle(&self, t: f32, params: &RiseFadeParams) -> ParticleSample {
        let mut sample = rise_fade(t, self.speed, self.phase_offset, params);
        sample.position += self.base_position;
        sample
    }
}
