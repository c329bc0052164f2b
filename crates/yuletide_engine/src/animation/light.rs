//! Light animators: campfire flicker and ornament twinkle

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Flicker constants for a point light
///
/// Two incommensurate frequencies are summed so the pattern does not visibly
/// repeat over a short viewing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerParams {
    /// Mean intensity
    pub base_intensity: f32,
    /// Amplitude of the first sine term
    pub primary_amplitude: f32,
    /// Angular frequency of the first sine term
    pub primary_frequency: f32,
    /// Amplitude of the second sine term
    pub secondary_amplitude: f32,
    /// Angular frequency of the second sine term
    pub secondary_frequency: f32,
    /// Rest height of the light above its parent
    pub base_height: f32,
    /// Vertical jitter amplitude
    pub jitter_amplitude: f32,
    /// Vertical jitter angular frequency
    pub jitter_frequency: f32,
}

impl Default for FlickerParams {
    fn default() -> Self {
        Self {
            base_intensity: 15.0,
            primary_amplitude: 5.0,
            primary_frequency: 10.0,
            secondary_amplitude: 5.0,
            secondary_frequency: 23.0,
            base_height: 1.0,
            jitter_amplitude: 0.1,
            jitter_frequency: 15.0,
        }
    }
}

impl FlickerParams {
    /// Lowest intensity the unclamped sum can reach
    pub fn floor(&self) -> f32 {
        self.base_intensity - self.primary_amplitude.abs() - self.secondary_amplitude.abs()
    }
}

/// Light values recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    /// Non-negative intensity
    pub intensity: f32,
    /// Local position of the light
    pub position: Vec3,
}

/// Flicker intensity at elapsed time `t`, never below zero
pub fn flicker_intensity(t: f32, params: &FlickerParams) -> f32 {
    let raw = params.base_intensity
        + params.primary_amplitude * (t * params.primary_frequency).sin()
        + params.secondary_amplitude * (t * params.secondary_frequency).sin();
    raw.max(0.0)
}

/// Full flicker state: intensity plus vertical jitter of the light position
pub fn flicker(t: f32, params: &FlickerParams) -> LightState {
    let height = params.base_height + params.jitter_amplitude * (t * params.jitter_frequency).sin();
    LightState {
        intensity: flicker_intensity(t, params),
        position: Vec3::new(0.0, height, 0.0),
    }
}

/// Twinkle constants for emissive ornament lights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinkleParams {
    /// Constant term of the intensity sum
    pub baseline: f32,
    /// Frequency multiple of the cosine harmonic
    pub harmonic_ratio: f32,
    /// Amplitude of the cosine harmonic
    pub harmonic_amplitude: f32,
}

impl Default for TwinkleParams {
    fn default() -> Self {
        Self {
            baseline: 1.5,
            harmonic_ratio: 2.5,
            harmonic_amplitude: 0.5,
        }
    }
}

/// Emissive intensity of a twinkling light, clamped at zero
pub fn twinkle(t: f32, speed: f32, params: &TwinkleParams) -> f32 {
    let raw = params.baseline
        + (t * speed).sin()
        + params.harmonic_amplitude * (t * speed * params.harmonic_ratio).cos();
    raw.max(0.0)
}
