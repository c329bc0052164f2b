//! Procedural layout generation
//!
//! One-shot generators run at scene build time. Geometry (angles, radii,
//! heights) is fully determined by the parameters; appearance choices draw
//! from an injected random source so a seeded RNG reproduces a layout
//! exactly.

pub mod ring;
pub mod tree;

pub use ring::{place_ring, ring_angle, RingLayout, RingSlot};
pub use tree::{
    generate_tree_decorations, DecorationDescriptor, DecorationKind, OrnamentFinish, TreeLayout,
};

use thiserror::Error;

/// Layout parameter errors, raised before any element is placed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A count that must be at least one was zero
    #[error("{name} must be at least 1")]
    ZeroCount {
        /// Which parameter was rejected
        name: &'static str,
    },

    /// A length or spacing that must be positive was not
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive {
        /// Which parameter was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A value that must be finite was NaN or infinite
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Which parameter was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A probability outside `[0, 1]`
    #[error("{name} must lie in [0, 1], got {value}")]
    Probability {
        /// Which parameter was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// The inset factor must lie in `(0, 1]`
    #[error("inset must lie in (0, 1], got {0}")]
    Inset(f32),

    /// The radius schedule shrinks below zero before the last level
    #[error("level {level} would have negative radius {radius}")]
    NegativeRadius {
        /// First offending level
        level: u32,
        /// Radius computed for that level
        radius: f32,
    },

    /// No colors to draw lights from
    #[error("light palette is empty")]
    EmptyPalette,

    /// Twinkle speed range is empty or not strictly positive
    #[error("twinkle speed range [{min}, {max}) must be non-empty and positive")]
    SpeedRange {
        /// Lower bound (inclusive)
        min: f32,
        /// Upper bound (exclusive)
        max: f32,
    },
}

pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositive { name, value })
    }
}

pub(crate) fn require_finite(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { name, value })
    }
}

pub(crate) fn require_probability(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::Probability { name, value })
    }
}
