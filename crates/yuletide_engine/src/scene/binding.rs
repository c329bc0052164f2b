//! Links from animated nodes to the animator that drives them
//!
//! Each binding owns the immutable per-node state an animator needs (phase,
//! speed, base pose) and turns elapsed time into a [`NodeUpdate`]. Bindings
//! never read each other's output, so they can be evaluated in any order.

use super::NodeId;
use crate::animation::{
    bounce, flicker, orbit_rotation, twinkle, AnimatedInstance, BounceParams, FlickerParams,
    RiseFadeParams, SecondaryMotion, TwinkleParams,
};
use crate::backend::NodeUpdate;
use crate::foundation::math::Vec3;

/// Animator attached to a node, with its per-node state
#[derive(Debug, Clone, PartialEq)]
pub enum Animator {
    /// Rising flame particle; sets position and uniform scale
    Particle {
        /// Phase, speed and emitter-relative base position
        instance: AnimatedInstance,
        /// Rise/fade shape
        params: RiseFadeParams,
    },
    /// Flickering point light; sets position and light intensity
    Flicker(FlickerParams),
    /// Twinkling bulb; sets emissive intensity
    Twinkle {
        /// Angular speed
        speed: f32,
        /// Twinkle shape
        params: TwinkleParams,
    },
    /// Rectified-sine jump; sets position
    Bounce {
        /// Phase offset of this figure
        phase: f32,
        /// Rest position; only Y is animated
        base_position: Vec3,
        /// Jump shape
        params: BounceParams,
    },
    /// Whole-group spin about Y; sets rotation
    Orbit {
        /// Radians per second
        speed: f32,
    },
    /// Head nod and tilt added to the base rotation
    HeadBob {
        /// Phase offset of the figure
        phase: f32,
        /// Rest rotation
        base_rotation: Vec3,
        /// Channel shapes
        motion: SecondaryMotion,
    },
    /// Vertical squash and stretch multiplied into the base scale
    BodySquish {
        /// Phase offset of the figure
        phase: f32,
        /// Rest scale
        base_scale: Vec3,
        /// Channel shapes
        motion: SecondaryMotion,
    },
    /// Tail swing added to the base rotation about Z
    TailWag {
        /// Phase offset of the figure
        phase: f32,
        /// Rest rotation
        base_rotation: Vec3,
        /// Channel shapes
        motion: SecondaryMotion,
    },
}

impl Animator {
    /// Short label for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Particle { .. } => "particle",
            Self::Flicker(_) => "flicker",
            Self::Twinkle { .. } => "twinkle",
            Self::Bounce { .. } => "bounce",
            Self::Orbit { .. } => "orbit",
            Self::HeadBob { .. } => "head_bob",
            Self::BodySquish { .. } => "body_squish",
            Self::TailWag { .. } => "tail_wag",
        }
    }
}

/// A node and the animator that drives it
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBinding {
    /// Driven node
    pub node: NodeId,
    /// Driving animator
    pub animator: Animator,
}

impl AnimationBinding {
    /// Bind an animator to a node
    pub fn new(node: NodeId, animator: Animator) -> Self {
        Self { node, animator }
    }

    /// Values for the node at elapsed time `t`
    pub fn evaluate(&self, t: f32) -> NodeUpdate {
        let update = NodeUpdate::new(self.node);
        match &self.animator {
            Animator::Particle { instance, params } => {
                let sample = instance.particle(t, params);
                update
                    .with_position(sample.position)
                    .with_scale(Vec3::repeat(sample.scale))
            }
            Animator::Flicker(params) => {
                let state = flicker(t, params);
                update
                    .with_position(state.position)
                    .with_light_intensity(state.intensity)
            }
            Animator::Twinkle { speed, params } => {
                update.with_emissive_intensity(twinkle(t, *speed, params))
            }
            Animator::Bounce {
                phase,
                base_position,
                params,
            } => {
                let y = bounce(t, *phase, base_position.y, params);
                update.with_position(Vec3::new(base_position.x, y, base_position.z))
            }
            Animator::Orbit { speed } => {
                update.with_rotation(Vec3::new(0.0, orbit_rotation(t, *speed), 0.0))
            }
            Animator::HeadBob {
                phase,
                base_rotation,
                motion,
            } => update.with_rotation(base_rotation + motion.head_rotation(t + phase)),
            Animator::BodySquish {
                phase,
                base_scale,
                motion,
            } => update.with_scale(base_scale.component_mul(&motion.body_scale(t + phase))),
            Animator::TailWag {
                phase,
                base_rotation,
                motion,
            } => {
                let roll = motion.tail_roll(t + phase);
                update.with_rotation(base_rotation + Vec3::new(0.0, 0.0, roll))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::KeyData;

    fn node() -> NodeId {
        NodeId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_flicker_binding_at_zero() {
        let binding = AnimationBinding::new(node(), Animator::Flicker(FlickerParams::default()));
        let update = binding.evaluate(0.0);
        assert_eq!(update.light_intensity, Some(15.0));
        assert_eq!(update.position, Some(Vec3::new(0.0, 1.0, 0.0)));
        assert!(update.scale.is_none());
    }

    #[test]
    fn test_particle_binding_sets_uniform_scale() {
        let instance = AnimatedInstance::new(Vec3::zeros(), 0.25, 1.0).unwrap();
        let binding = AnimationBinding::new(
            node(),
            Animator::Particle {
                instance,
                params: RiseFadeParams::default(),
            },
        );
        let update = binding.evaluate(0.0);
        let scale = update.scale.unwrap();
        assert_relative_eq!(scale, Vec3::repeat(0.75));
        assert_relative_eq!(update.position.unwrap().y, 0.75);
    }

    #[test]
    fn test_bounce_keeps_ground_position() {
        let binding = AnimationBinding::new(
            node(),
            Animator::Bounce {
                phase: 1.5,
                base_position: Vec3::new(5.0, 0.0, -2.0),
                params: BounceParams::default(),
            },
        );
        for step in 0..50 {
            let position = binding.evaluate(step as f32 * 0.05).position.unwrap();
            assert_eq!(position.x, 5.0);
            assert_eq!(position.z, -2.0);
            assert!(position.y >= 0.0 && position.y <= 0.5);
        }
    }

    #[test]
    fn test_secondary_channels_layer_over_base_pose() {
        let motion = SecondaryMotion::default();
        let phase = 3.0;
        let t = 0.7;

        let tail = AnimationBinding::new(
            node(),
            Animator::TailWag {
                phase,
                base_rotation: Vec3::new(-0.5, 0.0, 0.0),
                motion,
            },
        )
        .evaluate(t);
        let rotation = tail.rotation.unwrap();
        assert_eq!(rotation.x, -0.5);
        assert_relative_eq!(rotation.z, 0.5 * (10.0 * (t + phase)).sin());

        let body = AnimationBinding::new(
            node(),
            Animator::BodySquish {
                phase,
                base_scale: Vec3::repeat(2.0),
                motion,
            },
        )
        .evaluate(t);
        let scale = body.scale.unwrap();
        assert_eq!(scale.x, 2.0);
        assert_relative_eq!(scale.y, 2.0 * (1.0 + 0.05 * (16.0 * (t + phase)).sin()));
    }

    #[test]
    fn test_orbit_and_twinkle() {
        let orbit = AnimationBinding::new(node(), Animator::Orbit { speed: 0.3 }).evaluate(10.0);
        assert_relative_eq!(orbit.rotation.unwrap().y, 3.0);

        let twinkle = AnimationBinding::new(
            node(),
            Animator::Twinkle {
                speed: 4.0,
                params: TwinkleParams::default(),
            },
        );
        for step in 0..200 {
            let value = twinkle.evaluate(step as f32 * 0.037).emissive_intensity.unwrap();
            assert!(value >= 0.0);
        }
    }
}
