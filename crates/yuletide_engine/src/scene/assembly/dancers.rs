//! Ring of dancing cats orbiting the fire
//!
//! Every cat is a small hierarchy: a figure group that bounces, a body group
//! that squashes, a head group that bobs and a tail pivot that wags. The
//! mesh parts under them never move on their own.

use super::SceneBuilder;
use crate::config::DancerConfig;
use crate::foundation::math::Vec3;
use crate::layout::{place_ring, RingSlot};
use crate::materials::presets;
use crate::scene::{Animator, Geometry, NodeId, Pose, SceneError, ShadowFlags};

const TAIL_TILT: f32 = -0.5;

pub(super) struct DancerNodes {
    pub ring: NodeId,
    pub figures: Vec<NodeId>,
    pub slots: Vec<RingSlot>,
}

pub(super) fn build_dancers(
    builder: &mut SceneBuilder<'_>,
    center: NodeId,
    config: &DancerConfig,
) -> Result<DancerNodes, SceneError> {
    let slots = place_ring(&config.ring)?;

    let ring = builder.group(Some(center), "dancers", Pose::identity())?;
    builder.bind(
        ring,
        Animator::Orbit {
            speed: config.orbit_speed,
        },
    );

    let figures = slots
        .iter()
        .map(|slot| build_cat(builder, ring, slot, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DancerNodes {
        ring,
        figures,
        slots,
    })
}

fn build_cat(
    builder: &mut SceneBuilder<'_>,
    ring: NodeId,
    slot: &RingSlot,
    config: &DancerConfig,
) -> Result<NodeId, SceneError> {
    let prefix = format!("dancers/cat_{}", slot.index);
    let phase = slot.phase_offset;
    let motion = config.motion;

    let figure = builder.group(
        Some(ring),
        prefix.as_str(),
        Pose::from_position(slot.position).with_rotation_y(slot.rotation_y),
    )?;
    builder.bind(
        figure,
        Animator::Bounce {
            phase,
            base_position: slot.position,
            params: config.bounce,
        },
    );

    // Body
    let body = builder.group(Some(figure), format!("{prefix}/body"), Pose::identity())?;
    builder.bind(
        body,
        Animator::BodySquish {
            phase,
            base_scale: Vec3::repeat(1.0),
            motion,
        },
    );
    builder.mesh(
        Some(body),
        format!("{prefix}/body/back"),
        Pose::at(0.0, 0.6, 0.0),
        Geometry::Capsule {
            radius: 0.4,
            length: 0.5,
            cap_segments: 4,
            radial_segments: 8,
        },
        presets::BLACK_FUR,
        ShadowFlags::CAST,
    )?;
    builder.mesh(
        Some(body),
        format!("{prefix}/body/belly"),
        Pose::at(0.0, 0.5, 0.25).with_scale(0.8, 0.7, 0.5),
        Geometry::sphere(0.4, 16),
        presets::WHITE_FUR,
        ShadowFlags::RECEIVE,
    )?;

    // Head
    let head = builder.group(Some(figure), format!("{prefix}/head"), Pose::at(0.0, 1.3, 0.1))?;
    builder.bind(
        head,
        Animator::HeadBob {
            phase,
            base_rotation: Vec3::zeros(),
            motion,
        },
    );
    builder.mesh(
        Some(head),
        format!("{prefix}/head/skull"),
        Pose::identity(),
        Geometry::sphere(0.35, 32),
        presets::BLACK_FUR,
        ShadowFlags::CAST,
    )?;
    builder.mesh(
        Some(head),
        format!("{prefix}/head/face"),
        Pose::at(0.0, -0.1, 0.15).with_scale(0.85, 0.7, 0.5),
        Geometry::sphere(0.36, 32),
        presets::WHITE_FUR,
        ShadowFlags::empty(),
    )?;
    for (side, x) in [("left", -1.0_f32), ("right", 1.0)] {
        builder.mesh(
            Some(head),
            format!("{prefix}/head/{side}_ear"),
            Pose::at(0.2 * x, 0.3, 0.0).with_rotation(0.0, 0.0, -0.5 * x),
            Geometry::Cone {
                radius: 0.1,
                height: 0.2,
                radial_segments: 16,
            },
            presets::BLACK_FUR,
            ShadowFlags::empty(),
        )?;
        builder.mesh(
            Some(head),
            format!("{prefix}/head/{side}_eye"),
            Pose::at(0.12 * x, 0.05, 0.3),
            Geometry::sphere(0.03, 8),
            presets::EYE,
            ShadowFlags::empty(),
        )?;
    }
    builder.mesh(
        Some(head),
        format!("{prefix}/head/nose"),
        Pose::at(0.0, -0.05, 0.35),
        Geometry::sphere(0.02, 8),
        presets::PINK_SKIN,
        ShadowFlags::empty(),
    )?;

    // Tail
    let pivot = builder.group(Some(figure), format!("{prefix}/tail"), Pose::at(0.0, 0.4, -0.3))?;
    let tail_rest = Vec3::new(TAIL_TILT, 0.0, 0.0);
    let tail = builder.mesh(
        Some(pivot),
        format!("{prefix}/tail/mesh"),
        Pose::at(0.0, 0.3, -0.1).with_rotation(tail_rest.x, tail_rest.y, tail_rest.z),
        Geometry::Cylinder {
            radius_top: 0.04,
            radius_bottom: 0.02,
            height: 0.6,
            radial_segments: 8,
        },
        presets::BLACK_FUR,
        ShadowFlags::empty(),
    )?;
    builder.bind(
        tail,
        Animator::TailWag {
            phase,
            base_rotation: tail_rest,
            motion,
        },
    );

    Ok(figure)
}
