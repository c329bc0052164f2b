//! Campfire: logs, two flame particle batches and the flickering light

use super::SceneBuilder;
use crate::animation::{flicker, AnimatedInstance};
use crate::config::{CampfireConfig, EmitterConfig};
use crate::foundation::math::{
    constants::{DEG_TO_RAD, PI},
    Vec3,
};
use crate::materials::presets;
use crate::scene::{Animator, Geometry, LightFactory, NodeContent, NodeId, Pose, SceneError, ShadowFlags};

/// Yaw of each log around the fire, degrees
const LOG_ANGLES: [f32; 3] = [0.0, 60.0, 120.0];

pub(super) struct CampfireNodes {
    pub root: NodeId,
    pub light: NodeId,
    pub core: NodeId,
    pub outer: NodeId,
}

pub(super) fn build_campfire(
    builder: &mut SceneBuilder<'_>,
    config: &CampfireConfig,
) -> Result<CampfireNodes, SceneError> {
    let root = builder.group(None, "fire", Pose::from_position(config.position))?;

    let logs = builder.group(Some(root), "fire/logs", Pose::at(0.0, 0.1, 0.0))?;
    for (index, degrees) in LOG_ANGLES.into_iter().enumerate() {
        builder.mesh(
            Some(logs),
            format!("fire/logs/log_{index}"),
            Pose::at(0.0, 0.2, 0.0).with_rotation(PI / 2.5, 0.0, degrees * DEG_TO_RAD),
            Geometry::Cylinder {
                radius_top: 0.15,
                radius_bottom: 0.15,
                height: 2.5,
                radial_segments: 8,
            },
            presets::LOG_WOOD,
            ShadowFlags::CAST,
        )?;
    }

    let flames = builder.group(
        Some(root),
        "fire/flames",
        Pose::at(0.0, config.emitter_height, 0.0),
    )?;
    let core = build_emitter(builder, flames, "fire/flames/core", presets::FLAME_CORE, &config.core, config)?;
    let outer = build_emitter(
        builder,
        flames,
        "fire/flames/outer",
        presets::FLAME_OUTER,
        &config.outer,
        config,
    )?;

    let rest = flicker(0.0, &config.flicker);
    let light = builder.light(
        Some(root),
        "fire/light",
        Pose::from_position(rest.position),
        LightFactory::point(config.light_color, rest.intensity, config.light_distance)
            .with_shadows()
            .with_shadow_bias(-0.001),
    )?;
    builder.bind(light, Animator::Flicker(config.flicker));

    Ok(CampfireNodes {
        root,
        light,
        core,
        outer,
    })
}

/// One instanced batch; each particle is an instance posed at its `t = 0` sample
fn build_emitter(
    builder: &mut SceneBuilder<'_>,
    parent: NodeId,
    name: &str,
    preset: &str,
    emitter: &EmitterConfig,
    config: &CampfireConfig,
) -> Result<NodeId, SceneError> {
    let batch = builder.instanced(
        parent,
        name,
        Pose::identity(),
        Geometry::Dodecahedron {
            radius: emitter.particle_radius,
        },
        preset,
        emitter.capacity,
    )?;

    for index in 0..emitter.count {
        let instance = AnimatedInstance::new(Vec3::zeros(), emitter.offset(index), emitter.speed)?;
        let sample = instance.particle(0.0, &config.particle);
        let pose = Pose {
            position: sample.position,
            scale: Vec3::repeat(sample.scale),
            ..Pose::identity()
        };
        let particle = builder.node(Some(batch), format!("{name}/{index}"), pose, NodeContent::Instance)?;
        builder.bind(
            particle,
            Animator::Particle {
                instance,
                params: config.particle,
            },
        );
    }

    log::debug!(
        "Emitter '{}' holds {} of {} particles at speed {}",
        name,
        emitter.count,
        emitter.capacity,
        emitter.speed
    );
    Ok(batch)
}
