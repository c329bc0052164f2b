//! The decorated tree

use rand::Rng;

use super::SceneBuilder;
use crate::config::TreeConfig;
use crate::foundation::color::Color;
use crate::layout::{generate_tree_decorations, DecorationDescriptor, DecorationKind};
use crate::materials::{bulb_material, presets};
use crate::scene::{Animator, Geometry, LightFactory, NodeId, Pose, SceneError, ShadowFlags};

/// Foliage cones bottom to top: (center height, base radius, height)
const TIERS: [(f32, f32, f32); 4] = [(2.5, 4.0, 4.0), (4.5, 3.0, 3.5), (6.5, 2.0, 3.0), (8.2, 1.0, 2.5)];

const ORNAMENT: Geometry = Geometry::sphere(0.25, 16);
const BULB: Geometry = Geometry::sphere(0.12, 8);

pub(super) struct TreeNodes {
    pub root: NodeId,
    pub star: NodeId,
    pub bulbs: Vec<NodeId>,
    pub decorations: Vec<DecorationDescriptor>,
}

pub(super) fn build_tree<R: Rng + ?Sized>(
    builder: &mut SceneBuilder<'_>,
    config: &TreeConfig,
    rng: &mut R,
) -> Result<TreeNodes, SceneError> {
    let root = builder.group(
        None,
        "tree",
        Pose::from_position(config.position).with_rotation_y(config.rotation_y),
    )?;

    let solid = ShadowFlags::CAST | ShadowFlags::RECEIVE;
    builder.mesh(
        Some(root),
        "tree/trunk",
        Pose::at(0.0, 1.0, 0.0),
        Geometry::Cylinder {
            radius_top: 0.8,
            radius_bottom: 1.2,
            height: 3.0,
            radial_segments: 16,
        },
        presets::BARK,
        solid,
    )?;

    for (index, &(y, radius, height)) in TIERS.iter().enumerate() {
        builder.mesh(
            Some(root),
            format!("tree/tier_{index}"),
            Pose::at(0.0, y, 0.0),
            Geometry::Cone {
                radius,
                height,
                radial_segments: 32,
            },
            presets::EMERALD,
            solid,
        )?;
    }

    for (index, (y, radius, tilt)) in [(3.0, 3.2, 0.1), (5.0, 2.2, -0.1)].into_iter().enumerate() {
        builder.mesh(
            Some(root),
            format!("tree/garland_{index}"),
            Pose::at(0.0, y, 0.0).with_rotation(tilt, 0.0, tilt),
            Geometry::Torus {
                radius,
                tube: 0.1,
                radial_segments: 8,
                tubular_segments: 50,
            },
            presets::GOLD,
            ShadowFlags::empty(),
        )?;
    }

    let decorations = generate_tree_decorations(&config.layout, rng)?;
    let mut bulbs = Vec::new();
    for decoration in &decorations {
        let pose = Pose::from_position(decoration.position);
        let (level, slot) = (decoration.level, decoration.slot);

        if let Some(preset) = decoration.material_key() {
            builder.mesh(
                Some(root),
                format!("tree/ornament_{level}_{slot}"),
                pose,
                ORNAMENT,
                preset,
                ShadowFlags::CAST,
            )?;
        } else if let DecorationKind::Light {
            color,
            twinkle_speed,
        } = decoration.kind
        {
            let bulb = builder.unique_mesh(
                root,
                format!("tree/light_{level}_{slot}"),
                pose,
                BULB,
                bulb_material(color, config.bulb_intensity),
            )?;
            builder.bind(
                bulb,
                Animator::Twinkle {
                    speed: twinkle_speed,
                    params: config.twinkle,
                },
            );
            bulbs.push(bulb);
        }
    }

    let gold = Color::from_hex(0xffd700);
    let star = builder.group(Some(root), "tree/star", Pose::at(0.0, 9.8, 0.0))?;
    builder.mesh(
        Some(star),
        "tree/star/body",
        Pose::identity(),
        Geometry::Octahedron { radius: 0.8 },
        presets::STAR,
        ShadowFlags::CAST,
    )?;
    builder.light(
        Some(star),
        "tree/star/halo",
        Pose::identity(),
        LightFactory::point(gold, config.star_glow_intensity, 5.0),
    )?;

    builder.light(
        Some(root),
        "tree/glow",
        Pose::at(0.0, 5.0, 2.0),
        LightFactory::point(Color::from_hex(0x046307), 2.0, 10.0),
    )?;
    builder.light(
        Some(root),
        "tree/spotlight",
        Pose::at(5.0, 15.0, 10.0),
        LightFactory::spot(Color::from_hex(0xfff5cc), config.spotlight_intensity, 0.4, 0.5)
            .with_shadows(),
    )?;

    log::debug!(
        "Tree assembled with {} decorations ({} twinkling bulbs)",
        decorations.len(),
        bulbs.len()
    );
    Ok(TreeNodes {
        root,
        star,
        bulbs,
        decorations,
    })
}
