//! Tree decoration layout
//!
//! Decorations are hung on concentric rings, one ring per tree level. Each
//! level sits higher, is narrower and holds fewer items than the one below.
//! Every slot then becomes either a metallic ornament or a twinkling light.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    require_finite, require_positive, require_probability, ring::ring_angle, LayoutError,
};
use crate::foundation::{color::Color, math::Vec3};

/// Parameters of the decoration layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayout {
    /// Number of decorated levels
    pub level_count: u32,
    /// Vertical distance between levels
    pub level_spacing: f32,
    /// Ring radius of the lowest level before inset
    pub max_radius: f32,
    /// Radius lost per level
    pub radius_decay: f32,
    /// Items on the lowest level
    pub base_item_count: u32,
    /// Items lost per level
    pub count_decay: u32,
    /// Fraction of the level radius decorations hang at
    pub inset: f32,
    /// Height added to every level
    pub level_y_offset: f32,
    /// Height removed per level, pulling upper rings into the foliage
    pub level_y_drop: f32,
    /// Chance a slot holds an ornament rather than a light
    pub ornament_probability: f32,
    /// Chance an ornament is gold rather than silver
    pub gold_probability: f32,
    /// Colors lights draw from, uniformly; repeats weight a color
    pub light_palette: Vec<Color>,
    /// Lowest twinkle speed (inclusive)
    pub twinkle_speed_min: f32,
    /// Highest twinkle speed (exclusive)
    pub twinkle_speed_max: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            level_count: 4,
            level_spacing: 2.5,
            max_radius: 4.0,
            radius_decay: 0.9,
            base_item_count: 12,
            count_decay: 2,
            inset: 0.9,
            level_y_offset: 1.0,
            level_y_drop: 0.2,
            ornament_probability: 0.4,
            gold_probability: 0.7,
            light_palette: vec![
                Color::from_hex(0xffaa00),
                Color::from_hex(0xffaa00),
                Color::from_hex(0xff0000),
                Color::from_hex(0x00ff00),
                Color::from_hex(0x0044ff),
            ],
            twinkle_speed_min: 2.0,
            twinkle_speed_max: 7.0,
        }
    }
}

impl TreeLayout {
    /// Check every parameter before anything is placed
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.level_count == 0 {
            return Err(LayoutError::ZeroCount { name: "level count" });
        }
        require_positive("level spacing", self.level_spacing)?;
        require_positive("max radius", self.max_radius)?;
        require_finite("radius decay", self.radius_decay)?;
        require_finite("level y offset", self.level_y_offset)?;
        require_finite("level y drop", self.level_y_drop)?;
        if !(self.inset > 0.0 && self.inset <= 1.0) {
            return Err(LayoutError::Inset(self.inset));
        }
        require_probability("ornament probability", self.ornament_probability)?;
        require_probability("gold probability", self.gold_probability)?;

        // Radius is linear in the level, so the top level is the worst case
        let top = self.level_count - 1;
        let top_radius = self.level_radius(top);
        if top_radius < 0.0 {
            let level = (0..self.level_count)
                .find(|&level| self.level_radius(level) < 0.0)
                .unwrap_or(top);
            return Err(LayoutError::NegativeRadius {
                level,
                radius: self.level_radius(level),
            });
        }

        if self.light_palette.is_empty() {
            return Err(LayoutError::EmptyPalette);
        }
        let (min, max) = (self.twinkle_speed_min, self.twinkle_speed_max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(LayoutError::SpeedRange { min, max });
        }
        Ok(())
    }

    /// Radius of a level's ring before inset
    pub fn level_radius(&self, level: u32) -> f32 {
        self.max_radius - level as f32 * self.radius_decay
    }

    /// Height of a level's ring
    pub fn level_height(&self, level: u32) -> f32 {
        let level = level as f32;
        level * self.level_spacing + self.level_y_offset - level * self.level_y_drop
    }

    /// Item count of a level; levels that would go negative hold nothing
    pub fn level_item_count(&self, level: u32) -> u32 {
        let count = i64::from(self.base_item_count) - i64::from(level) * i64::from(self.count_decay);
        u32::try_from(count.max(0)).unwrap_or(0)
    }

    /// Item count of every level, bottom to top
    pub fn level_item_counts(&self) -> Vec<u32> {
        (0..self.level_count).map(|level| self.level_item_count(level)).collect()
    }

    /// Total number of decoration slots
    pub fn slot_count(&self) -> usize {
        self.level_item_counts().iter().map(|&c| c as usize).sum()
    }
}

/// Finish of a metallic ornament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentFinish {
    /// Polished gold
    Gold,
    /// Brushed silver
    Silver,
}

/// What hangs in a decoration slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecorationKind {
    /// Static metallic ball
    Ornament(OrnamentFinish),
    /// Small emissive bulb that twinkles
    Light {
        /// Bulb color, used for both base and emissive color
        color: Color,
        /// Twinkle angular speed
        twinkle_speed: f32,
    },
}

/// Immutable placement and appearance of one decoration
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationDescriptor {
    /// Tree level, `0` is the lowest
    pub level: u32,
    /// Index within the level's ring
    pub slot: u32,
    /// Angle around the trunk
    pub angle: f32,
    /// Ring radius after inset
    pub radius: f32,
    /// Position relative to the tree base
    pub position: Vec3,
    /// Ornament or light
    pub kind: DecorationKind,
}

impl DecorationDescriptor {
    /// Shared material preset name for ornaments, `None` for lights
    ///
    /// Lights carry their own color and need a material each.
    pub fn material_key(&self) -> Option<&'static str> {
        match self.kind {
            DecorationKind::Ornament(OrnamentFinish::Gold) => Some(crate::materials::presets::GOLD),
            DecorationKind::Ornament(OrnamentFinish::Silver) => {
                Some(crate::materials::presets::SILVER)
            }
            DecorationKind::Light { .. } => None,
        }
    }

    /// Twinkle speed, only present for lights
    pub fn animation_speed(&self) -> Option<f32> {
        match self.kind {
            DecorationKind::Light { twinkle_speed, .. } => Some(twinkle_speed),
            DecorationKind::Ornament(_) => None,
        }
    }

    /// Whether this slot holds a light
    pub fn is_light(&self) -> bool {
        matches!(self.kind, DecorationKind::Light { .. })
    }
}

/// Generate every decoration on the tree
///
/// Geometry depends only on `layout`. Kinds, colors and speeds come from
/// `rng`; the draws happen in slot order, so the same seed yields the same
/// list.
pub fn generate_tree_decorations<R: Rng + ?Sized>(
    layout: &TreeLayout,
    rng: &mut R,
) -> Result<Vec<DecorationDescriptor>, LayoutError> {
    layout.validate()?;

    let mut decorations = Vec::with_capacity(layout.slot_count());
    for level in 0..layout.level_count {
        let count = layout.level_item_count(level);
        if count == 0 {
            log::debug!("Tree level {} has no decoration slots", level);
            continue;
        }

        let radius = layout.level_radius(level) * layout.inset;
        let height = layout.level_height(level);

        for slot in 0..count {
            let angle = ring_angle(slot, count);
            let position = Vec3::new(angle.sin() * radius, height, angle.cos() * radius);
            decorations.push(DecorationDescriptor {
                level,
                slot,
                angle,
                radius,
                position,
                kind: draw_kind(layout, rng),
            });
        }
    }

    let lights = decorations.iter().filter(|d| d.is_light()).count();
    log::debug!(
        "Generated {} tree decorations ({} lights, {} ornaments)",
        decorations.len(),
        lights,
        decorations.len() - lights
    );
    Ok(decorations)
}

fn draw_kind<R: Rng + ?Sized>(layout: &TreeLayout, rng: &mut R) -> DecorationKind {
    if rng.gen::<f32>() < layout.ornament_probability {
        let finish = if rng.gen::<f32>() < layout.gold_probability {
            OrnamentFinish::Gold
        } else {
            OrnamentFinish::Silver
        };
        DecorationKind::Ornament(finish)
    } else {
        let color = layout.light_palette[rng.gen_range(0..layout.light_palette.len())];
        let twinkle_speed = rng.gen_range(layout.twinkle_speed_min..layout.twinkle_speed_max);
        DecorationKind::Light {
            color,
            twinkle_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::TAU;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_level_schedule() {
        let layout = TreeLayout::default();
        assert_eq!(layout.level_item_counts(), vec![12, 10, 8, 6]);
        assert_eq!(layout.slot_count(), 36);

        let decorations =
            generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(decorations.len(), 36);
        for (level, expected) in [12_usize, 10, 8, 6].into_iter().enumerate() {
            let on_level = decorations.iter().filter(|d| d.level == level as u32).count();
            assert_eq!(on_level, expected);
        }
    }

    #[test]
    fn test_geometry_matches_closed_form() {
        let layout = TreeLayout::default();
        let decorations =
            generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(1)).unwrap();

        for d in &decorations {
            let count = layout.level_item_count(d.level) as f32;
            let level = d.level as f32;
            let radius = (4.0 - level * 0.9) * 0.9;
            assert_relative_eq!(d.angle, TAU * d.slot as f32 / count, epsilon = 1e-6);
            assert_relative_eq!(d.radius, radius, epsilon = 1e-6);
            assert_relative_eq!(d.position.x, d.angle.sin() * radius, epsilon = 1e-5);
            assert_relative_eq!(d.position.z, d.angle.cos() * radius, epsilon = 1e-5);
            assert_relative_eq!(d.position.y, level * 2.5 + 1.0 - level * 0.2, epsilon = 1e-5);
        }

        // First slot of the lowest ring sits straight ahead of the trunk
        assert_relative_eq!(decorations[0].position, Vec3::new(0.0, 1.0, 3.6), epsilon = 1e-5);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = TreeLayout::default();
        let first = generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(2025)).unwrap();
        let second = generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(2025)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_geometry_independent_of_seed() {
        let layout = TreeLayout::default();
        let a = generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!((x.level, x.slot), (y.level, y.slot));
            assert_eq!(x.angle, y.angle);
            assert_eq!(x.radius, y.radius);
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn test_drawn_values_respect_layout() {
        let layout = TreeLayout::default();
        let decorations =
            generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(11)).unwrap();
        for d in &decorations {
            match d.kind {
                DecorationKind::Light {
                    color,
                    twinkle_speed,
                } => {
                    assert!(layout.light_palette.contains(&color));
                    assert!((2.0..7.0).contains(&twinkle_speed));
                    assert_eq!(d.material_key(), None);
                    assert_eq!(d.animation_speed(), Some(twinkle_speed));
                }
                DecorationKind::Ornament(_) => {
                    assert!(d.material_key().is_some());
                    assert_eq!(d.animation_speed(), None);
                }
            }
        }
    }

    #[test]
    fn test_probability_extremes() {
        let all_gold = TreeLayout {
            ornament_probability: 1.0,
            gold_probability: 1.0,
            ..TreeLayout::default()
        };
        let decorations =
            generate_tree_decorations(&all_gold, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(decorations
            .iter()
            .all(|d| d.kind == DecorationKind::Ornament(OrnamentFinish::Gold)));

        let all_lights = TreeLayout {
            ornament_probability: 0.0,
            ..TreeLayout::default()
        };
        let decorations =
            generate_tree_decorations(&all_lights, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(decorations.iter().all(DecorationDescriptor::is_light));
    }

    #[test]
    fn test_exhausted_levels_place_nothing() {
        let layout = TreeLayout {
            base_item_count: 5,
            count_decay: 3,
            ..TreeLayout::default()
        };
        assert_eq!(layout.level_item_counts(), vec![5, 2, 0, 0]);
        let decorations =
            generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(decorations.len(), 7);
        assert!(decorations.iter().all(|d| d.level < 2));
    }

    #[test]
    fn test_invalid_layouts_fail_fast() {
        let cases = [
            TreeLayout {
                level_count: 0,
                ..TreeLayout::default()
            },
            TreeLayout {
                radius_decay: 2.0,
                ..TreeLayout::default()
            },
            TreeLayout {
                inset: 0.0,
                ..TreeLayout::default()
            },
            TreeLayout {
                ornament_probability: 1.5,
                ..TreeLayout::default()
            },
            TreeLayout {
                light_palette: Vec::new(),
                ..TreeLayout::default()
            },
            TreeLayout {
                twinkle_speed_min: 5.0,
                twinkle_speed_max: 5.0,
                ..TreeLayout::default()
            },
            TreeLayout {
                twinkle_speed_min: 0.0,
                ..TreeLayout::default()
            },
        ];
        for layout in cases {
            assert!(
                generate_tree_decorations(&layout, &mut StdRng::seed_from_u64(0)).is_err(),
                "accepted {layout:?}"
            );
        }
    }

    #[test]
    fn test_negative_radius_reports_first_level() {
        let layout = TreeLayout {
            radius_decay: 1.5,
            ..TreeLayout::default()
        };
        // 4.0 - 3 * 1.5 = -0.5 at the top level only
        match layout.validate() {
            Err(LayoutError::NegativeRadius { level, radius }) => {
                assert_eq!(level, 3);
                assert_relative_eq!(radius, -0.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
