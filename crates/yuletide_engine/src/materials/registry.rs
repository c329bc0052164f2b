//! Named, shared material presets

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::{presets, Material};
use crate::foundation::color::Color;

/// Material lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// No preset registered under this name
    #[error("unknown material preset '{0}'")]
    Unknown(String),
}

/// Read-only registry of shared material presets
///
/// Built once through [`MaterialRegistryBuilder`]. Lookups hand out clones
/// of the same `Arc`, never copies of the material.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialRegistry {
    /// Start building a registry
    pub fn builder() -> MaterialRegistryBuilder {
        MaterialRegistryBuilder::default()
    }

    /// Shared reference to a preset, if registered
    pub fn get(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).map(Arc::clone)
    }

    /// Shared reference to a preset, failing on unknown names
    pub fn require(&self, name: &str) -> Result<Arc<Material>, MaterialError> {
        self.get(name)
            .ok_or_else(|| MaterialError::Unknown(name.to_string()))
    }

    /// Check if a preset is registered
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Get the number of presets
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Every preset the holiday scene uses
    pub fn holiday_presets() -> Self {
        Self::builder()
            .insert(
                presets::EMERALD,
                Material::new()
                    .with_color(Color::from_hex(0x046307))
                    .with_roughness(0.7)
                    .with_metallic(0.1),
            )
            .insert(
                presets::GOLD,
                Material::new()
                    .with_color(Color::from_hex(0xffd700))
                    .with_roughness(0.1)
                    .with_metallic(1.0)
                    .with_emissive(Color::from_hex(0xaa6600), 0.1),
            )
            .insert(
                presets::SILVER,
                Material::new()
                    .with_color(Color::from_hex(0xeeeeff))
                    .with_roughness(0.2)
                    .with_metallic(0.9),
            )
            .insert(presets::BARK, Material::new().with_color(Color::from_hex(0x3e2723)))
            .insert(
                presets::LOG_WOOD,
                Material::new()
                    .with_color(Color::from_hex(0x5d4037))
                    .with_roughness(0.9),
            )
            .insert(
                presets::GROUND,
                Material::new()
                    .with_color(Color::from_hex(0x080808))
                    .with_roughness(0.4)
                    .with_metallic(0.2),
            )
            .insert(
                presets::FLAME_CORE,
                Material::new()
                    .with_color(Color::from_hex(0xff4400))
                    .with_emissive(Color::from_hex(0xff2200), 4.0)
                    .without_tone_mapping()
                    .with_opacity(0.9),
            )
            .insert(
                presets::FLAME_OUTER,
                Material::new()
                    .with_color(Color::from_hex(0xffaa00))
                    .with_emissive(Color::from_hex(0xffaa00), 3.0)
                    .without_tone_mapping(),
            )
            .insert(
                presets::STAR,
                Material::new()
                    .with_color(Color::from_hex(0xffd700))
                    .with_emissive(Color::from_hex(0xffd700), 2.0)
                    .with_metallic(1.0)
                    .with_roughness(0.0)
                    .without_tone_mapping(),
            )
            .insert(
                presets::BLACK_FUR,
                Material::new()
                    .with_color(Color::from_hex(0x1a1a1a))
                    .with_roughness(0.6),
            )
            .insert(
                presets::WHITE_FUR,
                Material::new()
                    .with_color(Color::WHITE)
                    .with_roughness(0.5),
            )
            .insert(presets::PINK_SKIN, Material::new().with_color(Color::from_hex(0xffb6c1)))
            .insert(presets::EYE, Material::new().with_color(Color::BLACK).unlit())
            .build()
    }
}

/// Collects presets before the registry is frozen
#[derive(Debug, Default)]
pub struct MaterialRegistryBuilder {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialRegistryBuilder {
    /// Register a preset, replacing any earlier one with the same name
    pub fn insert(mut self, name: impl Into<String>, material: Material) -> Self {
        let name = name.into();
        if self.materials.insert(name.clone(), Arc::new(material)).is_some() {
            log::warn!("Material preset '{}' registered twice, keeping the last", name);
        }
        self
    }

    /// Freeze the registry
    pub fn build(self) -> MaterialRegistry {
        log::debug!("Material registry built with {} presets", self.materials.len());
        MaterialRegistry {
            materials: self.materials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_share_one_instance() {
        let registry = MaterialRegistry::holiday_presets();
        let first = registry.require(presets::GOLD).unwrap();
        let second = registry.require(presets::GOLD).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_preset() {
        let registry = MaterialRegistry::holiday_presets();
        assert_eq!(
            registry.require("velvet"),
            Err(MaterialError::Unknown("velvet".to_string()))
        );
        assert!(registry.get("velvet").is_none());
    }

    #[test]
    fn test_holiday_presets_complete() {
        let registry = MaterialRegistry::holiday_presets();
        for name in [
            presets::EMERALD,
            presets::GOLD,
            presets::SILVER,
            presets::BARK,
            presets::LOG_WOOD,
            presets::GROUND,
            presets::FLAME_CORE,
            presets::FLAME_OUTER,
            presets::STAR,
            presets::BLACK_FUR,
            presets::WHITE_FUR,
            presets::PINK_SKIN,
            presets::EYE,
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 13);
    }

    #[test]
    fn test_later_insert_wins() {
        let registry = MaterialRegistry::builder()
            .insert("trim", Material::new().with_roughness(0.2))
            .insert("trim", Material::new().with_roughness(0.8))
            .build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.require("trim").unwrap().roughness, 0.8);
        assert!(registry.contains("trim"));
    }
}
