//! Builds the holiday scene from its configuration
//!
//! Assembly runs once. Layout generators place the decorations and dancers,
//! the graph receives every node, and each animated node gets its binding.
//! Afterwards the scene is read-only; per-frame values flow out through the
//! bindings instead.

mod campfire;
mod dancers;
mod tree;

use rand::Rng;

use super::{
    AnimationBinding, Animator, Geometry, LightComponent, LightFactory, MaterialRef, NodeContent,
    NodeId, Pose, SceneEnvironment, SceneError, SceneGraph, ShadowFlags,
};
use crate::config::SceneConfig;
use crate::foundation::math::{constants::HALF_PI, Vec3};
use crate::layout::{DecorationDescriptor, RingSlot};
use crate::materials::{presets, Material, MaterialRegistry};

/// Ids of the nodes callers most often need
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandles {
    /// Tree root group
    pub tree: NodeId,
    /// Star group on top of the tree
    pub star: NodeId,
    /// Twinkling bulbs, in decoration order
    pub bulbs: Vec<NodeId>,
    /// Campfire root group
    pub fire: NodeId,
    /// Flickering fire light
    pub fire_light: NodeId,
    /// Inner flame batch
    pub core_flames: NodeId,
    /// Outer flame batch
    pub outer_flames: NodeId,
    /// Orbiting group holding the dancers
    pub dancer_ring: NodeId,
    /// One group per dancer, in ring order
    pub dancers: Vec<NodeId>,
}

/// The assembled scene
///
/// Owns the graph, the environment settings, the shared material registry,
/// the generated layouts and every animation binding.
#[derive(Debug, Clone)]
pub struct HolidayScene {
    graph: SceneGraph,
    environment: SceneEnvironment,
    materials: MaterialRegistry,
    decorations: Vec<DecorationDescriptor>,
    ring: Vec<RingSlot>,
    bindings: Vec<AnimationBinding>,
    handles: SceneHandles,
}

impl HolidayScene {
    /// Build the scene with the standard material presets
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, SceneError> {
        Self::build_with_materials(config, MaterialRegistry::holiday_presets(), rng)
    }

    /// Build the scene with a caller-provided registry
    ///
    /// The registry must contain every preset in [`presets`].
    pub fn build_with_materials<R: Rng + ?Sized>(
        config: &SceneConfig,
        materials: MaterialRegistry,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        config.validate()?;

        let mut builder = SceneBuilder::new(&materials);
        build_surroundings(&mut builder, &config.environment)?;
        let tree = tree::build_tree(&mut builder, &config.tree, rng)?;
        let fire = campfire::build_campfire(&mut builder, &config.campfire)?;
        let dancers = dancers::build_dancers(&mut builder, fire.root, &config.dancers)?;
        let (graph, bindings) = builder.finish();

        log::info!(
            "Assembled holiday scene: {} nodes, {} animation bindings, {} decorations, {} dancers",
            graph.len(),
            bindings.len(),
            tree.decorations.len(),
            dancers.slots.len()
        );

        Ok(Self {
            graph,
            environment: config.environment.clone(),
            materials,
            decorations: tree.decorations,
            ring: dancers.slots,
            bindings,
            handles: SceneHandles {
                tree: tree.root,
                star: tree.star,
                bulbs: tree.bulbs,
                fire: fire.root,
                fire_light: fire.light,
                core_flames: fire.core,
                outer_flames: fire.outer,
                dancer_ring: dancers.ring,
                dancers: dancers.figures,
            },
        })
    }

    /// The node tree
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Camera, lighting rig and post-processing settings
    pub fn environment(&self) -> &SceneEnvironment {
        &self.environment
    }

    /// Shared material presets
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Generated tree decorations
    pub fn decorations(&self) -> &[DecorationDescriptor] {
        &self.decorations
    }

    /// Placed dancer slots
    pub fn ring_slots(&self) -> &[RingSlot] {
        &self.ring
    }

    /// Animation bindings in registration order
    pub fn bindings(&self) -> &[AnimationBinding] {
        &self.bindings
    }

    /// Frequently used node ids
    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }
}

/// Ground plane, fill light and moonlight
fn build_surroundings(
    builder: &mut SceneBuilder<'_>,
    environment: &SceneEnvironment,
) -> Result<(), SceneError> {
    let ambient = &environment.ambient;
    builder.light(
        None,
        "ambient",
        Pose::identity(),
        LightFactory::ambient(ambient.color, ambient.intensity),
    )?;

    let moon = &environment.moon;
    let mut moonlight = LightFactory::directional(moon.color, moon.intensity)
        .with_target(Vec3::zeros())
        .with_shadow_map_size(moon.shadow_map_size, moon.shadow_map_size);
    if moon.cast_shadows {
        moonlight = moonlight.with_shadows();
    }
    builder.light(None, "moon", Pose::from_position(moon.position), moonlight)?;

    builder.mesh(
        None,
        "ground",
        Pose::identity().with_rotation(-HALF_PI, 0.0, 0.0),
        Geometry::Plane {
            width: 100.0,
            height: 100.0,
        },
        presets::GROUND,
        ShadowFlags::RECEIVE,
    )?;
    Ok(())
}

/// Accumulates nodes and bindings while the scene is assembled
pub(crate) struct SceneBuilder<'a> {
    graph: SceneGraph,
    materials: &'a MaterialRegistry,
    bindings: Vec<AnimationBinding>,
}

impl<'a> SceneBuilder<'a> {
    fn new(materials: &'a MaterialRegistry) -> Self {
        Self {
            graph: SceneGraph::new(),
            materials,
            bindings: Vec::new(),
        }
    }

    fn finish(self) -> (SceneGraph, Vec<AnimationBinding>) {
        (self.graph, self.bindings)
    }

    fn shared(&self, preset: &str) -> Result<MaterialRef, SceneError> {
        Ok(MaterialRef::Shared {
            preset: preset.to_string(),
            material: self.materials.require(preset)?,
        })
    }

    fn node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        pose: Pose,
        content: NodeContent,
    ) -> Result<NodeId, SceneError> {
        match parent {
            Some(parent) => self.graph.add_child(parent, name, pose, content),
            None => self.graph.add_root(name, pose, content),
        }
    }

    fn group(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        pose: Pose,
    ) -> Result<NodeId, SceneError> {
        self.node(parent, name, pose, NodeContent::Group)
    }

    fn mesh(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        pose: Pose,
        geometry: Geometry,
        preset: &str,
        shadows: ShadowFlags,
    ) -> Result<NodeId, SceneError> {
        let material = self.shared(preset)?;
        self.node(
            parent,
            name,
            pose,
            NodeContent::Mesh {
                geometry,
                material,
                shadows,
            },
        )
    }

    fn unique_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        pose: Pose,
        geometry: Geometry,
        material: Material,
    ) -> Result<NodeId, SceneError> {
        self.node(
            Some(parent),
            name,
            pose,
            NodeContent::Mesh {
                geometry,
                material: MaterialRef::Unique(Box::new(material)),
                shadows: ShadowFlags::empty(),
            },
        )
    }

    fn instanced(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        pose: Pose,
        geometry: Geometry,
        preset: &str,
        capacity: u32,
    ) -> Result<NodeId, SceneError> {
        let material = self.shared(preset)?;
        self.node(
            Some(parent),
            name,
            pose,
            NodeContent::InstancedMesh {
                geometry,
                material,
                capacity,
            },
        )
    }

    fn light(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        pose: Pose,
        light: LightComponent,
    ) -> Result<NodeId, SceneError> {
        self.node(parent, name, pose, NodeContent::Light(light))
    }

    fn bind(&mut self, node: NodeId, animator: Animator) {
        self.bindings.push(AnimationBinding::new(node, animator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn build(seed: u64) -> HolidayScene {
        let mut rng = StdRng::seed_from_u64(seed);
        HolidayScene::build(&SceneConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_node_and_binding_counts() {
        let scene = build(7);
        let graph = scene.graph();

        // 3 surroundings + 49 tree + 39 campfire + 57 dancers
        assert_eq!(graph.len(), 148);
        assert_eq!(graph.lights().count(), 6);
        assert_eq!(scene.decorations().len(), 36);
        assert_eq!(scene.ring_slots().len(), 4);

        let bulbs = scene.decorations().iter().filter(|d| d.is_light()).count();
        assert_eq!(scene.handles().bulbs.len(), bulbs);
        assert_eq!(scene.bindings().len(), 48 + bulbs);
    }

    #[test]
    fn test_every_binding_targets_a_node() {
        let scene = build(11);
        for binding in scene.bindings() {
            assert!(scene.graph().contains(binding.node), "{}", binding.animator.kind_name());
        }
    }

    #[test]
    fn test_shared_materials_are_shared() {
        let scene = build(3);
        let graph = scene.graph();
        let gold = scene.materials().require(presets::GOLD).unwrap();

        let mut gold_meshes = 0;
        for id in graph.depth_first() {
            if let Some(NodeContent::Mesh { material, .. }) = graph.get(id).map(|n| &n.content) {
                if material.preset() == Some(presets::GOLD) {
                    if let MaterialRef::Shared { material, .. } = material {
                        assert!(std::sync::Arc::ptr_eq(material, &gold));
                    }
                    gold_meshes += 1;
                }
            }
        }
        // Two garlands plus however many gold ornaments were drawn
        assert!(gold_meshes >= 2);
    }

    #[test]
    fn test_missing_preset_fails() {
        let registry = MaterialRegistry::builder()
            .insert(presets::GROUND, Material::new())
            .build();
        let mut rng = StdRng::seed_from_u64(0);
        let result = HolidayScene::build_with_materials(&SceneConfig::default(), registry, &mut rng);
        assert!(matches!(result, Err(SceneError::Material(_))));
    }

    #[test]
    fn test_invalid_config_fails_before_assembly() {
        let mut config = SceneConfig::default();
        config.campfire.core.speed = -1.0;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            HolidayScene::build(&config, &mut rng),
            Err(SceneError::Config(_))
        ));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = build(42);
        let b = build(42);
        assert_eq!(a.decorations(), b.decorations());
        assert_eq!(a.bindings(), b.bindings());
    }
}
