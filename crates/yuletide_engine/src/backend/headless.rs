//! Backend that tracks scene state without drawing
//!
//! Keeps its own copy of every node's pose and intensity, validates and
//! applies frame updates, and packs instance and light buffers the way a GPU
//! backend would, reporting their sizes instead of uploading them.

use slotmap::SecondaryMap;

use super::{
    packing::{as_bytes, InstanceData, LightData},
    BackendResult, FrameUpdate, NodeUpdate, RenderBackend, RenderError, Viewport,
};
use crate::foundation::math::Transform;
use crate::scene::{MaterialRef, NodeContent, NodeId, Pose, SceneEnvironment, SceneGraph};

/// Frames between debug-level summaries
const SUMMARY_INTERVAL: u64 = 120;

/// What the last applied frame produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Frame index
    pub frame: u64,
    /// Scene time
    pub time: f32,
    /// Node updates applied
    pub updated_nodes: usize,
    /// Instances packed across all batches
    pub instances: usize,
    /// Bytes of packed instance data
    pub instance_bytes: usize,
    /// Lights packed
    pub lights: usize,
    /// Bytes of packed light data
    pub light_bytes: usize,
    /// Sum of all light intensities
    pub total_light_intensity: f32,
}

/// Renderer stand-in for tests and headless runs
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    viewport: Viewport,
    graph: Option<SceneGraph>,
    environment: Option<SceneEnvironment>,
    poses: SecondaryMap<NodeId, Pose>,
    light_intensities: SecondaryMap<NodeId, f32>,
    emissive_intensities: SecondaryMap<NodeId, f32>,
    frames_applied: u64,
    last_stats: Option<FrameStats>,
}

impl HeadlessBackend {
    /// Create a backend with the default viewport
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set the reported viewport
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Submitted graph, if any
    pub fn graph(&self) -> Option<&SceneGraph> {
        self.graph.as_ref()
    }

    /// Submitted environment, if any
    pub fn environment(&self) -> Option<&SceneEnvironment> {
        self.environment.as_ref()
    }

    /// Current local pose of a node
    pub fn pose(&self, node: NodeId) -> Option<Pose> {
        self.poses.get(node).copied()
    }

    /// Current intensity of a light node
    pub fn light_intensity(&self, node: NodeId) -> Option<f32> {
        self.light_intensities.get(node).copied()
    }

    /// Current emissive intensity of a mesh node
    pub fn emissive_intensity(&self, node: NodeId) -> Option<f32> {
        self.emissive_intensities.get(node).copied()
    }

    /// Current world transform of a node
    pub fn world_transform(&self, node: NodeId) -> Option<Transform> {
        let graph = self.graph.as_ref()?;
        graph.world_transform_with(node, |id, scene_node| {
            self.poses.get(id).copied().unwrap_or(scene_node.pose)
        })
    }

    /// Number of frames applied since the last submission
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    /// Statistics of the most recent frame
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    fn check_update(&self, graph: &SceneGraph, update: &NodeUpdate) -> BackendResult<()> {
        let node = graph
            .get(update.node)
            .ok_or(RenderError::UnknownNode(update.node))?;
        let negative = |field: &'static str, value: f32| RenderError::NegativeMagnitude {
            node: node.name.clone(),
            field,
            value,
        };

        if let Some(scale) = update.scale {
            if let Some(&value) = scale.iter().find(|c| !(**c >= 0.0)) {
                return Err(negative("scale", value));
            }
        }
        if let Some(value) = update.light_intensity {
            if !self.light_intensities.contains_key(update.node) {
                return Err(RenderError::MissingProperty {
                    node: node.name.clone(),
                    field: "light intensity",
                });
            }
            if !(value >= 0.0) {
                return Err(negative("light intensity", value));
            }
        }
        if let Some(value) = update.emissive_intensity {
            if !self.emissive_intensities.contains_key(update.node) {
                return Err(RenderError::MissingProperty {
                    node: node.name.clone(),
                    field: "emissive material",
                });
            }
            if !(value >= 0.0) {
                return Err(negative("emissive intensity", value));
            }
        }
        Ok(())
    }

    fn apply_update(&mut self, update: &NodeUpdate) {
        if let Some(pose) = self.poses.get_mut(update.node) {
            if let Some(position) = update.position {
                pose.position = position;
            }
            if let Some(rotation) = update.rotation {
                pose.rotation = rotation;
            }
            if let Some(scale) = update.scale {
                pose.scale = scale;
            }
        }
        if let Some(value) = update.light_intensity {
            if let Some(intensity) = self.light_intensities.get_mut(update.node) {
                *intensity = value;
            }
        }
        if let Some(value) = update.emissive_intensity {
            if let Some(intensity) = self.emissive_intensities.get_mut(update.node) {
                *intensity = value;
            }
        }
    }

    fn pack(&self, frame: &FrameUpdate) -> FrameStats {
        let mut stats = FrameStats {
            frame: frame.frame,
            time: frame.time,
            updated_nodes: frame.len(),
            ..Default::default()
        };

        let Some(graph) = self.graph.as_ref() else {
            return stats;
        };

        let mut instances = Vec::new();
        let mut lights = Vec::new();
        for id in graph.depth_first() {
            let Some(node) = graph.get(id) else { continue };
            match &node.content {
                NodeContent::InstancedMesh { .. } => {
                    instances.extend(
                        graph
                            .children(id)
                            .iter()
                            .filter_map(|&child| self.world_transform(child))
                            .map(|world| InstanceData::from_transform(&world)),
                    );
                }
                NodeContent::Light(light) => {
                    let intensity = self.light_intensity(id).unwrap_or(light.intensity);
                    let position = self
                        .world_transform(id)
                        .map_or([0.0; 3], |world| world.position.into());
                    lights.push(LightData::new(light, position, intensity));
                    stats.total_light_intensity += intensity;
                }
                _ => {}
            }
        }

        stats.instances = instances.len();
        stats.instance_bytes = as_bytes(&instances).len();
        stats.lights = lights.len();
        stats.light_bytes = as_bytes(&lights).len();
        stats
    }
}

impl RenderBackend for HeadlessBackend {
    fn submit_scene(
        &mut self,
        graph: &SceneGraph,
        environment: &SceneEnvironment,
    ) -> BackendResult<()> {
        environment
            .validate()
            .map_err(|e| RenderError::BackendError(e.to_string()))?;

        self.poses.clear();
        self.light_intensities.clear();
        self.emissive_intensities.clear();
        for id in graph.depth_first() {
            let Some(node) = graph.get(id) else { continue };
            self.poses.insert(id, node.pose);
            match &node.content {
                NodeContent::Light(light) => {
                    self.light_intensities.insert(id, light.intensity);
                }
                // Unique materials are per-node and may be driven whatever they start at;
                // shared presets stay read-only
                NodeContent::Mesh {
                    material: MaterialRef::Unique(material),
                    ..
                } => {
                    self.emissive_intensities.insert(id, material.emissive_intensity);
                }
                _ => {}
            }
        }

        log::info!(
            "Headless backend received {} nodes ({} lights, {} emissive meshes) at {}x{} (aspect {:.2}), fov {}",
            graph.len(),
            self.light_intensities.len(),
            self.emissive_intensities.len(),
            self.viewport.width,
            self.viewport.height,
            self.viewport.aspect_ratio(),
            environment.camera.fov
        );
        log::debug!(
            "Environment: background {}, fog {}..{}, env map '{}', bloom threshold {}",
            environment.background,
            environment.fog.near,
            environment.fog.far,
            environment.environment_map.preset,
            environment.post_processing.bloom.luminance_threshold
        );

        self.graph = Some(graph.clone());
        self.environment = Some(environment.clone());
        self.frames_applied = 0;
        self.last_stats = None;
        Ok(())
    }

    fn apply_frame(&mut self, frame: &FrameUpdate) -> BackendResult<()> {
        let graph = self.graph.as_ref().ok_or(RenderError::NoScene)?;

        // Validate everything first so a rejected frame leaves no partial state
        for update in &frame.updates {
            self.check_update(graph, update)?;
        }
        for update in &frame.updates {
            self.apply_update(update);
        }

        let stats = self.pack(frame);
        log::trace!(
            "Frame {} at {:.3}s: {} updates, {} instances, light total {:.2}",
            stats.frame,
            stats.time,
            stats.updated_nodes,
            stats.instances,
            stats.total_light_intensity
        );
        if self.frames_applied % SUMMARY_INTERVAL == 0 {
            log::debug!(
                "Frame {}: {} instance bytes, {} light bytes",
                stats.frame,
                stats.instance_bytes,
                stats.light_bytes
            );
        }

        self.frames_applied += 1;
        self.last_stats = Some(stats);
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{color::Color, math::Vec3};
    use crate::materials::{bulb_material, Material};
    use crate::scene::{Geometry, LightFactory, ShadowFlags};
    use std::sync::Arc;

    struct Fixture {
        graph: SceneGraph,
        light: NodeId,
        bulb: NodeId,
        plain: NodeId,
        particle: NodeId,
    }

    fn fixture() -> Fixture {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("fire", Pose::at(8.0, 0.0, 2.0), NodeContent::Group).unwrap();
        let light = graph
            .add_child(
                root,
                "fire/light",
                Pose::identity(),
                NodeContent::Light(LightFactory::point(Color::from_hex(0xffaa00), 15.0, 15.0)),
            )
            .unwrap();
        let bulb = graph
            .add_child(
                root,
                "bulb",
                Pose::identity(),
                NodeContent::Mesh {
                    geometry: Geometry::sphere(0.12, 8),
                    material: MaterialRef::Unique(Box::new(bulb_material(Color::WHITE, 2.0))),
                    shadows: ShadowFlags::empty(),
                },
            )
            .unwrap();
        let plain = graph
            .add_child(
                root,
                "log",
                Pose::identity(),
                NodeContent::Mesh {
                    geometry: Geometry::sphere(0.5, 8),
                    material: MaterialRef::Shared {
                        preset: "log_wood".to_string(),
                        material: Arc::new(Material::new()),
                    },
                    shadows: ShadowFlags::CAST,
                },
            )
            .unwrap();
        let batch = graph
            .add_child(
                root,
                "flames",
                Pose::at(0.0, 0.5, 0.0),
                NodeContent::InstancedMesh {
                    geometry: Geometry::Dodecahedron { radius: 0.3 },
                    material: MaterialRef::Unique(Box::new(Material::new())),
                    capacity: 4,
                },
            )
            .unwrap();
        let particle = graph
            .add_child(batch, "flames/0", Pose::identity(), NodeContent::Instance)
            .unwrap();
        Fixture {
            graph,
            light,
            bulb,
            plain,
            particle,
        }
    }

    fn submitted() -> (HeadlessBackend, Fixture) {
        let fixture = fixture();
        let mut backend = HeadlessBackend::new();
        backend
            .submit_scene(&fixture.graph, &SceneEnvironment::default())
            .unwrap();
        (backend, fixture)
    }

    #[test]
    fn test_frame_before_submission() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(
            backend.apply_frame(&FrameUpdate::new(0, 0.0)),
            Err(RenderError::NoScene)
        );
    }

    #[test]
    fn test_applies_updates() {
        let (mut backend, fixture) = submitted();
        assert_eq!(backend.light_intensity(fixture.light), Some(15.0));
        assert_eq!(backend.emissive_intensity(fixture.bulb), Some(2.0));
        assert_eq!(backend.emissive_intensity(fixture.plain), None);

        let mut frame = FrameUpdate::new(0, 0.5);
        frame.updates.push(
            NodeUpdate::new(fixture.light)
                .with_position(Vec3::new(0.0, 1.05, 0.0))
                .with_light_intensity(11.0),
        );
        frame
            .updates
            .push(NodeUpdate::new(fixture.particle).with_position(Vec3::new(0.0, 1.5, 0.0)));
        backend.apply_frame(&frame).unwrap();

        assert_eq!(backend.light_intensity(fixture.light), Some(11.0));
        let world = backend.world_transform(fixture.particle).unwrap();
        assert_eq!(world.position, Vec3::new(8.0, 2.0, 2.0));

        let stats = backend.last_stats().unwrap();
        assert_eq!(stats.updated_nodes, 2);
        assert_eq!(stats.instances, 1);
        assert_eq!(stats.instance_bytes, 64);
        assert_eq!(stats.lights, 1);
        assert_eq!(stats.total_light_intensity, 11.0);
        assert_eq!(backend.frames_applied(), 1);
    }

    #[test]
    fn test_rejects_negative_magnitudes_atomically() {
        let (mut backend, fixture) = submitted();
        let mut frame = FrameUpdate::new(0, 0.0);
        frame
            .updates
            .push(NodeUpdate::new(fixture.light).with_light_intensity(3.0));
        frame
            .updates
            .push(NodeUpdate::new(fixture.particle).with_scale(Vec3::new(-0.1, 1.0, 1.0)));

        assert!(matches!(
            backend.apply_frame(&frame),
            Err(RenderError::NegativeMagnitude { field: "scale", .. })
        ));
        assert_eq!(backend.light_intensity(fixture.light), Some(15.0));
        assert_eq!(backend.frames_applied(), 0);
    }

    #[test]
    fn test_rejects_unknown_nodes_and_missing_properties() {
        let (mut backend, fixture) = submitted();

        let other = fixture_graph_node();
        let mut frame = FrameUpdate::new(0, 0.0);
        frame.updates.push(NodeUpdate::new(other).with_position(Vec3::zeros()));
        assert_eq!(backend.apply_frame(&frame), Err(RenderError::UnknownNode(other)));

        let mut frame = FrameUpdate::new(0, 0.0);
        frame
            .updates
            .push(NodeUpdate::new(fixture.plain).with_emissive_intensity(1.0));
        assert!(matches!(
            backend.apply_frame(&frame),
            Err(RenderError::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_dark_unique_materials_can_still_be_driven() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("tree", Pose::identity(), NodeContent::Group).unwrap();
        let mut bulbs = Vec::new();
        for (name, material) in [
            ("unlit", bulb_material(Color::from_hex(0xff0000), 0.0)),
            ("black", bulb_material(Color::BLACK, 2.0)),
        ] {
            let bulb = graph
                .add_child(
                    root,
                    name,
                    Pose::identity(),
                    NodeContent::Mesh {
                        geometry: Geometry::sphere(0.12, 8),
                        material: MaterialRef::Unique(Box::new(material)),
                        shadows: ShadowFlags::empty(),
                    },
                )
                .unwrap();
            bulbs.push(bulb);
        }

        let mut backend = HeadlessBackend::new();
        backend.submit_scene(&graph, &SceneEnvironment::default()).unwrap();
        assert_eq!(backend.emissive_intensity(bulbs[0]), Some(0.0));
        assert_eq!(backend.emissive_intensity(bulbs[1]), Some(2.0));

        let mut frame = FrameUpdate::new(0, 0.0);
        for &bulb in &bulbs {
            frame.updates.push(NodeUpdate::new(bulb).with_emissive_intensity(1.25));
        }
        backend.apply_frame(&frame).unwrap();
        for &bulb in &bulbs {
            assert_eq!(backend.emissive_intensity(bulb), Some(1.25));
        }
    }

    fn fixture_graph_node() -> NodeId {
        let mut graph = fixture().graph;
        graph.add_root("extra", Pose::identity(), NodeContent::Group).unwrap()
    }
}
