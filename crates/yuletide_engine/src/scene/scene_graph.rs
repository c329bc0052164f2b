//! Retained scene graph
//!
//! Nodes live in a slot map and reference each other by [`NodeId`]. The
//! topology is fixed once the scene is assembled; only poses and light or
//! emissive intensities change afterwards, and those changes are carried by
//! per-frame updates rather than by mutating the graph.

use std::sync::Arc;

use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};

use super::{geometry::Geometry, lighting::LightComponent, SceneError};
use crate::foundation::math::{quat_from_euler_xyz, Transform, Vec3};
use crate::materials::Material;

new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

bitflags! {
    /// Shadow participation of a mesh
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u8 {
        /// Mesh occludes light
        const CAST = 1 << 0;
        /// Mesh shows shadows cast onto it
        const RECEIVE = 1 << 1;
    }
}

/// Local pose of a node relative to its parent
///
/// Rotation is stored as XYZ Euler angles in radians, the way the scene is
/// authored; [`Pose::to_transform`] converts to a quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Translation
    pub position: Vec3,
    /// Euler XYZ rotation
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Pose {
    /// Identity pose
    pub fn identity() -> Self {
        Self::default()
    }

    /// Pose translated to `(x, y, z)`
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Pose translated to `position`
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set Euler rotation
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Builder pattern: Set yaw only
    pub fn with_rotation_y(mut self, y: f32) -> Self {
        self.rotation = Vec3::new(0.0, y, 0.0);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Convert to a quaternion-based transform
    pub fn to_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: quat_from_euler_xyz(self.rotation),
            scale: self.scale,
        }
    }
}

/// Reference to a node's material
#[derive(Debug, Clone)]
pub enum MaterialRef {
    /// A registry preset shared with other nodes
    Shared {
        /// Preset name
        preset: String,
        /// The shared material
        material: Arc<Material>,
    },
    /// A material owned by this node alone
    Unique(Box<Material>),
}

impl MaterialRef {
    /// The referenced material
    pub fn material(&self) -> &Material {
        match self {
            Self::Shared { material, .. } => material,
            Self::Unique(material) => material,
        }
    }

    /// Preset name for shared materials
    pub fn preset(&self) -> Option<&str> {
        match self {
            Self::Shared { preset, .. } => Some(preset),
            Self::Unique(_) => None,
        }
    }
}

/// What a node draws or emits
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// Transform-only grouping node
    Group,
    /// A single mesh
    Mesh {
        /// Shape
        geometry: Geometry,
        /// Surface
        material: MaterialRef,
        /// Shadow participation
        shadows: ShadowFlags,
    },
    /// Batch drawing many copies of one mesh; children must be instances
    InstancedMesh {
        /// Shared shape
        geometry: Geometry,
        /// Shared surface
        material: MaterialRef,
        /// Maximum number of instances
        capacity: u32,
    },
    /// One copy inside an instanced batch, placed by its pose
    Instance,
    /// A light source
    Light(LightComponent),
}

impl NodeContent {
    /// Short label for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Mesh { .. } => "mesh",
            Self::InstancedMesh { .. } => "instanced_mesh",
            Self::Instance => "instance",
            Self::Light(_) => "light",
        }
    }
}

/// A node of the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Human-readable name, unique within the assembled scene
    pub name: String,
    /// Parent node, `None` for roots
    pub parent: Option<NodeId>,
    /// Children in insertion order
    pub children: Vec<NodeId>,
    /// Rest pose relative to the parent
    pub pose: Pose,
    /// Payload
    pub content: NodeContent,
}

/// Arena-backed tree of scene nodes
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node
    pub fn add_root(
        &mut self,
        name: impl Into<String>,
        pose: Pose,
        content: NodeContent,
    ) -> Result<NodeId, SceneError> {
        let name = name.into();
        if matches!(content, NodeContent::Instance) {
            return Err(SceneError::InvalidInstanceParent { name });
        }
        let id = self.nodes.insert(SceneNode {
            name,
            parent: None,
            children: Vec::new(),
            pose,
            content,
        });
        self.roots.push(id);
        Ok(id)
    }

    /// Add a node under `parent`
    ///
    /// Instances may only be added to an instanced batch, and only up to its
    /// capacity.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        pose: Pose,
        content: NodeContent,
    ) -> Result<NodeId, SceneError> {
        let name = name.into();
        let parent_node = self.nodes.get(parent).ok_or(SceneError::UnknownNode(parent))?;

        if matches!(content, NodeContent::Instance) {
            match parent_node.content {
                NodeContent::InstancedMesh { capacity, .. } => {
                    if parent_node.children.len() >= capacity as usize {
                        return Err(SceneError::InstanceCapacity {
                            batch: parent_node.name.clone(),
                            capacity,
                        });
                    }
                }
                _ => return Err(SceneError::InvalidInstanceParent { name }),
            }
        } else if matches!(parent_node.content, NodeContent::InstancedMesh { .. }) {
            return Err(SceneError::InvalidInstanceParent { name });
        }

        let id = self.nodes.insert(SceneNode {
            name,
            parent: Some(parent),
            children: Vec::new(),
            pose,
            content,
        });
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Check whether the id belongs to this graph
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// First node with this name in depth-first order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.depth_first()
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node, empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Every node, parents before children, siblings in insertion order
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Number of nodes matching a predicate
    pub fn count(&self, predicate: impl Fn(&SceneNode) -> bool) -> usize {
        self.nodes.values().filter(|node| predicate(node)).count()
    }

    /// Every light node
    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &LightComponent)> + '_ {
        self.nodes.iter().filter_map(|(id, node)| match &node.content {
            NodeContent::Light(light) => Some((id, light)),
            _ => None,
        })
    }

    /// World transform of a node at its rest pose
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        self.world_transform_with(id, |_, node| node.pose)
    }

    /// World transform of a node with poses supplied by the caller
    ///
    /// Composes `parent_world * local` from the root down. Used by backends
    /// that track animated poses separately from the rest poses.
    pub fn world_transform_with(
        &self,
        id: NodeId,
        pose_of: impl Fn(NodeId, &SceneNode) -> Pose,
    ) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(current)?;
            chain.push(pose_of(current, node).to_transform());
            cursor = node.parent;
        }
        Some(
            chain
                .iter()
                .rev()
                .fold(Transform::identity(), |world, local| world.combine(local)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Color;
    use crate::foundation::math::constants::HALF_PI;
    use crate::scene::lighting::LightFactory;
    use approx::assert_relative_eq;

    fn batch(capacity: u32) -> NodeContent {
        NodeContent::InstancedMesh {
            geometry: Geometry::Dodecahedron { radius: 0.3 },
            material: MaterialRef::Unique(Box::default()),
            capacity,
        }
    }

    #[test]
    fn test_depth_first_order() {
        let mut graph = SceneGraph::new();
        let a = graph.add_root("a", Pose::identity(), NodeContent::Group).unwrap();
        let b = graph.add_child(a, "b", Pose::identity(), NodeContent::Group).unwrap();
        let c = graph.add_child(b, "c", Pose::identity(), NodeContent::Group).unwrap();
        let d = graph.add_child(a, "d", Pose::identity(), NodeContent::Group).unwrap();
        let e = graph.add_root("e", Pose::identity(), NodeContent::Group).unwrap();

        assert_eq!(graph.depth_first(), vec![a, b, c, d, e]);
        assert_eq!(graph.children(a), &[b, d]);
        assert_eq!(graph.find("d"), Some(d));
        assert_eq!(graph.find("missing"), None);
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_world_transform_composes_hierarchy() {
        let mut graph = SceneGraph::new();
        let ring = graph
            .add_root("ring", Pose::at(8.0, 0.0, 2.0).with_rotation_y(HALF_PI), NodeContent::Group)
            .unwrap();
        let figure = graph
            .add_child(ring, "figure", Pose::at(0.0, 0.0, 5.0), NodeContent::Group)
            .unwrap();
        let head = graph
            .add_child(figure, "head", Pose::at(0.0, 1.3, 0.1), NodeContent::Group)
            .unwrap();

        let world = graph.world_transform(head).unwrap();
        // Ring yaw of 90 degrees swings local +Z onto +X
        assert_relative_eq!(world.position, Vec3::new(8.0 + 5.1, 1.3, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_world_transform_with_overrides() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", Pose::at(1.0, 0.0, 0.0), NodeContent::Group).unwrap();
        let child = graph.add_child(root, "child", Pose::identity(), NodeContent::Group).unwrap();

        let lifted = graph
            .world_transform_with(child, |id, node| {
                if id == child {
                    Pose::at(0.0, 2.0, 0.0)
                } else {
                    node.pose
                }
            })
            .unwrap();
        assert_relative_eq!(lifted.position, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_instances_need_a_batch_with_room() {
        let mut graph = SceneGraph::new();
        let group = graph.add_root("group", Pose::identity(), NodeContent::Group).unwrap();
        assert!(matches!(
            graph.add_child(group, "stray", Pose::identity(), NodeContent::Instance),
            Err(SceneError::InvalidInstanceParent { .. })
        ));

        let flames = graph.add_child(group, "flames", Pose::identity(), batch(2)).unwrap();
        graph.add_child(flames, "f0", Pose::identity(), NodeContent::Instance).unwrap();
        graph.add_child(flames, "f1", Pose::identity(), NodeContent::Instance).unwrap();
        assert!(matches!(
            graph.add_child(flames, "f2", Pose::identity(), NodeContent::Instance),
            Err(SceneError::InstanceCapacity { capacity: 2, .. })
        ));
        assert!(matches!(
            graph.add_child(flames, "mesh", Pose::identity(), NodeContent::Group),
            Err(SceneError::InvalidInstanceParent { .. })
        ));
    }

    #[test]
    fn test_unknown_parent() {
        let mut other = SceneGraph::new();
        let foreign = other.add_root("x", Pose::identity(), NodeContent::Group).unwrap();
        let mut graph = SceneGraph::new();
        assert!(matches!(
            graph.add_child(foreign, "y", Pose::identity(), NodeContent::Group),
            Err(SceneError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_lights_iterator() {
        let mut graph = SceneGraph::new();
        graph
            .add_root("glow", Pose::identity(), NodeContent::Light(LightFactory::point(Color::WHITE, 2.0, 10.0)))
            .unwrap();
        graph.add_root("empty", Pose::identity(), NodeContent::Group).unwrap();
        assert_eq!(graph.lights().count(), 1);
    }
}
