//! Scene graph assembly
//!
//! The scene is a retained tree of nodes built once from a [`SceneConfig`]:
//! groups carry transforms, meshes reference shared or unique materials,
//! instanced batches hold flame particles, and lights hang off the groups
//! they belong to. Animated nodes are registered with an
//! [`AnimationBinding`]; the frame driver evaluates those and never touches
//! the graph topology.
//!
//! [`SceneConfig`]: crate::config::SceneConfig

mod assembly;
mod binding;
mod environment;
mod geometry;
mod lighting;
mod scene_graph;

pub use assembly::{HolidayScene, SceneHandles};
pub use binding::{AnimationBinding, Animator};
pub use environment::{
    AmbientSettings, BloomSettings, CameraSettings, CanvasSettings, EnvironmentMap, FogSettings,
    MoonSettings, OrbitControls, PostProcessing, SceneEnvironment, ToneMappingSettings,
    VignetteSettings,
};
pub use geometry::Geometry;
pub use lighting::{LightComponent, LightFactory, LightType};
pub use scene_graph::{MaterialRef, NodeContent, NodeId, Pose, SceneGraph, SceneNode, ShadowFlags};

use thiserror::Error;

use crate::animation::AnimationError;
use crate::config::ConfigError;
use crate::layout::LayoutError;
use crate::materials::MaterialError;

/// Scene construction errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Node id does not belong to this graph
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Instances may only live directly under an instanced batch, and a batch
    /// holds nothing else
    #[error("node '{name}' does not fit its parent: instances belong under instanced batches only")]
    InvalidInstanceParent {
        /// Rejected node
        name: String,
    },

    /// Instanced batch is full
    #[error("instanced batch '{batch}' is full ({capacity} instances)")]
    InstanceCapacity {
        /// Batch name
        batch: String,
        /// Its capacity
        capacity: u32,
    },

    /// Material preset missing
    #[error(transparent)]
    Material(#[from] MaterialError),

    /// Layout generation failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Animation parameters rejected
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}
