//! # Render Backend Abstraction
//!
//! The renderer is an external collaborator. It receives the assembled scene
//! once through [`RenderBackend::submit_scene`] and then one [`FrameUpdate`]
//! per frame carrying fresh poses and intensities. Tessellation, shading,
//! shadows, post-processing and camera input all live behind this trait.
//!
//! [`HeadlessBackend`] tracks node state without drawing anything, which is
//! enough to run and test the whole pipeline without a GPU.

mod frame;
mod headless;
pub mod packing;

pub use frame::{FrameUpdate, NodeUpdate};
pub use headless::{FrameStats, HeadlessBackend};

use thiserror::Error;

use crate::scene::{NodeId, SceneEnvironment, SceneGraph};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Errors raised by a render backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A frame arrived before any scene was submitted
    #[error("No scene submitted")]
    NoScene,

    /// An update targeted a node the backend does not know
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    /// An update carried a negative scale or intensity
    #[error("Negative {field} {value} for node '{node}'")]
    NegativeMagnitude {
        /// Node name
        node: String,
        /// Which value
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// An update set a property the node does not have
    #[error("Node '{node}' has no {field}")]
    MissingProperty {
        /// Node name
        node: String,
        /// Which value
        field: &'static str,
    },

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Output surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, `1.0` for a degenerate surface
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// # Render Backend Trait
///
/// Interface the frame driver talks to.
///
/// ## Implementation Notes
///
/// Backends should:
/// - Copy whatever they need from the graph at submission; the graph is not
///   handed over again
/// - Reject updates for nodes that were never submitted
/// - Treat every update as absolute, not as a delta
pub trait RenderBackend {
    /// Receive the scene topology and environment
    fn submit_scene(&mut self, graph: &SceneGraph, environment: &SceneEnvironment)
        -> BackendResult<()>;

    /// Apply one frame of node updates and present it
    fn apply_frame(&mut self, frame: &FrameUpdate) -> BackendResult<()>;

    /// Current output dimensions
    fn viewport(&self) -> Viewport;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn submit_scene(
        &mut self,
        graph: &SceneGraph,
        environment: &SceneEnvironment,
    ) -> BackendResult<()> {
        (**self).submit_scene(graph, environment)
    }

    fn apply_frame(&mut self, frame: &FrameUpdate) -> BackendResult<()> {
        (**self).apply_frame(frame)
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }
}
