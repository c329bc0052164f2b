//! # Yuletide Engine
//!
//! Procedural layout and per-frame animation for an animated holiday scene: a
//! decorated tree, a campfire with rising flames and a flickering light, and a
//! ring of dancing cats orbiting the fire.
//!
//! ## Features
//!
//! - **Pure Animators**: Every animated value is a function of elapsed time
//!   and a per-instance phase
//! - **Procedural Layout**: Seedable decoration and ring placement
//! - **Retained Scene Graph**: Slot-map arena with shared materials
//! - **Backend Abstraction**: The renderer sits behind [`backend::RenderBackend`];
//!   a headless implementation runs the pipeline without a GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yuletide_engine::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::default();
//!     let mut rng = StdRng::seed_from_u64(2025);
//!     let mut engine = Engine::from_config(&config, &mut rng, HeadlessBackend::new())?;
//!
//!     let mut clock = FixedStepClock::from_fps(60.0);
//!     engine.run(&mut clock, 600)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::neg_cmp_op_on_partial_ord
)]

pub mod animation;
pub mod backend;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod materials;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError, RunSummary};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimatedInstance, AnimationError},
        backend::{FrameUpdate, HeadlessBackend, NodeUpdate, RenderBackend, RenderError, Viewport},
        config::{Config, ConfigError, SceneConfig},
        foundation::{
            color::Color,
            math::{Transform, Vec3},
            time::{Clock, FixedStepClock, RealTimeClock},
        },
        layout::{DecorationDescriptor, LayoutError, RingSlot},
        materials::{Material, MaterialRegistry},
        scene::{HolidayScene, NodeId, SceneEnvironment, SceneError, SceneGraph},
        Engine, EngineError, RunSummary,
    };
}
