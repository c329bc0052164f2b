//! Frame driver
//!
//! Owns the assembled scene and a render backend. Each tick evaluates every
//! animation binding at the frame's elapsed time and hands the result to the
//! backend as one [`FrameUpdate`].

use rand::Rng;
use thiserror::Error;

use crate::backend::{FrameUpdate, RenderBackend, RenderError};
use crate::config::{ConfigError, SceneConfig};
use crate::foundation::time::Clock;
use crate::scene::{HolidayScene, SceneError};

/// Frame driver errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene assembly failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The backend rejected the scene or a frame
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration could not be loaded or was invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Elapsed time decreased between frames
    #[error("Time went backwards: {current}s after {previous}s")]
    TimeWentBackwards {
        /// Time of the previous frame
        previous: f32,
        /// Time that was requested
        current: f32,
    },

    /// Elapsed time was NaN or infinite
    #[error("Non-finite frame time {0}")]
    NonFiniteTime(f32),
}

/// Outcome of [`Engine::run`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames rendered by this run
    pub frames: u64,
    /// Elapsed scene time of the first frame
    pub start_time: f32,
    /// Elapsed scene time of the last frame
    pub end_time: f32,
}

/// Drives a scene into a backend frame by frame
pub struct Engine<B: RenderBackend> {
    scene: HolidayScene,
    backend: B,
    frames_rendered: u64,
    last_time: Option<f32>,
}

impl<B: RenderBackend> Engine<B> {
    /// Submit the scene to the backend and get ready to tick
    pub fn new(scene: HolidayScene, mut backend: B) -> Result<Self, EngineError> {
        let viewport = backend.viewport();
        log::info!(
            "Initializing engine: {} nodes, {} bindings, viewport {}x{}",
            scene.graph().len(),
            scene.bindings().len(),
            viewport.width,
            viewport.height
        );
        backend.submit_scene(scene.graph(), scene.environment())?;

        Ok(Self {
            scene,
            backend,
            frames_rendered: 0,
            last_time: None,
        })
    }

    /// Assemble the scene from a configuration, then submit it
    pub fn from_config<R: Rng + ?Sized>(
        config: &SceneConfig,
        rng: &mut R,
        backend: B,
    ) -> Result<Self, EngineError> {
        let scene = HolidayScene::build(config, rng)?;
        Self::new(scene, backend)
    }

    /// Evaluate every binding at `t` without presenting anything
    ///
    /// Updates keep binding registration order and have their magnitudes
    /// clamped at zero.
    pub fn evaluate(&self, t: f32) -> FrameUpdate {
        let mut frame = FrameUpdate::new(self.frames_rendered, t);
        frame.updates = self
            .scene
            .bindings()
            .iter()
            .map(|binding| {
                let mut update = binding.evaluate(t);
                update.clamp_magnitudes();
                update
            })
            .collect();
        frame
    }

    /// Render one frame at elapsed time `t`
    pub fn tick(&mut self, t: f32) -> Result<FrameUpdate, EngineError> {
        if !t.is_finite() {
            return Err(EngineError::NonFiniteTime(t));
        }
        if let Some(previous) = self.last_time {
            if t < previous {
                return Err(EngineError::TimeWentBackwards {
                    previous,
                    current: t,
                });
            }
        }

        let frame = self.evaluate(t);
        self.backend.apply_frame(&frame)?;
        log::trace!("Rendered frame {} at {:.3}s", frame.frame, t);

        self.frames_rendered += 1;
        self.last_time = Some(t);
        Ok(frame)
    }

    /// Render `frames` frames with times taken from `clock`
    pub fn run<C: Clock + ?Sized>(
        &mut self,
        clock: &mut C,
        frames: u64,
    ) -> Result<RunSummary, EngineError> {
        log::info!("Starting main loop for {} frames...", frames);

        let mut summary = RunSummary {
            frames: 0,
            start_time: 0.0,
            end_time: 0.0,
        };
        for index in 0..frames {
            let t = clock.tick();
            self.tick(t)?;
            if index == 0 {
                summary.start_time = t;
            }
            summary.end_time = t;
            summary.frames += 1;
        }

        log::info!(
            "Rendered {} frames covering {:.2}s of scene time",
            summary.frames,
            summary.end_time - summary.start_time
        );
        Ok(summary)
    }

    /// The driven scene
    pub fn scene(&self) -> &HolidayScene {
        &self.scene
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Elapsed time of the last rendered frame
    pub fn last_time(&self) -> Option<f32> {
        self.last_time
    }
}
