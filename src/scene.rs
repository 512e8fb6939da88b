//! Per-tick simulation state.
//!
//! [`Scene`] holds everything that changes from frame to frame: elapsed
//! time, the particle field, the transition scheduler, the pointer, the
//! camera and the starfield roll. The window driver calls [`Scene::tick`]
//! once per redraw; tests and the headless runner call it directly.

use glam::{Vec2, Vec3};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::OrbitCamera;
use crate::config::Config;
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::pattern::Pattern;
use crate::pointer::PointerState;
use crate::starfield::Starfield;
use crate::transition::{TickOutcome, TransitionScheduler};

/// Emitted whenever a transition is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternChange {
    pub pattern: Pattern,
    pub name: &'static str,
}

/// What one tick produced, for the renderer and for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Seconds since the scene was created.
    pub elapsed: f64,
    /// Smoothed pointer position on the `z = 0` plane.
    pub pointer_world: Vec3,
    pub transition: TickOutcome,
}

/// Everything the renderer reads, advanced one frame at a time by [`Scene::tick`].
pub struct Scene {
    /// An f32 sum stops advancing at 60 Hz after about six days.
    elapsed: f64,
    field: ParticleField,
    scheduler: TransitionScheduler,
    pointer: PointerState,
    camera: OrbitCamera,
    starfield: Starfield,
    rng: StdRng,
}

impl Scene {
    /// Build the initial field and starfield from `config`.
    ///
    /// Fails if `config` does not pass [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = TransitionScheduler::new(config.transition_speed)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let field = ParticleField::new(config.particle_count, config.initial_pattern, &mut rng);
        let starfield = Starfield::new(config.star_count, &mut rng);
        let aspect = config.window_width as f32 / config.window_height.max(1) as f32;

        info!(
            "scene ready: {} particles, {} stars, starting with {}",
            field.len(),
            starfield.stars().len(),
            field.pattern()
        );

        Ok(Self {
            elapsed: 0.0,
            field,
            scheduler,
            pointer: PointerState::new(),
            camera: OrbitCamera::new(aspect),
            starfield,
            rng,
        })
    }

    /// Advance the simulation by `delta` seconds of real time.
    pub fn tick(&mut self, delta: f32) -> FrameOutput {
        self.elapsed += f64::from(delta);
        self.pointer.update(&self.camera);
        let transition = self.scheduler.tick(&mut self.field);
        self.camera.orbit(self.elapsed as f32);
        self.starfield.roll();

        FrameOutput {
            elapsed: self.elapsed,
            pointer_world: self.pointer.world(),
            transition,
        }
    }

    /// Start the transition to the next pattern in the cycle.
    pub fn trigger(&mut self) -> PatternChange {
        let pattern = self.scheduler.begin(&mut self.field, &mut self.rng);
        info!("pattern -> {}", pattern.name());
        PatternChange {
            pattern,
            name: pattern.name(),
        }
    }

    /// Record a pointer position in normalized device coordinates.
    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.pointer.set_screen(ndc);
    }

    /// Follow a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The committed pattern (the source while a transition runs).
    pub fn pattern(&self) -> Pattern {
        self.field.pattern()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }
}
