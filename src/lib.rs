//! # Nebula
//!
//! A cloud of GPU particles that morphs between five geometric patterns.
//!
//! Each trigger (a click or a touch) moves the cloud on to the next pattern in
//! a fixed cycle: Sphere, Spiral, Helix, Grid, Torus, then back to Sphere.
//! Positions and colors blend along a cubic ease-in-out curve while the camera
//! slowly orbits and a starfield rolls in the background.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nebula::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     nebula::run(
//!         Config::new()
//!             .with_particle_count(25_000)
//!             .with_seed(7),
//!     )
//! }
//! ```
//!
//! ## Without a window
//!
//! [`Scene`] owns all per-frame state and can be driven directly:
//!
//! ```
//! use nebula::prelude::*;
//!
//! let mut scene = Scene::new(&Config::new().with_particle_count(1_000).with_seed(1))?;
//! let change = scene.trigger();
//! assert_eq!(change.pattern, Pattern::Spiral);
//!
//! while scene.scheduler().is_active() {
//!     scene.tick(1.0 / 60.0);
//! }
//! assert_eq!(scene.pattern(), Pattern::Spiral);
//! # Ok::<(), ConfigError>(())
//! ```
//!
//! ## Transitions
//!
//! A transition snapshots the live field, generates the target pattern and then
//! advances a linear progress value by a fixed step every tick. The blend factor
//! is `ease_in_out_cubic(progress)`. Triggering again while a transition is
//! running first jumps the running one to its end, so the cycle never skips a
//! pattern.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod palette;
pub mod pattern;
pub mod pointer;
pub mod scene;
pub mod shader;
pub mod starfield;
pub mod time;
pub mod transition;

pub use app::run;
pub use camera::OrbitCamera;
pub use config::{BloomConfig, Config};
pub use error::{AppError, ConfigError, GpuError, TransitionError};
pub use field::{ParticleField, Snapshot};
pub use glam::{Vec2, Vec3};
pub use palette::Palette;
pub use pattern::Pattern;
pub use scene::{FrameOutput, PatternChange, Scene};
pub use transition::{ease_in_out_cubic, TickOutcome, TransitionScheduler};

/// Common imports.
pub mod prelude {
    pub use crate::camera::OrbitCamera;
    pub use crate::config::{BloomConfig, Config};
    pub use crate::error::{AppError, ConfigError, TransitionError};
    pub use crate::field::{ParticleField, Snapshot};
    pub use crate::palette::Palette;
    pub use crate::pattern::Pattern;
    pub use crate::pointer::PointerState;
    pub use crate::scene::{FrameOutput, PatternChange, Scene};
    pub use crate::starfield::Starfield;
    pub use crate::time::FrameClock;
    pub use crate::transition::{ease_in_out_cubic, TickOutcome, TransitionScheduler};
    pub use crate::{Vec2, Vec3};
}
