//! Runtime configuration.
//!
//! ```ignore
//! let config = Config::new()
//!     .with_particle_count(50_000)
//!     .with_transition_speed(0.01)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use crate::pattern::Pattern;
use crate::transition::DEFAULT_SPEED;

/// Bloom post-process parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomConfig {
    /// How much of the blurred highlights is added back.
    pub strength: f32,
    /// Blur radius as a fraction of the kernel reach.
    pub radius: f32,
    /// Luminance above which pixels contribute to the glow.
    pub threshold: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: 0.45,
            radius: 0.3,
            threshold: 0.85,
        }
    }
}

/// Everything the visualizer can be tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub particle_count: u32,
    pub star_count: u32,
    /// Linear progress added per tick during a transition.
    pub transition_speed: f32,
    pub initial_pattern: Pattern,
    /// RNG seed; `None` seeds from system entropy.
    pub seed: Option<u64>,
    pub window_width: u32,
    pub window_height: u32,
    pub bloom: BloomConfig,
}

impl Config {
    pub fn new() -> Self {
        Self {
            particle_count: 25_000,
            star_count: 6_000,
            transition_speed: DEFAULT_SPEED,
            initial_pattern: Pattern::Sphere,
            seed: None,
            window_width: 1280,
            window_height: 720,
            bloom: BloomConfig::default(),
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the number of background stars.
    pub fn with_star_count(mut self, count: u32) -> Self {
        self.star_count = count;
        self
    }

    /// Set the per-tick progress step of transitions.
    pub fn with_transition_speed(mut self, speed: f32) -> Self {
        self.transition_speed = speed;
        self
    }

    /// Set the pattern shown at startup.
    pub fn with_initial_pattern(mut self, pattern: Pattern) -> Self {
        self.initial_pattern = pattern;
        self
    }

    /// Seed all randomness for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_bloom(mut self, bloom: BloomConfig) -> Self {
        self.bloom = bloom;
        self
    }

    /// Ticks a transition takes at the configured speed.
    pub fn transition_ticks(&self) -> u32 {
        (1.0 / self.transition_speed).ceil() as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        if !self.transition_speed.is_finite() || self.transition_speed <= 0.0 {
            return Err(ConfigError::InvalidTransitionSpeed(self.transition_speed));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }
        let bloom = [
            ("bloom strength", self.bloom.strength),
            ("bloom radius", self.bloom.radius),
            ("bloom threshold", self.bloom.threshold),
        ];
        for (name, value) in bloom {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidBloom { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
