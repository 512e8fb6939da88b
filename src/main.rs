use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use nebula::config::Config;
use nebula::pattern::Pattern;
use nebula::scene::Scene;
use nebula::time::FrameClock;
use nebula::transition::TickOutcome;

/// Morphing GPU particle cloud. Click or tap to move on to the next pattern.
#[derive(Parser, Debug)]
#[command(name = "nebula", version, about)]
struct Args {
    /// Number of particles
    #[arg(long, default_value_t = 25_000)]
    particles: u32,

    /// Number of background stars
    #[arg(long, default_value_t = 6_000)]
    stars: u32,

    /// Transition progress added per frame
    #[arg(long, default_value_t = nebula::transition::DEFAULT_SPEED)]
    speed: f32,

    /// Pattern shown at startup (sphere, spiral, helix, grid, torus)
    #[arg(long, default_value = "sphere")]
    pattern: Pattern,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Run the simulation without opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Trigger a transition every N frames in headless mode (0 disables)
    #[arg(long, default_value_t = 120)]
    trigger_every: u64,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .with_particle_count(self.particles)
            .with_star_count(self.stars)
            .with_transition_speed(self.speed)
            .with_initial_pattern(self.pattern)
            .with_window_size(self.width, self.height);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("naga", log::LevelFilter::Warn)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .init();

    let args = Args::parse();
    let config = args.config();

    let result = if args.headless {
        run_headless(&config, args.frames, args.trigger_every).map_err(nebula::AppError::from)
    } else {
        nebula::run(config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Drive the scene at a fixed 60 Hz step and log what happens.
fn run_headless(config: &Config, frames: u64, trigger_every: u64) -> Result<(), nebula::ConfigError> {
    let mut scene = Scene::new(config)?;
    let mut clock = FrameClock::fixed(1.0 / 60.0);

    for frame in 1..=frames {
        if trigger_every > 0 && frame % trigger_every == 0 {
            scene.trigger();
        }
        let delta = clock.tick();
        let output = scene.tick(delta);
        if let TickOutcome::Completed { pattern, .. } = output.transition {
            info!("frame {frame}: settled on {}", pattern.name());
        }
    }

    info!(
        "headless run done: {} frames, {:.2}s simulated, showing {}",
        frames,
        scene.elapsed(),
        scene.pattern()
    );
    Ok(())
}
