//! Background stars.
//!
//! Stars sit uniformly on a large sphere around the scene. Most are pale
//! white, a fifth are blue and the rest warm yellow. Each carries a random
//! seed the shader uses for its twinkle speed and phase.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// Radius of the star sphere.
pub const STAR_RADIUS: f32 = 700.0;
/// Rotation about the Y axis added every tick.
pub const ROLL_PER_TICK: f32 = 0.0001;

/// One star as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Star {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Twinkle seed in `[0, 1)`.
    pub seed: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    rotation: f32,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Self {
        let stars = (0..count).map(|_| random_star(rng)).collect();
        Self {
            stars,
            rotation: 0.0,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Current rotation about the Y axis in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance the slow background roll by one tick.
    pub fn roll(&mut self) {
        self.rotation += ROLL_PER_TICK;
    }
}

fn random_star<R: Rng + ?Sized>(rng: &mut R) -> Star {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let position = Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    ) * STAR_RADIUS;

    let kind = rng.gen::<f32>();
    let color = if kind < 0.7 {
        hsl_to_rgb(0.0, 0.0, rng.gen::<f32>() * 0.2 + 0.7)
    } else if kind < 0.9 {
        hsl_to_rgb(0.6, 0.7, rng.gen::<f32>() * 0.2 + 0.6)
    } else {
        hsl_to_rgb(0.1, 0.7, rng.gen::<f32>() * 0.2 + 0.6)
    };

    Star {
        position: position.to_array(),
        color: color.to_array(),
        seed: rng.gen(),
    }
}

/// Convert hue/saturation/lightness (all in `[0, 1]`) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Vec3::new(
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
