//! Procedural point-cloud layouts.
//!
//! Every pattern maps a particle index and the total particle count to a
//! position in world space. The layouts are sized to fit roughly inside a
//! sphere of radius 40 around the origin.
//!
//! # Example
//!
//! ```ignore
//! use nebula::pattern::Pattern;
//!
//! let mut rng = rand::thread_rng();
//! let p = Pattern::Helix.generate(42, 25_000, &mut rng);
//! assert!(p.is_finite());
//! ```

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use rand::Rng;

use crate::palette::Palette;

/// One of the five target geometries of the particle cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pattern {
    /// Fibonacci-style lattice over a sphere of radius 30.
    #[default]
    Sphere,
    /// Three arms winding outward to radius 40 with a gentle vertical wave.
    Spiral,
    /// Two interleaved strands of radius 15 from z = -30 to z = +30.
    Helix,
    /// Cubic lattice 60 units across.
    Grid,
    /// Randomly sampled torus, major radius 30, minor radius 10.
    Torus,
}

impl Pattern {
    /// Number of patterns in the cycle.
    pub const COUNT: usize = 5;

    /// All patterns in cycle order.
    pub const ALL: [Pattern; Self::COUNT] = [
        Pattern::Sphere,
        Pattern::Spiral,
        Pattern::Helix,
        Pattern::Grid,
        Pattern::Torus,
    ];

    /// Position of this pattern in the cycle.
    pub fn index(self) -> usize {
        match self {
            Pattern::Sphere => 0,
            Pattern::Spiral => 1,
            Pattern::Helix => 2,
            Pattern::Grid => 3,
            Pattern::Torus => 4,
        }
    }

    /// Pattern at `index`, wrapping around the cycle.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// The pattern that follows this one. Cycling is strict: Torus wraps to Sphere.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Human-readable name shown when the pattern becomes active.
    pub fn name(self) -> &'static str {
        match self {
            Pattern::Sphere => "Cosmic Sphere",
            Pattern::Spiral => "Spiral Nebula",
            Pattern::Helix => "Quantum Helix",
            Pattern::Grid => "Stardust Grid",
            Pattern::Torus => "Celestial Torus",
        }
    }

    /// The color palette paired with this pattern.
    pub fn palette(self) -> &'static Palette {
        Palette::for_pattern(self)
    }

    /// Whether two calls with the same arguments always return the same position.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Pattern::Torus)
    }

    /// Position of particle `index` out of `total`.
    ///
    /// `rng` is only consumed by [`Pattern::Torus`], which re-samples both of
    /// its angles on every call.
    pub fn generate<R: Rng + ?Sized>(self, index: u32, total: u32, rng: &mut R) -> Vec3 {
        match self {
            Pattern::Sphere => sphere(index, total),
            Pattern::Spiral => spiral(index, total),
            Pattern::Helix => helix(index, total),
            Pattern::Grid => grid(index, total),
            Pattern::Torus => torus(rng),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" => Ok(Pattern::Sphere),
            "spiral" => Ok(Pattern::Spiral),
            "helix" => Ok(Pattern::Helix),
            "grid" => Ok(Pattern::Grid),
            "torus" => Ok(Pattern::Torus),
            other => Err(format!(
                "unknown pattern '{}' (expected sphere, spiral, helix, grid or torus)",
                other
            )),
        }
    }
}

const SPHERE_RADIUS: f32 = 30.0;

fn sphere(i: u32, count: u32) -> Vec3 {
    let t = i as f32 / count as f32;
    let phi = (2.0 * t - 1.0).acos();
    // sqrt(count) turns of azimuth keep neighbouring indices from banding
    let theta = TAU * t * (count as f32).sqrt();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    ) * SPHERE_RADIUS
}

const SPIRAL_ARMS: u32 = 3;
const SPIRAL_RADIUS: f32 = 40.0;

fn spiral(i: u32, count: u32) -> Vec3 {
    let t = i as f32 / count as f32;
    let arm = i % SPIRAL_ARMS;
    let angle_offset = (TAU / SPIRAL_ARMS as f32) * arm as f32;
    let angle = t.powf(0.7) * 15.0 + angle_offset;
    let radius = t * SPIRAL_RADIUS;
    let height = (t * TAU).sin() * 5.0;
    Vec3::new(angle.cos() * radius, angle.sin() * radius, height)
}

const HELIX_STRANDS: u32 = 2;
const HELIX_RADIUS: f32 = 15.0;

fn helix(i: u32, count: u32) -> Vec3 {
    let strand = i % HELIX_STRANDS;
    // a single particle has no strand length to walk along
    let strand_len = (count / HELIX_STRANDS).max(1);
    let t = (i / HELIX_STRANDS) as f32 / strand_len as f32;
    let angle = t * PI * 10.0 + strand as f32 * PI;
    let height = (t - 0.5) * 60.0;
    Vec3::new(angle.cos() * HELIX_RADIUS, angle.sin() * HELIX_RADIUS, height)
}

const GRID_EXTENT: f32 = 60.0;

/// Side length of the cubic lattice holding `count` particles, i.e. the
/// ceiling of its cube root. Computed on integers so exact cubes stay exact.
pub(crate) fn grid_side(count: u32) -> u32 {
    let count = count.max(1) as u64;
    let mut side = (count as f64).cbrt().floor().max(1.0) as u64;
    while side * side * side < count {
        side += 1;
    }
    while side > 1 && (side - 1).pow(3) >= count {
        side -= 1;
    }
    side as u32
}

/// Raw lattice position, without the center-cell nudge.
pub(crate) fn grid_lattice(i: u32, count: u32) -> Vec3 {
    let side = grid_side(count);
    let spacing = GRID_EXTENT / side as f32;
    let half = (side - 1) as f32 * spacing / 2.0;
    let (ix, iy, iz) = grid_cell(i, side);
    Vec3::new(ix as f32, iy as f32, iz as f32) * spacing - Vec3::splat(half)
}

fn grid_cell(i: u32, side: u32) -> (u32, u32, u32) {
    let layer = side * side;
    (i % side, (i % layer) / side, i / layer)
}

fn grid(i: u32, count: u32) -> Vec3 {
    let side = grid_side(count);
    let spacing = GRID_EXTENT / side as f32;
    let (ix, iy, iz) = grid_cell(i, side);
    let mid = side / 2;
    if side % 2 == 1 && ix == mid && iy == mid && iz == mid {
        // odd lattices put a cell exactly on the origin
        return Vec3::splat(spacing * 0.1);
    }
    grid_lattice(i, count)
}

const TORUS_MAJOR: f32 = 30.0;
const TORUS_MINOR: f32 = 10.0;

fn torus<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let a1 = rng.gen::<f32>() * TAU;
    let a2 = rng.gen::<f32>() * TAU;
    let ring = TORUS_MAJOR + TORUS_MINOR * a2.cos();
    Vec3::new(ring * a1.cos(), ring * a1.sin(), TORUS_MINOR * a2.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_cycle_order() {
        assert_eq!(Pattern::Sphere.next(), Pattern::Spiral);
        assert_eq!(Pattern::Spiral.next(), Pattern::Helix);
        assert_eq!(Pattern::Helix.next(), Pattern::Grid);
        assert_eq!(Pattern::Grid.next(), Pattern::Torus);
        assert_eq!(Pattern::Torus.next(), Pattern::Sphere);
    }

    #[test]
    fn test_index_round_trip() {
        for (i, p) in Pattern::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(Pattern::from_index(i), *p);
        }
        assert_eq!(Pattern::from_index(7), Pattern::Helix);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Torus".parse::<Pattern>(), Ok(Pattern::Torus));
        assert_eq!("grid".parse::<Pattern>(), Ok(Pattern::Grid));
        assert!("cube".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_sphere_radius() {
        let mut rng = rng();
        for i in (0..1000).step_by(37) {
            let p = Pattern::Sphere.generate(i, 1000, &mut rng);
            assert!((p.length() - 30.0).abs() < 1e-3, "index {} at {}", i, p.length());
        }
    }

    #[test]
    fn test_spiral_arms_and_radius() {
        let mut rng = rng();
        let first = Pattern::Spiral.generate(0, 3000, &mut rng);
        assert_eq!(first, Vec3::ZERO);

        let last = Pattern::Spiral.generate(2999, 3000, &mut rng);
        let planar = Vec3::new(last.x, last.y, 0.0).length();
        assert!(planar < 40.0 && planar > 39.9);
        assert!(last.z.abs() <= 5.0);
    }

    #[test]
    fn test_helix_strands_are_opposite() {
        let mut rng = rng();
        let a = Pattern::Helix.generate(100, 1000, &mut rng);
        let b = Pattern::Helix.generate(101, 1000, &mut rng);
        // same height, mirrored through the axis
        assert!((a.z - b.z).abs() < 1e-5);
        assert!((a.x + b.x).abs() < 1e-3);
        assert!((a.y + b.y).abs() < 1e-3);
        assert!((Vec3::new(a.x, a.y, 0.0).length() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_helix_height_span() {
        let mut rng = rng();
        let bottom = Pattern::Helix.generate(0, 1000, &mut rng);
        let top = Pattern::Helix.generate(999, 1000, &mut rng);
        assert!((bottom.z + 30.0).abs() < 1e-4);
        assert!(top.z > 29.0 && top.z <= 30.0);
    }

    #[test]
    fn test_helix_single_particle_is_finite() {
        let p = Pattern::Helix.generate(0, 1, &mut rng());
        assert!(p.is_finite());
    }

    #[test]
    fn test_grid_side() {
        assert_eq!(grid_side(1), 1);
        assert_eq!(grid_side(27), 3);
        assert_eq!(grid_side(28), 4);
        assert_eq!(grid_side(25_000), 30);
    }

    #[test]
    fn test_grid_odd_center_is_nudged() {
        // 3x3x3: index 13 is the center cell at (1, 1, 1)
        let lattice = grid_lattice(13, 27);
        let nudged = Pattern::Grid.generate(13, 27, &mut rng());
        assert_eq!(lattice, Vec3::ZERO);
        assert_ne!(nudged, lattice);
        assert!((nudged - Vec3::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_grid_even_side_has_no_nudge() {
        let mut rng = rng();
        for i in 0..64 {
            assert_eq!(Pattern::Grid.generate(i, 64, &mut rng), grid_lattice(i, 64));
        }
    }

    #[test]
    fn test_grid_corners() {
        let mut rng = rng();
        let first = Pattern::Grid.generate(0, 27, &mut rng);
        let last = Pattern::Grid.generate(26, 27, &mut rng);
        assert!((first - Vec3::splat(-20.0)).length() < 1e-4);
        assert!((last - Vec3::splat(20.0)).length() < 1e-4);
    }

    #[test]
    fn test_torus_stays_on_surface() {
        let mut rng = rng();
        for i in 0..200 {
            let p = Pattern::Torus.generate(i, 200, &mut rng);
            let ring = Vec3::new(p.x, p.y, 0.0).length() - 30.0;
            let tube = (ring * ring + p.z * p.z).sqrt();
            assert!((tube - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_torus_resamples_every_call() {
        let mut rng = rng();
        let a = Pattern::Torus.generate(5, 100, &mut rng);
        let b = Pattern::Torus.generate(5, 100, &mut rng);
        assert_ne!(a, b);
        assert!(!Pattern::Torus.is_deterministic());
    }

    #[test]
    fn test_deterministic_patterns_repeat() {
        for pattern in Pattern::ALL.into_iter().filter(|p| p.is_deterministic()) {
            let a = pattern.generate(123, 500, &mut StdRng::seed_from_u64(1));
            let b = pattern.generate(123, 500, &mut StdRng::seed_from_u64(2));
            assert_eq!(a, b, "{:?} should not depend on the rng", pattern);
        }
    }

    proptest! {
        #[test]
        fn prop_positions_are_finite(
            pattern in 0usize..Pattern::COUNT,
            total in 1u32..40_000,
            frac in 0.0f64..1.0,
            seed in any::<u64>(),
        ) {
            let index = ((total as f64 * frac) as u32).min(total - 1);
            let mut rng = StdRng::seed_from_u64(seed);
            let p = Pattern::from_index(pattern).generate(index, total, &mut rng);
            prop_assert!(p.is_finite(), "{:?} {}/{} -> {:?}", Pattern::from_index(pattern), index, total, p);
        }
    }
}
