//! Per-pattern color palettes.
//!
//! Each [`Pattern`] owns four base colors. Particles pick one of them at
//! random and scale it by a random brightness factor, so a freshly built
//! field shimmers slightly instead of showing four flat tones.

use glam::Vec3;
use rand::Rng;

use crate::pattern::Pattern;

/// Lower bound of the per-particle brightness factor.
pub const VARIATION_MIN: f32 = 0.85;
/// Width of the brightness factor range, `[0.85, 1.15)`.
pub const VARIATION_SPAN: f32 = 0.3;

/// An ordered set of four base colors, stored as sRGB hex codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    hex: [u32; 4],
}

const SPHERE: Palette = Palette::from_hex([0x0077ff, 0x00aaff, 0x44ccff, 0x0055cc]);
const SPIRAL: Palette = Palette::from_hex([0x8800cc, 0xcc00ff, 0x660099, 0xaa33ff]);
const HELIX: Palette = Palette::from_hex([0x00cc66, 0x33ff99, 0x99ff66, 0x008844]);
const GRID: Palette = Palette::from_hex([0xff9900, 0xffcc33, 0xff6600, 0xffaa55]);
const TORUS: Palette = Palette::from_hex([0xff3399, 0xff66aa, 0xff0066, 0xcc0055]);

impl Palette {
    /// Number of base colors in every palette.
    pub const LEN: usize = 4;

    /// Build a palette from four `0xRRGGBB` sRGB codes.
    pub const fn from_hex(hex: [u32; 4]) -> Self {
        Self { hex }
    }

    /// The palette paired with `pattern`.
    pub fn for_pattern(pattern: Pattern) -> &'static Palette {
        match pattern {
            Pattern::Sphere => &SPHERE,
            Pattern::Spiral => &SPIRAL,
            Pattern::Helix => &HELIX,
            Pattern::Grid => &GRID,
            Pattern::Torus => &TORUS,
        }
    }

    /// Base color `i` in linear RGB.
    pub fn base_color(&self, i: usize) -> Vec3 {
        hex_to_linear(self.hex[i % Self::LEN])
    }

    /// All base colors in linear RGB.
    pub fn base_colors(&self) -> [Vec3; 4] {
        [0, 1, 2, 3].map(|i| self.base_color(i))
    }

    /// Pick a base color uniformly and scale it by a factor in `[0.85, 1.15)`.
    ///
    /// The result is not clamped; additive blending downstream tolerates
    /// channels slightly above 1.
    pub fn assign_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let base = self.base_color(rng.gen_range(0..Self::LEN));
        let variation = VARIATION_MIN + rng.gen::<f32>() * VARIATION_SPAN;
        base * variation
    }
}

/// Decode `0xRRGGBB` and convert each channel from sRGB to linear.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// sRGB transfer function inverse.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}
