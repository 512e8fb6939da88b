//! Live particle buffers.
//!
//! [`ParticleField`] owns the per-particle data the renderer draws from:
//! positions and colors (rewritten by transitions), plus sizes and render
//! types that are fixed when the field is created. [`Snapshot`] is an
//! immutable copy of positions and colors at one instant.

use glam::Vec3;
use log::warn;
use rand::Rng;

use crate::error::TransitionError;
use crate::pattern::Pattern;

/// Number of distinct render types (core glow, ring, pulse).
pub const RENDER_TYPES: u32 = 3;

/// Smallest per-particle size.
pub const SIZE_MIN: f32 = 1.0;
/// Width of the per-particle size range, `[1.0, 2.5)`.
pub const SIZE_SPAN: f32 = 1.5;

/// Which live buffers changed since the renderer last uploaded them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadFlags {
    pub positions: bool,
    pub colors: bool,
}

impl UploadFlags {
    pub fn any(&self) -> bool {
        self.positions || self.colors
    }
}

/// Immutable copy of every particle's position and color.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl Snapshot {
    pub(crate) fn from_parts(positions: Vec<Vec3>, colors: Vec<Vec3>) -> Self {
        Self { positions, colors }
    }

    /// Generate a complete layout for `pattern`, one palette color per particle.
    pub fn generate<R: Rng + ?Sized>(pattern: Pattern, count: u32, rng: &mut R) -> Self {
        let positions = (0..count).map(|i| pattern.generate(i, count, rng)).collect();
        let palette = pattern.palette();
        let colors = (0..count).map(|_| palette.assign_color(rng)).collect();
        Self { positions, colors }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `[r, g, b, r, g, b, ...]` slice.
    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// The particle cloud as it is on screen right now.
#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    sizes: Vec<f32>,
    render_types: Vec<u32>,
    pattern: Pattern,
    upload: UploadFlags,
}

impl ParticleField {
    /// Build a field of `count` particles laid out as `pattern`.
    ///
    /// Sizes and render types are drawn here once and never change.
    pub fn new<R: Rng + ?Sized>(count: u32, pattern: Pattern, rng: &mut R) -> Self {
        let mut field = Self {
            positions: vec![Vec3::ZERO; count as usize],
            colors: vec![Vec3::ZERO; count as usize],
            sizes: Vec::with_capacity(count as usize),
            render_types: Vec::with_capacity(count as usize),
            pattern,
            upload: UploadFlags::default(),
        };

        for _ in 0..count {
            field.render_types.push(rng.gen_range(0..RENDER_TYPES));
            field.sizes.push(SIZE_MIN + rng.gen::<f32>() * SIZE_SPAN);
        }

        field.initialize(pattern, rng);
        field
    }

    /// Overwrite every position and color from `pattern` and its palette.
    pub fn initialize<R: Rng + ?Sized>(&mut self, pattern: Pattern, rng: &mut R) {
        let snapshot = Snapshot::generate(pattern, self.len() as u32, rng);
        self.commit(snapshot, pattern);
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The most recently committed pattern.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Colors exactly as displayed. Mid-transition these are a blend of two
    /// palettes, not either palette's assignment.
    pub fn current_colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn render_types(&self) -> &[u32] {
        &self.render_types
    }

    /// Copy the live positions and displayed colors.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            positions: self.positions.clone(),
            colors: self.colors.clone(),
        }
    }

    /// Replace the live buffers with `snapshot` and record `pattern` as active.
    ///
    /// The particle count never changes: a snapshot of the wrong length only
    /// overwrites the particles both have in common.
    pub fn commit(&mut self, snapshot: Snapshot, pattern: Pattern) {
        let live = self.len();
        if snapshot.positions.len() == live && snapshot.colors.len() == live {
            self.positions = snapshot.positions;
            self.colors = snapshot.colors;
        } else {
            warn!(
                "committing a {}-particle snapshot into a {}-particle field",
                snapshot.positions.len(),
                live
            );
            let n = snapshot.positions.len().min(live);
            self.positions[..n].copy_from_slice(&snapshot.positions[..n]);
            let n = snapshot.colors.len().min(live);
            self.colors[..n].copy_from_slice(&snapshot.colors[..n]);
        }
        self.pattern = pattern;
        self.upload = UploadFlags {
            positions: true,
            colors: true,
        };
    }

    /// Write `from * (1 - factor) + to * factor` into the live buffers.
    ///
    /// Nothing is written if either snapshot does not match the field length.
    pub fn blend(&mut self, from: &Snapshot, to: &Snapshot, factor: f32) -> Result<(), TransitionError> {
        self.check_lengths(from, to)?;

        let keep = 1.0 - factor;
        let lerp = |a: Vec3, b: Vec3| {
            Vec3::new(
                a.x * keep + b.x * factor,
                a.y * keep + b.y * factor,
                a.z * keep + b.z * factor,
            )
        };

        for (i, out) in self.positions.iter_mut().enumerate() {
            *out = lerp(from.positions[i], to.positions[i]);
        }
        for (i, out) in self.colors.iter_mut().enumerate() {
            *out = lerp(from.colors[i], to.colors[i]);
        }

        self.upload.positions = true;
        self.upload.colors = true;
        Ok(())
    }

    fn check_lengths(&self, from: &Snapshot, to: &Snapshot) -> Result<(), TransitionError> {
        let live = self.len();
        let lengths = [
            from.positions.len(),
            to.positions.len(),
            from.colors.len(),
            to.colors.len(),
        ];
        if lengths.iter().any(|&n| n != live) || self.colors.len() != live {
            return Err(TransitionError::LengthMismatch {
                live: live * 3,
                from: from.positions.len() * 3,
                to: to.positions.len() * 3,
            });
        }
        Ok(())
    }

    /// Return the pending upload flags and clear them.
    pub fn take_upload_flags(&mut self) -> UploadFlags {
        std::mem::take(&mut self.upload)
    }

    /// Pending upload flags, without clearing.
    pub fn upload_flags(&self) -> UploadFlags {
        self.upload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(count: u32) -> ParticleField {
        ParticleField::new(count, Pattern::Sphere, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_new_field_layout() {
        let field = field(1000);
        assert_eq!(field.len(), 1000);
        assert_eq!(field.pattern(), Pattern::Sphere);
        assert_eq!(field.sizes().len(), 1000);
        assert_eq!(field.render_types().len(), 1000);
        assert!(field.render_types().iter().all(|t| *t < RENDER_TYPES));
        assert!(field
            .sizes()
            .iter()
            .all(|s| (SIZE_MIN..SIZE_MIN + SIZE_SPAN).contains(s)));

        let mut rng = StdRng::seed_from_u64(0);
        for (i, p) in field.positions().iter().enumerate() {
            assert_eq!(*p, Pattern::Sphere.generate(i as u32, 1000, &mut rng));
        }
    }

    #[test]
    fn test_new_field_needs_upload() {
        let mut field = field(10);
        assert!(field.upload_flags().any());
        let flags = field.take_upload_flags();
        assert!(flags.positions && flags.colors);
        assert!(!field.take_upload_flags().any());
    }

    #[test]
    fn test_snapshot_is_exact_copy() {
        let field = field(64);
        let snap = field.snapshot();
        assert_eq!(snap.positions(), field.positions());
        assert_eq!(snap.colors(), field.current_colors());
        assert_eq!(snap.position_floats().len(), 64 * 3);
        assert_eq!(snap.color_floats().len(), 64 * 3);
    }

    #[test]
    fn test_commit_replaces_buffers_and_pattern() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = field(100);
        let sizes = field.sizes().to_vec();
        let types = field.render_types().to_vec();
        field.take_upload_flags();

        let target = Snapshot::generate(Pattern::Grid, 100, &mut rng);
        field.commit(target.clone(), Pattern::Grid);

        assert_eq!(field.pattern(), Pattern::Grid);
        assert_eq!(field.positions(), target.positions());
        assert_eq!(field.current_colors(), target.colors());
        assert_eq!(field.sizes(), sizes.as_slice());
        assert_eq!(field.render_types(), types.as_slice());
        assert!(field.upload_flags().positions && field.upload_flags().colors);
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let from = Snapshot::from_parts(vec![Vec3::ZERO; 2], vec![Vec3::ONE; 2]);
        let to = Snapshot::from_parts(vec![Vec3::splat(10.0); 2], vec![Vec3::ZERO; 2]);
        let mut field = field(2);

        field.blend(&from, &to, 0.0).unwrap();
        assert_eq!(field.positions(), from.positions());
        assert_eq!(field.current_colors(), from.colors());

        field.blend(&from, &to, 0.5).unwrap();
        assert_eq!(field.positions()[0], Vec3::splat(5.0));
        assert_eq!(field.current_colors()[1], Vec3::splat(0.5));

        field.blend(&from, &to, 1.0).unwrap();
        assert_eq!(field.positions(), to.positions());
    }

    #[test]
    fn test_blend_rejects_mismatched_snapshots() {
        let mut field = field(4);
        let before = field.snapshot();
        let short = Snapshot::from_parts(vec![Vec3::ONE; 3], vec![Vec3::ONE; 3]);

        let err = field.blend(&before, &short, 0.5).unwrap_err();
        assert_eq!(
            err,
            TransitionError::LengthMismatch {
                live: 12,
                from: 12,
                to: 9
            }
        );
        assert_eq!(field.snapshot(), before);
    }

    #[test]
    fn test_initialize_switches_pattern() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = field(27);
        field.initialize(Pattern::Grid, &mut rng);
        assert_eq!(field.pattern(), Pattern::Grid);
        assert_eq!(field.positions()[0], Pattern::Grid.generate(0, 27, &mut rng));
    }
}
