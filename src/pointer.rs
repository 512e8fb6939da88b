//! Pointer tracking for the repulsion effect.
//!
//! Input events only ever write the normalized screen coordinate. Once per
//! tick the coordinate is projected onto the `z = 0` plane and the world
//! position eases 10% of the way towards the hit, so the repulsion zone
//! glides after the cursor instead of snapping to it.

use glam::{Vec2, Vec3};

use crate::camera::OrbitCamera;

/// Screen coordinate used before any pointer input has arrived.
pub const OFFSCREEN: Vec2 = Vec2::new(10_000.0, 10_000.0);

/// Fraction of the remaining distance covered per tick.
pub const SMOOTHING: f32 = 0.1;

/// Screen-space x beyond which the pointer counts as absent.
const PRESENT_LIMIT: f32 = 9_000.0;

/// Map pixel coordinates to `[-1, 1]`, Y pointing up.
pub fn normalize_screen(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(Vec2::new(
        (x / width as f64 * 2.0 - 1.0) as f32,
        (1.0 - y / height as f64 * 2.0) as f32,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    screen: Vec2,
    world: Vec3,
    last_world: Vec3,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            screen: OFFSCREEN,
            world: Vec3::ZERO,
            last_world: Vec3::ZERO,
        }
    }

    /// Latest normalized screen coordinate.
    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Smoothed world-space position fed to the particle shader.
    pub fn world(&self) -> Vec3 {
        self.world
    }

    /// World position before the most recent smoothing step.
    pub fn last_world(&self) -> Vec3 {
        self.last_world
    }

    /// Whether any pointer input has been received.
    pub fn is_present(&self) -> bool {
        self.screen.x < PRESENT_LIMIT
    }

    pub fn set_screen(&mut self, ndc: Vec2) {
        self.screen = ndc;
    }

    /// Project the screen coordinate through `camera` and ease towards the hit.
    pub fn update(&mut self, camera: &OrbitCamera) {
        if !self.is_present() {
            return;
        }
        if let Some(hit) = camera.ray_through(self.screen).intersect_plane(Vec3::Z, 0.0) {
            self.last_world = self.world;
            self.world = self.world.lerp(hit, SMOOTHING);
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
