//! Slowly orbiting perspective camera.

use glam::{Mat4, Vec2, Vec3};

/// Distance the orbit radius oscillates around.
pub const BASE_RADIUS: f32 = 100.0;
/// Amplitude of the radius oscillation.
pub const RADIUS_VARIATION: f32 = 15.0;

/// Perspective camera that circles the origin as time advances.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Camera 100 units down the +Z axis looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, BASE_RADIUS),
            target: Vec3::ZERO,
            fov_y: 65.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1500.0,
        }
    }

    /// Place the camera on its orbit for `elapsed` seconds.
    ///
    /// The radius breathes between 85 and 115 while azimuth and elevation
    /// drift at different rates, so the path never quite repeats.
    pub fn orbit(&mut self, elapsed: f32) {
        let radius = BASE_RADIUS + (elapsed * 0.1).sin() * RADIUS_VARIATION;
        let azimuth = elapsed * 0.08;
        let elevation = elapsed * 0.06;
        self.position = Vec3::new(
            azimuth.cos() * radius,
            elevation.sin() * 35.0 + 5.0,
            azimuth.sin() * radius,
        );
        self.target = Vec3::ZERO;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalized device coordinates.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_proj().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let far = far.truncate() / far.w;
        Ray {
            origin: self.position,
            direction: (far - self.position).normalize_or_zero(),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Intersection with the plane `normal · p + constant = 0`.
    ///
    /// Returns `None` when the ray runs parallel to the plane or points away
    /// from it.
    pub fn intersect_plane(&self, normal: Vec3, constant: f32) -> Option<Vec3> {
        let distance = normal.dot(self.origin) + constant;
        let denominator = normal.dot(self.direction);
        if denominator == 0.0 {
            return (distance == 0.0).then_some(self.origin);
        }
        let t = -distance / denominator;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_radius_bounds() {
        let mut camera = OrbitCamera::default();
        for step in 0..2000 {
            camera.orbit(step as f32 * 0.37);
            let planar = Vec3::new(camera.position.x, 0.0, camera.position.z).length();
            assert!((84.99..=115.01).contains(&planar), "radius {}", planar);
            assert!(camera.position.y >= -30.01 && camera.position.y <= 40.01);
            assert_eq!(camera.target, Vec3::ZERO);
        }
    }

    #[test]
    fn test_orbit_at_time_zero() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0);
        assert!((camera.position - Vec3::new(100.0, 5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = OrbitCamera::new(1.5);
        let ray = camera.ray_through(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);

        let hit = ray.intersect_plane(Vec3::Z, 0.0).unwrap();
        assert!(hit.length() < 1e-2);
    }

    #[test]
    fn test_offset_ray_hits_off_center() {
        let camera = OrbitCamera::new(1.0);
        let hit = camera
            .ray_through(Vec2::new(0.5, 0.5))
            .intersect_plane(Vec3::Z, 0.0)
            .unwrap();
        assert!(hit.x > 0.0 && hit.y > 0.0);
        assert!(hit.z.abs() < 1e-3);
    }

    #[test]
    fn test_plane_behind_or_parallel() {
        let away = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::Z,
        };
        assert_eq!(away.intersect_plane(Vec3::Z, 0.0), None);

        let parallel = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::X,
        };
        assert_eq!(parallel.intersect_plane(Vec3::Z, 0.0), None);
    }
}
