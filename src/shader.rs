use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

pub const PARTICLE_SHADER: &str = include_str!("shaders/particle.wgsl");
pub const STAR_SHADER: &str = include_str!("shaders/star.wgsl");

/// Per-frame values shared by the particle and star shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub pointer: [f32; 3],
    pub time: f32,
    pub viewport: [f32; 2],
    pub star_rotation: f32,
    pub _padding: f32,
}

impl Uniforms {
    pub fn new(view_proj: Mat4, view: Mat4, pointer: Vec3, time: f32, viewport: Vec2, star_rotation: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            pointer: pointer.to_array(),
            time,
            viewport: viewport.to_array(),
            star_rotation,
            _padding: 0.0,
        }
    }
}

/// Particle attributes that never change after creation.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleAttributes {
    pub size: f32,
    pub kind: u32,
    pub index: u32,
}

impl ParticleAttributes {
    pub fn collect(sizes: &[f32], kinds: &[u32]) -> Vec<Self> {
        sizes
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(index, (&size, &kind))| Self {
                size,
                kind,
                index: index as u32,
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    pub(crate) fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_particle_shader_is_valid() {
        validate_wgsl(PARTICLE_SHADER).expect("particle WGSL should be valid");
    }

    #[test]
    fn test_star_shader_is_valid() {
        validate_wgsl(STAR_SHADER).expect("star WGSL should be valid");
    }

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // mat4 + mat4 + (vec3 + f32) + (vec2 + f32 + f32)
        assert_eq!(std::mem::size_of::<Uniforms>(), 160);
        assert_eq!(std::mem::size_of::<ParticleAttributes>(), 12);
    }

    #[test]
    fn test_attributes_carry_index() {
        let attrs = ParticleAttributes::collect(&[1.0, 2.0], &[2, 0]);
        assert_eq!(attrs[1], ParticleAttributes { size: 2.0, kind: 0, index: 1 });
    }
}
