use nalgebra::{ Vector3, Vector4 };

/// Surface response constants for the lighting equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vector4<f32>,
    pub ambient_intensity: f32,
    pub specular_color: Vector3<f32>,
    pub specular_intensity: f32,
    /// Exponent applied to the specular cosine; higher is a tighter highlight.
    pub flare_exponent: f32,
}

impl Material {
    pub fn new(
        base_color: [f32; 4],
        ambient_intensity: f32,
        specular_color: [f32; 3],
        specular_intensity: f32,
        flare_exponent: f32
    ) -> Self {
        Self {
            base_color: Vector4::from(base_color),
            ambient_intensity,
            specular_color: Vector3::from(specular_color),
            specular_intensity,
            flare_exponent,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0, 1.0], 0.15, [1.0, 1.0, 1.0], 0.08, 3.0)
    }
}
