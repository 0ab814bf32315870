//! The fragment lighting model, on the CPU side.
//!
//! `fragment_lit.glsl` evaluates the same equation per fragment; the
//! functions here mirror it term for term so the output can be checked
//! without a GL context, and upload the constants the shader reads.

use nalgebra::{ Vector3, Vector4 };

use crate::engine::components::light::Light;
use crate::engine::components::material::Material;
use crate::engine::utils::math::Mat4x4;
use super::backend::{ GraphicsBackend, UniformValue };
use super::shader::{ ShaderProgram, Uniform };

/// Additive floor on the diffuse intensity.
pub const DIFFUSE_EPSILON: f32 = 0.015;

/// Interpolated per-fragment inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInputs {
    pub position_worldspace: Vector3<f32>,
    /// Fragment-to-camera vector in camera space. Need not be normalized.
    pub eye_direction_cameraspace: Vector3<f32>,
    /// Need not be normalized.
    pub normal_cameraspace: Vector3<f32>,
    /// Sampled diffuse texel, RGBA in [0, 1].
    pub texel: Vector4<f32>,
}

/// The three unclamped terms and the final clamped color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedFragment {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub color: Vector4<f32>,
}

/// `|w - 1| + d² · w`. Exactly 1 for directional lights.
pub fn distance_factor(light: &Light, position_worldspace: &Vector3<f32>) -> f32 {
    let w = light.direction_or_position.w;
    let distance_squared = (light.direction_or_position.xyz() - position_worldspace).norm_squared();
    (w - 1.0).abs() + distance_squared * w
}

fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

pub fn shade_fragment(
    inputs: &FragmentInputs,
    view: &Mat4x4,
    light: &Light,
    material: &Material
) -> ShadedFragment {
    let diffuse_color = inputs.texel.xyz().component_mul(&material.base_color.xyz());

    let w = light.direction_or_position.w;
    let n = inputs.normal_cameraspace.normalize();
    let e = inputs.eye_direction_cameraspace.normalize();
    let light_cameraspace = (view * light.direction_or_position).xyz();
    let l = (inputs.eye_direction_cameraspace * w + light_cameraspace).normalize();

    let distance_factor = distance_factor(light, &inputs.position_worldspace);

    let cos_theta = n.dot(&l).max(0.0);
    let cos_alpha = e.dot(&reflect(&-l, &n)).max(0.0);

    let ambient = diffuse_color * (light.intensity * material.ambient_intensity);
    let diffuse =
        diffuse_color.component_mul(&light.color) *
        ((light.intensity + DIFFUSE_EPSILON) * cos_theta / distance_factor);
    let specular =
        material.specular_color.component_mul(&light.color) *
        ((material.specular_intensity * light.intensity * cos_alpha.powf(material.flare_exponent)) /
            distance_factor);

    let rgb = (ambient + diffuse + specular).map(|c| c.clamp(0.0, 1.0));
    let alpha = inputs.texel.w * material.base_color.w;

    ShadedFragment {
        ambient,
        diffuse,
        specular,
        color: Vector4::new(rgb.x, rgb.y, rgb.z, alpha),
    }
}

/// Uploads light and material constants. Uniforms the program does not use
/// are skipped.
pub fn upload_lighting<B: GraphicsBackend>(
    backend: &B,
    program: &ShaderProgram<B>,
    light: &Light,
    material: &Material
) {
    let values = [
        (Uniform::LightColor, UniformValue::Vec3(light.color.into())),
        (Uniform::LightDirOrPos, UniformValue::Vec4(light.direction_or_position.into())),
        (Uniform::LightIntensity, UniformValue::Float(light.intensity)),
        (Uniform::MaterialBaseColor, UniformValue::Vec4(material.base_color.into())),
        (Uniform::MaterialAmbientIntensity, UniformValue::Float(material.ambient_intensity)),
        (Uniform::MaterialSpecularColor, UniformValue::Vec3(material.specular_color.into())),
        (Uniform::MaterialSpecularIntensity, UniformValue::Float(material.specular_intensity)),
        (Uniform::MaterialFlareExponent, UniformValue::Float(material.flare_exponent)),
    ];
    for (uniform, value) in values {
        program.set(backend, uniform, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::engine::utils::math::mat4x4_identity;

    fn facing_camera(position: Vector3<f32>) -> FragmentInputs {
        FragmentInputs {
            position_worldspace: position,
            eye_direction_cameraspace: Vector3::new(0.0, 0.0, 1.0),
            normal_cameraspace: Vector3::new(0.0, 0.0, 1.0),
            texel: Vector4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn directional_regression_values() {
        let light = Light::default();
        let material = Material::default();
        let view = mat4x4_identity();

        let near = shade_fragment(&facing_camera(Vector3::zeros()), &view, &light, &material);
        let cos = 1.0 / (5.0f32).sqrt();

        assert_relative_eq!(near.ambient, Vector3::repeat(0.15 * 1.6), epsilon = 1e-6);
        assert_relative_eq!(near.diffuse, Vector3::repeat(1.615 * cos), epsilon = 1e-5);
        assert_relative_eq!(near.specular, Vector3::repeat(0.08 * 1.6 * cos.powi(3)), epsilon = 1e-5);
        assert_relative_eq!(near.color.x, 0.24 + 1.615 * cos + 0.128 * cos.powi(3), epsilon = 1e-5);
        assert_eq!(near.color.w, 1.0);

        // Directional light: no attenuation, so distance does not matter.
        let far = shade_fragment(
            &facing_camera(Vector3::new(30.0, -12.0, 7.0)),
            &view,
            &light,
            &material
        );
        assert_relative_eq!(far.color, near.color, epsilon = 1e-6);
        assert_eq!(distance_factor(&light, &Vector3::new(30.0, -12.0, 7.0)), 1.0);
    }

    #[test]
    fn output_is_clamped_per_channel() {
        let light = Light::directional([1.0; 3], [0.0, 0.0, 1.0], 20.0);
        let material = Material::new([1.0, 0.5, 0.0, 0.5], 1.0, [1.0; 3], 1.0, 1.0);
        let shaded = shade_fragment(&facing_camera(Vector3::zeros()), &mat4x4_identity(), &light, &material);

        assert!(shaded.ambient.x > 1.0);
        assert_eq!(shaded.color.x, 1.0);
        assert_eq!(shaded.color.y, 1.0);
        // Blue is carried only by the specular term, which is also clamped.
        assert_eq!(shaded.color.z, 1.0);
        assert_eq!(shaded.color.w, 0.5);
        assert!(shaded.color.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn back_facing_light_leaves_only_ambient() {
        let light = Light::directional([1.0; 3], [0.0, 0.0, -1.0], 1.0);
        let material = Material::default();
        let shaded = shade_fragment(&facing_camera(Vector3::zeros()), &mat4x4_identity(), &light, &material);

        assert_eq!(shaded.diffuse, Vector3::zeros());
        assert_eq!(shaded.specular, Vector3::zeros());
        assert_relative_eq!(shaded.color.xyz(), Vector3::repeat(0.15), epsilon = 1e-6);
    }

    #[test]
    fn point_light_attenuates_with_squared_distance() {
        let light = Light::point([1.0; 3], [0.0, 0.0, 2.0], 1.0);
        let material = Material { ambient_intensity: 0.0, specular_intensity: 0.0, ..Material::default() };
        let view = mat4x4_identity();

        let inputs = facing_camera(Vector3::zeros());

        assert_eq!(distance_factor(&light, &inputs.position_worldspace), 4.0);
        let shaded = shade_fragment(&inputs, &view, &light, &material);
        assert_relative_eq!(shaded.diffuse, Vector3::repeat(1.015 / 4.0), epsilon = 1e-6);
    }

    #[test]
    fn intensity_zero_keeps_diffuse_floor() {
        let light = Light::directional([1.0; 3], [0.0, 0.0, 1.0], 0.0);
        let shaded = shade_fragment(
            &facing_camera(Vector3::zeros()),
            &mat4x4_identity(),
            &light,
            &Material::default()
        );
        assert_relative_eq!(shaded.diffuse, Vector3::repeat(DIFFUSE_EPSILON), epsilon = 1e-7);
        assert_eq!(shaded.ambient, Vector3::zeros());
    }
}
