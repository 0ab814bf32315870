use crate::engine::utils::math::{ Mat4x4, mat4x4_look_at, mat4x4_perspective, aspect_ratio };

/// Fixed perspective camera at the origin looking down -Z.
///
/// `distance` is how far in front of the camera the model sits at zero zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new(fov_y_degrees: f32, near: f32, far: f32, distance: f32) -> Self {
        Self {
            fov_y_degrees,
            near,
            far,
            distance,
        }
    }

    pub fn view_matrix(&self) -> Mat4x4 {
        mat4x4_look_at([0.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0])
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4x4 {
        mat4x4_perspective(self.fov_y_degrees, aspect_ratio(width, height), self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, 0.1, 50.0, 5.0)
    }
}
