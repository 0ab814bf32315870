use nalgebra::{ Matrix4, Perspective3, Point3, Vector3 };

/// Column-major 4x4 single-precision matrix.
pub type Mat4x4 = Matrix4<f32>;
pub type Vec3 = Vector3<f32>;

pub fn mat4x4_identity() -> Mat4x4 {
    Matrix4::identity()
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

// Rotation helpers take degrees; conversion happens here and nowhere else.
pub fn mat4x4_rot_x(angle_degrees: f32) -> Mat4x4 {
    Matrix4::from_axis_angle(&Vector3::x_axis(), angle_degrees.to_radians())
}

pub fn mat4x4_rot_y(angle_degrees: f32) -> Mat4x4 {
    Matrix4::from_axis_angle(&Vector3::y_axis(), angle_degrees.to_radians())
}

pub fn mat4x4_perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    Perspective3::new(aspect_ratio, fov_y_degrees.to_radians(), near, far).to_homogeneous()
}

pub fn mat4x4_look_at(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> Mat4x4 {
    Matrix4::look_at_rh(
        &Point3::new(eye[0], eye[1], eye[2]),
        &Point3::new(target[0], target[1], target[2]),
        &Vector3::new(up[0], up[1], up[2])
    )
}

/// Flattens a matrix in the column-major order GL expects with `transpose = false`.
pub fn mat4x4_to_cols(matrix: &Mat4x4) -> [f32; 16] {
    let mut ret = [0.0; 16];
    ret.copy_from_slice(matrix.as_slice());
    ret
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    (width.max(1) as f32) / (height.max(1) as f32)
}
