use nalgebra::{ Vector3, Vector4 };

/// A single light. `direction_or_position.w` selects the kind: 0 for a
/// directional light, 1 for a point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vector3<f32>,
    pub direction_or_position: Vector4<f32>,
    pub intensity: f32,
}

impl Light {
    /// Builds a light from raw homogeneous coordinates. Directions are
    /// normalized; positions are kept as given.
    pub fn new(color: [f32; 3], direction_or_position: [f32; 4], intensity: f32) -> Self {
        let [x, y, z, w] = direction_or_position;
        let xyz = Vector3::new(x, y, z);
        let xyz = if w == 0.0 && xyz.norm() > 0.0 { xyz.normalize() } else { xyz };
        Self {
            color: Vector3::from(color),
            direction_or_position: Vector4::new(xyz.x, xyz.y, xyz.z, w),
            intensity,
        }
    }

    pub fn directional(color: [f32; 3], direction: [f32; 3], intensity: f32) -> Self {
        Self::new(color, [direction[0], direction[1], direction[2], 0.0], intensity)
    }

    pub fn point(color: [f32; 3], position: [f32; 3], intensity: f32) -> Self {
        Self::new(color, [position[0], position[1], position[2], 1.0], intensity)
    }

    pub fn is_directional(&self) -> bool {
        self.direction_or_position.w == 0.0
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::directional([1.0, 1.0, 1.0], [1.0, 0.0, 0.5], 1.6)
    }
}
