use crate::engine::components::camera::Camera;
use crate::engine::components::interaction_state::InteractionState;
use crate::engine::utils::math::{
    Mat4x4,
    mat4x4_rot_x,
    mat4x4_rot_y,
    mat4x4_to_cols,
    mat4x4_translate,
};

/// Matrices for one frame, computed once and uploaded as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub model: Mat4x4,
    pub view: Mat4x4,
    pub projection: Mat4x4,
    pub mvp: Mat4x4,
}

impl FrameTransforms {
    pub fn mvp_cols(&self) -> [f32; 16] {
        mat4x4_to_cols(&self.mvp)
    }

    pub fn model_cols(&self) -> [f32; 16] {
        mat4x4_to_cols(&self.model)
    }

    pub fn view_cols(&self) -> [f32; 16] {
        mat4x4_to_cols(&self.view)
    }
}

/// Model, view and projection composition.
///
/// View and projection are cached. Only `resize` touches the projection and
/// nothing touches the view after construction; the model is rebuilt from
/// the interaction state every frame.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    camera: Camera,
    view: Mat4x4,
    projection: Mat4x4,
}

impl TransformPipeline {
    pub fn new(camera: Camera, width: u32, height: u32) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(width, height),
            camera,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn view(&self) -> &Mat4x4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4x4 {
        &self.projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection = self.camera.projection_matrix(width, height);
    }

    /// `T(0, 0, zoom - distance) · Rx(-rotX) · Ry(-rotY) · Ry(spin) · intrinsic`
    pub fn model_matrix(&self, state: &InteractionState, intrinsic: &Mat4x4) -> Mat4x4 {
        mat4x4_translate(0.0, 0.0, state.zoom - self.camera.distance) *
            mat4x4_rot_x(-state.rotation_x) *
            mat4x4_rot_y(-state.rotation_y) *
            mat4x4_rot_y(state.animation_angle) *
            intrinsic
    }

    /// Matrices for `state`, plus the state the next frame starts from.
    pub fn frame(
        &self,
        state: &InteractionState,
        intrinsic: &Mat4x4
    ) -> (FrameTransforms, InteractionState) {
        let model = self.model_matrix(state, intrinsic);
        let mvp = self.projection * self.view * model;
        let transforms = FrameTransforms {
            model,
            view: self.view,
            projection: self.projection,
            mvp,
        };
        (transforms, state.advanced())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{ Point3, Vector4 };
    use crate::engine::utils::math::mat4x4_identity;

    fn pipeline(distance: f32) -> TransformPipeline {
        TransformPipeline::new(Camera { distance, ..Camera::default() }, 800, 600)
    }

    #[test]
    fn zero_state_at_zero_distance_is_pure_projection() {
        let pipeline = pipeline(0.0);
        let (frame, _) = pipeline.frame(&InteractionState::default(), &mat4x4_identity());

        assert_relative_eq!(frame.model, mat4x4_identity(), epsilon = 1e-6);
        assert_relative_eq!(frame.view, mat4x4_identity(), epsilon = 1e-6);
        assert_relative_eq!(frame.mvp, *pipeline.projection(), epsilon = 1e-6);
    }

    #[test]
    fn full_turns_do_not_change_the_model() {
        let pipeline = pipeline(5.0);
        let base = pipeline.model_matrix(&InteractionState::default(), &mat4x4_identity());
        let turned = InteractionState {
            rotation_y: 360.0,
            rotation_x: -360.0,
            animation_angle: 720.0,
            ..Default::default()
        };
        assert_relative_eq!(pipeline.model_matrix(&turned, &mat4x4_identity()), base, epsilon = 1e-5);
    }

    #[test]
    fn zoom_moves_model_toward_camera() {
        let pipeline = pipeline(5.0);
        let state = InteractionState { zoom: 2.0, ..Default::default() };
        let model = pipeline.model_matrix(&state, &mat4x4_identity());
        let origin = model.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 0.0, -3.0), epsilon = 1e-6);
    }

    #[test]
    fn rotation_is_applied_before_translation() {
        let pipeline = pipeline(5.0);
        let state = InteractionState { rotation_y: -90.0, ..Default::default() };
        let model = pipeline.model_matrix(&state, &mat4x4_identity());
        // +X rotated by +90° about Y lands on -Z, then pushed 5 units away.
        let p = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p, Vector4::new(0.0, 0.0, -6.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn intrinsic_model_is_post_multiplied() {
        let pipeline = pipeline(5.0);
        let intrinsic = mat4x4_translate(1.0, 0.0, 0.0);
        let model = pipeline.model_matrix(&InteractionState::default(), &intrinsic);
        let origin = model.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(1.0, 0.0, -5.0), epsilon = 1e-6);
    }

    #[test]
    fn resize_only_recomputes_projection() {
        let mut pipeline = pipeline(5.0);
        let state = InteractionState { rotation_x: 12.0, zoom: 1.0, ..Default::default() };
        let (before, _) = pipeline.frame(&state, &mat4x4_identity());

        pipeline.resize(1920, 1080);
        let (after, _) = pipeline.frame(&state, &mat4x4_identity());

        assert_eq!(after.model, before.model);
        assert_eq!(after.view, before.view);
        assert_ne!(after.projection, before.projection);
        assert_relative_eq!(after.projection[(0, 0)] * (1920.0 / 1080.0), after.projection[(1, 1)], epsilon = 1e-5);
    }

    #[test]
    fn frame_is_pure_apart_from_the_returned_state() {
        let pipeline = pipeline(5.0);
        let still = InteractionState::default();
        let (a, next_a) = pipeline.frame(&still, &mat4x4_identity());
        let (b, next_b) = pipeline.frame(&still, &mat4x4_identity());
        assert_eq!(a.mvp_cols(), b.mvp_cols());
        assert_eq!(next_a, still);
        assert_eq!(next_b, still);

        let spinning = InteractionState { animating: true, ..Default::default() };
        let (_, next) = pipeline.frame(&spinning, &mat4x4_identity());
        assert_eq!(next.animation_angle, 1.0);
    }
}
