use log::trace;

use crate::engine::components::interaction_state::InteractionState;
use crate::engine::components::light::Light;
use crate::engine::components::material::Material;
use crate::engine::components::renderable::RenderableMesh;
use super::backend::{ GraphicsBackend, RenderState, UniformValue };
use super::lighting::upload_lighting;
use super::shader::{ ShaderProgram, Uniform };
use super::transform_pipeline::FrameTransforms;

/// Texture unit the diffuse texture is bound to.
pub const DIFFUSE_TEXTURE_UNIT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn {
        vertex_count: usize,
    },
    /// The surface was cleared but there was nothing live to draw.
    Skipped,
}

/// Everything a single frame needs, borrowed for the duration of the call.
pub struct FrameInputs<'a, B: GraphicsBackend> {
    pub renderable: &'a RenderableMesh<B>,
    pub program: &'a ShaderProgram<B>,
    pub transforms: &'a FrameTransforms,
    pub light: &'a Light,
    pub material: &'a Material,
    pub state: &'a InteractionState,
}

/// Issues the per-frame GL work: one mesh, one draw call.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    clear_color: [f32; 4],
}

impl FrameRenderer {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self { clear_color }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn render<B: GraphicsBackend>(&self, backend: &B, inputs: &FrameInputs<'_, B>) -> FrameOutcome {
        let FrameInputs { renderable, program, transforms, light, material, state } = *inputs;

        backend.clear(self.clear_color);
        backend.apply_render_state(&RenderState::from(state));

        if !renderable.is_live() || !program.is_live() {
            trace!("nothing live to draw, frame skipped");
            return FrameOutcome::Skipped;
        }

        program.bind(backend);
        program.set(backend, Uniform::Mvp, UniformValue::Mat4(transforms.mvp_cols()));
        program.set(backend, Uniform::Model, UniformValue::Mat4(transforms.model_cols()));
        program.set(backend, Uniform::View, UniformValue::Mat4(transforms.view_cols()));
        upload_lighting(backend, program, light, material);

        let streams = renderable.mesh.streams();
        for stream in streams {
            backend.bind_attribute(
                stream.attribute.slot(),
                stream.buffer,
                stream.attribute.components()
            );
        }

        let texture = renderable.texture.as_ref().and_then(|texture| texture.handle());
        if texture.is_some() {
            program.set(
                backend,
                Uniform::TextureSampler,
                UniformValue::Int(DIFFUSE_TEXTURE_UNIT as i32)
            );
            backend.bind_texture(DIFFUSE_TEXTURE_UNIT, texture);
        }

        let vertex_count = renderable.mesh.triangle_count() * 3;
        backend.draw_triangles(vertex_count);

        if texture.is_some() {
            backend.bind_texture(DIFFUSE_TEXTURE_UNIT, None);
        }
        for stream in streams {
            backend.unbind_attribute(stream.attribute.slot());
        }
        program.unbind(backend);

        FrameOutcome::Drawn { vertex_count }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0, 1.0])
    }
}
