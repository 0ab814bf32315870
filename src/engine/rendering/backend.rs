//! The GPU calls the viewer core needs, behind one trait.
//!
//! `GlowBackend` is the real implementation. Keeping the core generic over
//! this trait lets frame output and resource lifecycle be checked without a
//! GL context.

use std::fmt::Debug;

use crate::engine::components::interaction_state::InteractionState;
use crate::engine::components::texture::TextureImage;
use crate::engine::error::{ RenderResult, ShaderStage };

/// A value uploaded to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Column-major.
    Mat4([f32; 16]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Float(f32),
    Int(i32),
}

/// Fixed-function toggles applied once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub depth_test: bool,
    pub culling: bool,
    pub wireframe: bool,
    pub blending: bool,
}

impl From<&InteractionState> for RenderState {
    fn from(state: &InteractionState) -> Self {
        Self {
            depth_test: state.depth_test_enabled,
            culling: state.culling_enabled,
            wireframe: state.wireframe,
            blending: true,
        }
    }
}

pub trait GraphicsBackend {
    type Buffer: Copy + Debug + PartialEq;
    type Texture: Copy + Debug + PartialEq;
    type Shader: Copy + Debug;
    type Program: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    /// Static, write-once vertex buffer.
    fn create_buffer(&self, data: &[f32]) -> RenderResult<Self::Buffer>;
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// RGB texture with a full mipmap chain, repeat wrap and
    /// linear-mipmap-linear/linear filtering. `image` is uploaded as given.
    fn create_texture(&self, image: &TextureImage) -> RenderResult<Self::Texture>;
    fn delete_texture(&self, texture: Self::Texture);

    /// Fails with `ShaderCompile` carrying the compiler log verbatim.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> RenderResult<Self::Shader>;
    fn delete_shader(&self, shader: Self::Shader);
    /// Links and consumes both shaders. Fails with `ShaderLink`.
    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader
    ) -> RenderResult<Self::Program>;
    fn delete_program(&self, program: Self::Program);

    /// `None` when the program has no active uniform of that name.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue);
    fn use_program(&self, program: Option<Self::Program>);

    fn set_viewport(&self, width: u32, height: u32);
    fn apply_render_state(&self, state: &RenderState);
    fn clear(&self, color: [f32; 4]);

    fn bind_attribute(&self, slot: u32, buffer: Self::Buffer, components: usize);
    fn unbind_attribute(&self, slot: u32);
    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>);

    /// Non-indexed triangle list.
    fn draw_triangles(&self, vertex_count: usize);
}
