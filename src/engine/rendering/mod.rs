pub mod backend;
pub mod frame_renderer;
pub mod glow_backend;
pub mod lighting;
pub mod shader;
pub mod transform_pipeline;

#[cfg(test)]
pub(crate) mod test_backend;

pub use backend::{ GraphicsBackend, RenderState, UniformValue };
pub use frame_renderer::{ FrameInputs, FrameOutcome, FrameRenderer };
pub use glow_backend::GlowBackend;
pub use lighting::{ shade_fragment, upload_lighting, FragmentInputs, ShadedFragment };
pub use shader::{ ShaderProgram, Uniform };
pub use transform_pipeline::{ FrameTransforms, TransformPipeline };
