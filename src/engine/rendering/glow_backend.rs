use glow::HasContext;
use log::{ debug, info };

use crate::engine::components::texture::TextureImage;
use crate::engine::error::{ RenderError, RenderResult, ShaderStage };
use super::backend::{ GraphicsBackend, RenderState, UniformValue };

/// `GraphicsBackend` on an OpenGL 3.3 core context.
pub struct GlowBackend {
    gl: glow::Context,
    vao: glow::VertexArray,
}

impl GlowBackend {
    /// Takes ownership of a current context. Core profile needs a bound
    /// vertex array for attribute streams, so one is created and kept bound.
    pub fn new(gl: glow::Context) -> RenderResult<Self> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(RenderError::ResourceExhaustion)?;
            gl.bind_vertex_array(Some(vao));

            info!(
                "OpenGL {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );

            Ok(Self { gl, vao })
        }
    }

    /// Deletes the vertex array. Call once, after every other resource is gone.
    pub fn release(&self) {
        unsafe {
            self.gl.bind_vertex_array(None);
            self.gl.delete_vertex_array(self.vao);
        }
        debug!("released vertex array");
    }

    fn check_out_of_memory(&self, what: &str) -> RenderResult<()> {
        let error = unsafe { self.gl.get_error() };
        if error == glow::OUT_OF_MEMORY {
            return Err(RenderError::ResourceExhaustion(format!("out of GPU memory uploading {what}")));
        }
        Ok(())
    }

    fn set_capability(&self, capability: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }

    fn apply_sampler_params(&self) {
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32
            );
        }
    }
}

impl GraphicsBackend for GlowBackend {
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn create_buffer(&self, data: &[f32]) -> RenderResult<Self::Buffer> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(RenderError::ResourceExhaustion)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW
            );
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);

            if let Err(e) = self.check_out_of_memory("vertex buffer") {
                self.gl.delete_buffer(buffer);
                return Err(e);
            }
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe {
            self.gl.delete_buffer(buffer);
        }
    }

    fn create_texture(&self, image: &TextureImage) -> RenderResult<Self::Texture> {
        unsafe {
            let texture = self.gl.create_texture().map_err(RenderError::ResourceExhaustion)?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            // RGB rows are not 4-byte aligned in general.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                image.width() as i32,
                image.height() as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels()))
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.apply_sampler_params();
            self.gl.bind_texture(glow::TEXTURE_2D, None);

            if let Err(e) = self.check_out_of_memory("texture") {
                self.gl.delete_texture(texture);
                return Err(e);
            }
            Ok(texture)
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe {
            self.gl.delete_texture(texture);
        }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> RenderResult<Self::Shader> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(kind).map_err(RenderError::ResourceExhaustion)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile { stage, log });
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            self.gl.delete_shader(shader);
        }
    }

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader
    ) -> RenderResult<Self::Program> {
        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    return Err(RenderError::ResourceExhaustion(e));
                }
            };
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);

            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(RenderError::ShaderLink { log });
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            self.gl.delete_program(program);
        }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue) {
        unsafe {
            match value {
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(Some(location), false, &m),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(Some(location), x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(Some(location), x, y, z, w),
                UniformValue::Float(v) => self.gl.uniform_1_f32(Some(location), v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(Some(location), v),
            }
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            self.gl.use_program(program);
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn apply_render_state(&self, state: &RenderState) {
        self.set_capability(glow::DEPTH_TEST, state.depth_test);
        self.set_capability(glow::CULL_FACE, state.culling);
        self.set_capability(glow::BLEND, state.blending);
        unsafe {
            if state.depth_test {
                self.gl.depth_func(glow::LESS);
            }
            if state.culling {
                self.gl.cull_face(glow::BACK);
            }
            if state.blending {
                self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            }
            let mode = if state.wireframe { glow::LINE } else { glow::FILL };
            self.gl.polygon_mode(glow::FRONT_AND_BACK, mode);
        }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn bind_attribute(&self, slot: u32, buffer: Self::Buffer, components: usize) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.enable_vertex_attrib_array(slot);
            self.gl.vertex_attrib_pointer_f32(slot, components as i32, glow::FLOAT, false, 0, 0);
        }
    }

    fn unbind_attribute(&self, slot: u32) {
        unsafe {
            self.gl.disable_vertex_attrib_array(slot);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
            if texture.is_some() {
                self.apply_sampler_params();
            }
        }
    }

    fn draw_triangles(&self, vertex_count: usize) {
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLES, 0, vertex_count as i32);
        }
    }
}
