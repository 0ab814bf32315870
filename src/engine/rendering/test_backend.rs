//! Headless `GraphicsBackend` that records every call.

use std::cell::{ Cell, RefCell };
use std::collections::{ HashMap, HashSet };

use crate::engine::components::texture::TextureImage;
use crate::engine::error::{ RenderError, RenderResult, ShaderStage };
use super::backend::{ GraphicsBackend, RenderState, UniformValue };

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer { id: u32, floats: usize },
    DeleteBuffer(u32),
    CreateTexture { id: u32, width: u32, height: u32 },
    DeleteTexture(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    SetUniform(String, UniformValue),
    Viewport(u32, u32),
    RenderState(RenderState),
    Clear([f32; 4]),
    BindAttribute { slot: u32, buffer: u32, components: usize },
    UnbindAttribute(u32),
    BindTexture(u32, Option<u32>),
    Draw(usize),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    live_buffers: RefCell<HashSet<u32>>,
    live_textures: RefCell<HashSet<u32>>,
    live_programs: RefCell<HashSet<u32>>,
    live_shaders: RefCell<HashSet<u32>>,
    shader_sources: RefCell<HashMap<u32, String>>,
    program_sources: RefCell<HashMap<u32, String>>,
    uploaded_textures: RefCell<Vec<TextureImage>>,
    buffer_budget: Cell<Option<usize>>,
    failing_stage: Cell<Option<ShaderStage>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer creation fails once `count` buffers have been created.
    pub fn with_buffer_budget(self, count: usize) -> Self {
        self.buffer_budget.set(Some(count));
        self
    }

    pub fn failing_compile(self, stage: ShaderStage) -> Self {
        self.failing_stage.set(Some(stage));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn uniform_calls(&self) -> Vec<(String, UniformValue)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetUniform(name, value) => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniform_calls()
            .into_iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn uploaded_textures(&self) -> Vec<TextureImage> {
        self.uploaded_textures.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl GraphicsBackend for RecordingBackend {
    type Buffer = u32;
    type Texture = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn create_buffer(&self, data: &[f32]) -> RenderResult<u32> {
        if let Some(budget) = self.buffer_budget.get() {
            if budget == 0 {
                return Err(RenderError::ResourceExhaustion("buffer budget exhausted".into()));
            }
            self.buffer_budget.set(Some(budget - 1));
        }
        let id = self.allocate();
        self.live_buffers.borrow_mut().insert(id);
        self.record(Call::CreateBuffer { id, floats: data.len() });
        Ok(id)
    }

    fn delete_buffer(&self, buffer: u32) {
        assert!(self.live_buffers.borrow_mut().remove(&buffer), "buffer {buffer} deleted twice");
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_texture(&self, image: &TextureImage) -> RenderResult<u32> {
        let id = self.allocate();
        self.live_textures.borrow_mut().insert(id);
        self.uploaded_textures.borrow_mut().push(image.clone());
        self.record(Call::CreateTexture { id, width: image.width(), height: image.height() });
        Ok(id)
    }

    fn delete_texture(&self, texture: u32) {
        assert!(self.live_textures.borrow_mut().remove(&texture), "texture {texture} deleted twice");
        self.record(Call::DeleteTexture(texture));
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> RenderResult<u32> {
        if self.failing_stage.get() == Some(stage) {
            return Err(RenderError::ShaderCompile {
                stage,
                log: "0:1(1): error: syntax error, unexpected IDENTIFIER".into(),
            });
        }
        let id = self.allocate();
        self.live_shaders.borrow_mut().insert(id);
        self.shader_sources.borrow_mut().insert(id, source.to_string());
        Ok(id)
    }

    fn delete_shader(&self, shader: u32) {
        assert!(self.live_shaders.borrow_mut().remove(&shader), "shader {shader} deleted twice");
    }

    fn link_program(&self, vertex: u32, fragment: u32) -> RenderResult<u32> {
        let mut combined = String::new();
        combined.push_str(self.shader_sources.borrow().get(&vertex).map_or("", String::as_str));
        combined.push_str(self.shader_sources.borrow().get(&fragment).map_or("", String::as_str));
        self.delete_shader(vertex);
        self.delete_shader(fragment);

        if combined.contains("LINK_FAILURE") {
            return Err(RenderError::ShaderLink {
                log: "error: unresolved symbol `LINK_FAILURE`".into(),
            });
        }

        let id = self.allocate();
        self.live_programs.borrow_mut().insert(id);
        self.program_sources.borrow_mut().insert(id, combined);
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        assert!(self.live_programs.borrow_mut().remove(&program), "program {program} deleted twice");
        self.record(Call::DeleteProgram(program));
    }

    // A uniform counts as active when the sources declare it.
    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        let declaration = format!(" {name};");
        self.program_sources
            .borrow()
            .get(&program)
            .filter(|source| source.contains(&declaration))
            .map(|_| name.to_string())
    }

    fn set_uniform(&self, location: &String, value: UniformValue) {
        self.record(Call::SetUniform(location.clone(), value));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn apply_render_state(&self, state: &RenderState) {
        self.record(Call::RenderState(*state));
    }

    fn clear(&self, color: [f32; 4]) {
        self.record(Call::Clear(color));
    }

    fn bind_attribute(&self, slot: u32, buffer: u32, components: usize) {
        self.record(Call::BindAttribute { slot, buffer, components });
    }

    fn unbind_attribute(&self, slot: u32) {
        self.record(Call::UnbindAttribute(slot));
    }

    fn bind_texture(&self, unit: u32, texture: Option<u32>) {
        self.record(Call::BindTexture(unit, texture));
    }

    fn draw_triangles(&self, vertex_count: usize) {
        self.record(Call::Draw(vertex_count));
    }
}
