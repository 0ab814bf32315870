use std::collections::HashMap;

use log::{ debug, info, warn };

use crate::engine::components::mesh::VertexLayout;
use crate::engine::error::{ RenderError, RenderResult, ShaderStage };
use super::backend::{ GraphicsBackend, UniformValue };

/// Every uniform the frame renderer may set, by semantic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    Mvp,
    Model,
    View,
    TextureSampler,
    LightColor,
    LightDirOrPos,
    LightIntensity,
    MaterialBaseColor,
    MaterialAmbientIntensity,
    MaterialSpecularColor,
    MaterialSpecularIntensity,
    MaterialFlareExponent,
}

impl Uniform {
    pub const ALL: [Uniform; 12] = [
        Uniform::Mvp,
        Uniform::Model,
        Uniform::View,
        Uniform::TextureSampler,
        Uniform::LightColor,
        Uniform::LightDirOrPos,
        Uniform::LightIntensity,
        Uniform::MaterialBaseColor,
        Uniform::MaterialAmbientIntensity,
        Uniform::MaterialSpecularColor,
        Uniform::MaterialSpecularIntensity,
        Uniform::MaterialFlareExponent,
    ];

    /// Name in the GLSL sources.
    pub fn name(self) -> &'static str {
        match self {
            Uniform::Mvp => "MVP",
            Uniform::Model => "M",
            Uniform::View => "V",
            Uniform::TextureSampler => "textureSampler",
            Uniform::LightColor => "lightColor",
            Uniform::LightDirOrPos => "lightDirOrPos",
            Uniform::LightIntensity => "lightIntensity",
            Uniform::MaterialBaseColor => "materialBaseColor",
            Uniform::MaterialAmbientIntensity => "materialAmbientIntensity",
            Uniform::MaterialSpecularColor => "materialSpecularColor",
            Uniform::MaterialSpecularIntensity => "materialSpecularIntensity",
            Uniform::MaterialFlareExponent => "materialFlareExponent",
        }
    }

    /// A program without a required uniform cannot draw anything meaningful.
    pub fn is_required(self) -> bool {
        matches!(self, Uniform::Mvp)
    }
}

/// Vertex and fragment source pair for a vertex layout.
pub fn shader_sources(layout: VertexLayout) -> (&'static str, &'static str) {
    match layout {
        VertexLayout::T2fN3fV3f =>
            (
                include_str!("../../../assets/shaders/vertex_lit.glsl"),
                include_str!("../../../assets/shaders/fragment_lit.glsl"),
            ),
        VertexLayout::C3fV3f =>
            (
                include_str!("../../../assets/shaders/vertex_color.glsl"),
                include_str!("../../../assets/shaders/fragment_color.glsl"),
            ),
    }
}

/// A linked program and the uniform locations resolved right after linking.
///
/// Unresolved optional uniforms are kept as `None` and setting them is a
/// no-op. Attributes are not looked up by name: the sources pin them to
/// slots 0 (position), 1 (texcoord or color) and 2 (normal).
#[derive(Debug)]
pub struct ShaderProgram<B: GraphicsBackend> {
    program: Option<B::Program>,
    locations: HashMap<Uniform, Option<B::UniformLocation>>,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    pub fn compile(backend: &B, vertex_source: &str, fragment_source: &str) -> RenderResult<Self> {
        let vertex = backend.compile_shader(ShaderStage::Vertex, vertex_source)?;
        let fragment = match backend.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(e) => {
                backend.delete_shader(vertex);
                return Err(e);
            }
        };
        let program = backend.link_program(vertex, fragment)?;

        let mut locations = HashMap::with_capacity(Uniform::ALL.len());
        for uniform in Uniform::ALL {
            let location = backend.uniform_location(program, uniform.name());
            if location.is_none() {
                if uniform.is_required() {
                    backend.delete_program(program);
                    return Err(RenderError::MissingUniform { name: uniform.name().to_string() });
                }
                debug!("uniform `{}` is not active, updates to it will be skipped", uniform.name());
            }
            locations.insert(uniform, location);
        }

        info!(
            "shader program linked ({}/{} uniforms active)",
            locations.values().filter(|l| l.is_some()).count(),
            Uniform::ALL.len()
        );

        Ok(Self {
            program: Some(program),
            locations,
        })
    }

    pub fn for_layout(backend: &B, layout: VertexLayout) -> RenderResult<Self> {
        let (vertex, fragment) = shader_sources(layout);
        Self::compile(backend, vertex, fragment)
    }

    pub fn is_live(&self) -> bool {
        self.program.is_some()
    }

    pub fn has_uniform(&self, uniform: Uniform) -> bool {
        matches!(self.locations.get(&uniform), Some(Some(_)))
    }

    pub fn bind(&self, backend: &B) {
        backend.use_program(self.program);
    }

    pub fn unbind(&self, backend: &B) {
        backend.use_program(None);
    }

    pub fn set(&self, backend: &B, uniform: Uniform, value: UniformValue) {
        if let Some(Some(location)) = self.locations.get(&uniform) {
            backend.set_uniform(location, value);
        }
    }

    pub fn release(&mut self, backend: &B) -> bool {
        match self.program.take() {
            Some(program) => {
                backend.delete_program(program);
                self.locations.clear();
                debug!("released shader program");
                true
            }
            None => {
                warn!("shader program already released, ignoring second release");
                false
            }
        }
    }
}
