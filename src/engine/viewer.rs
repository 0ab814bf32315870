use log::{ info, warn };

use crate::engine::components::{
    Command,
    InputEvent,
    InputSettings,
    InteractionState,
    Light,
    Material,
    MeshData,
    RenderableMesh,
    TextureImage,
};
use crate::engine::config::ViewerConfig;
use crate::engine::error::RenderResult;
use crate::engine::loaders::{ load_mesh, load_texture };
use crate::engine::managers::ResourceManager;
use crate::engine::rendering::{
    FrameInputs,
    FrameOutcome,
    FrameRenderer,
    GraphicsBackend,
    ShaderProgram,
    TransformPipeline,
};

/// One mesh on screen: the GPU resources, the per-frame pipeline and the
/// interaction state the input layer drives.
///
/// The viewer never holds on to the backend; every call that touches the
/// GPU takes it explicitly, the same context for the whole lifetime.
pub struct Viewer<B: GraphicsBackend> {
    resources: ResourceManager,
    renderable: RenderableMesh<B>,
    program: ShaderProgram<B>,
    pipeline: TransformPipeline,
    renderer: FrameRenderer,
    light: Light,
    material: Material,
    settings: InputSettings,
    state: InteractionState,
    viewport: (u32, u32),
}

impl<B: GraphicsBackend> Viewer<B> {
    /// Reads the configured mesh and texture from disk, then uploads them.
    pub fn load(backend: &B, config: &ViewerConfig, width: u32, height: u32) -> RenderResult<Self> {
        let mesh = load_mesh(&config.assets.mesh, config.assets.layout)?;

        let texture = match (&config.assets.texture, mesh.layout.is_lit()) {
            (Some(path), true) => Some(load_texture(path)?),
            (Some(path), false) => {
                warn!("{:?} meshes are unlit, ignoring texture {}", mesh.layout, path.display());
                None
            }
            (None, _) => None,
        };

        Self::from_assets(backend, config, &mesh, texture.as_ref(), width, height)
    }

    /// Uploads the mesh, then the texture, then builds the shader program.
    /// Anything already created is released again if a later step fails.
    pub fn from_assets(
        backend: &B,
        config: &ViewerConfig,
        mesh: &MeshData,
        texture: Option<&TextureImage>,
        width: u32,
        height: u32
    ) -> RenderResult<Self> {
        let mut resources = ResourceManager::new();
        let layout = mesh.layout;

        let gpu_mesh = resources.create_mesh(backend, mesh)?;
        let mut renderable = RenderableMesh::new(gpu_mesh, None, layout);

        if layout.is_lit() {
            let white = TextureImage::white();
            match resources.create_texture(backend, texture.unwrap_or(&white)) {
                Ok(gpu_texture) => {
                    renderable.texture = Some(gpu_texture);
                }
                Err(e) => {
                    resources.destroy_renderable(backend, &mut renderable);
                    return Err(e);
                }
            }
        }

        let program = match ShaderProgram::for_layout(backend, layout) {
            Ok(program) => program,
            Err(e) => {
                resources.destroy_renderable(backend, &mut renderable);
                return Err(e);
            }
        };

        info!("viewer ready at {}x{}", width, height);

        Ok(Self {
            resources,
            renderable,
            program,
            pipeline: TransformPipeline::new(config.camera(), width, height),
            renderer: FrameRenderer::new(config.render.clear_color),
            light: config.light(),
            material: config.material(),
            settings: config.input_settings(),
            state: config.initial_state(),
            viewport: (width, height),
        })
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn is_live(&self) -> bool {
        self.renderable.is_live() && self.program.is_live()
    }

    /// Applies one input event. Resizes are handled here as well as being
    /// passed up, since the surface itself belongs to the platform layer.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Command> {
        let command = self.state.apply(event, &self.settings);
        if let Some(Command::Resize { width, height }) = command {
            self.resize(width, height);
        }
        command
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.pipeline.resize(width, height);
    }

    /// Draws one frame and advances the interaction state for the next one.
    pub fn render_frame(&mut self, backend: &B) -> FrameOutcome {
        backend.set_viewport(self.viewport.0, self.viewport.1);

        let (transforms, next) = self.pipeline.frame(&self.state, &self.renderable.intrinsic_model);
        let outcome = self.renderer.render(backend, &FrameInputs {
            renderable: &self.renderable,
            program: &self.program,
            transforms: &transforms,
            light: &self.light,
            material: &self.material,
            state: &self.state,
        });

        self.state = next;
        outcome
    }

    /// Frees the mesh and its texture. Later frames only clear the surface.
    pub fn unload_mesh(&mut self, backend: &B) {
        self.resources.destroy_renderable(backend, &mut self.renderable);
    }

    /// Frees everything this viewer created. Safe to call more than once.
    pub fn shutdown(&mut self, backend: &B) {
        if !self.renderable.is_live() && !self.program.is_live() {
            return;
        }
        self.unload_mesh(backend);
        if self.program.is_live() {
            self.program.release(backend);
        }
        if !self.resources.is_empty() {
            warn!(
                "{} buffers and {} textures still live after shutdown",
                self.resources.live_buffers(),
                self.resources.live_textures()
            );
        }
        info!("viewer shut down");
    }
}
