//! Desktop entry point: window, OpenGL 3.3 core context, event loop.

use std::fmt::Display;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glutin::config::{ ConfigTemplateBuilder, GlConfig };
use glutin::context::{
    ContextApi,
    ContextAttributesBuilder,
    GlProfile,
    PossiblyCurrentContext,
    Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{ Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface };
use glutin_winit::DisplayBuilder;
use log::{ error, info, warn };
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::window::{ Fullscreen, Window, WindowId };

use mesh_viewer::engine::input::InputTranslator;
use mesh_viewer::engine::loaders::LayoutChoice;
use mesh_viewer::engine::logging::{ init_logging, LoggingConfig };
use mesh_viewer::{ Command, GlowBackend, RenderError, RenderResult, Viewer, ViewerConfig };

#[derive(Parser, Debug)]
#[command(name = "mesh-viewer", version, about = "Interactive viewer for a single lit OBJ mesh")]
struct Args {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ file to show, overriding `assets.mesh`.
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Diffuse texture, overriding `assets.texture`.
    #[arg(long)]
    texture: Option<PathBuf>,

    #[arg(long, value_enum)]
    layout: Option<LayoutChoice>,

    /// Log filter, e.g. "debug" or "mesh_viewer=trace". Defaults to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn platform(err: impl Display) -> RenderError {
    RenderError::Platform(err.to_string())
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

/// Everything that exists only while the window does. Field order is drop
/// order: GL objects go before the context that owns them.
struct Gpu {
    viewer: Viewer<GlowBackend>,
    backend: GlowBackend,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl Gpu {
    fn create(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> RenderResult<Self> {
        let window_config = &config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|best, next| if next.num_samples() > best.num_samples() { next } else { best })
                    .expect("display offered no GL configs")
            })
            .map_err(platform)?;
        let window = window.ok_or_else(|| platform("window creation failed"))?;

        let raw_handle = window.window_handle().map_err(platform)?.as_raw();
        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let not_current = unsafe {
            display.create_context(&gl_config, &context_attributes).map_err(platform)?
        };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            non_zero(size.width),
            non_zero(size.height)
        );
        let surface = unsafe {
            display.create_window_surface(&gl_config, &surface_attributes).map_err(platform)?
        };
        let context = not_current.make_current(&surface).map_err(platform)?;

        if window_config.vsync {
            if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                warn!("vsync unavailable: {e}");
            }
        }
        if window_config.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };
        let backend = GlowBackend::new(gl)?;

        let viewer = match Viewer::load(&backend, config, size.width, size.height) {
            Ok(viewer) => viewer,
            Err(e) => {
                backend.release();
                return Err(e);
            }
        };

        window.request_redraw();
        Ok(Self { viewer, backend, surface, context, window })
    }

    fn redraw(&mut self) -> RenderResult<()> {
        self.viewer.render_frame(&self.backend);
        self.surface.swap_buffers(&self.context).map_err(platform)?;
        self.window.request_redraw();
        Ok(())
    }

    fn execute(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::Quit => event_loop.exit(),
            Command::ToggleFullscreen => {
                let next = match self.window.fullscreen() {
                    Some(_) => None,
                    None => Some(Fullscreen::Borderless(None)),
                };
                self.window.set_fullscreen(next);
            }
            Command::Resize { width, height } => {
                if width > 0 && height > 0 {
                    self.surface.resize(&self.context, non_zero(width), non_zero(height));
                }
            }
        }
    }

    fn teardown(mut self) {
        self.viewer.shutdown(&self.backend);
        self.backend.release();
    }
}

struct App {
    config: ViewerConfig,
    translator: InputTranslator,
    gpu: Option<Gpu>,
    fatal: Option<RenderError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            translator: InputTranslator::new(),
            gpu: None,
            fatal: None,
        }
    }

    /// Stops the loop; `run` returns the error once it has unwound.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.fatal.is_some() {
            return;
        }
        match Gpu::create(event_loop, &self.config) {
            Ok(gpu) => {
                info!("window open, press Esc or Q to quit");
                self.gpu = Some(gpu);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if let WindowEvent::RedrawRequested = event {
            if let Err(e) = gpu.redraw() {
                self.fail(event_loop, e);
            }
            return;
        }

        let Some(input) = self.translator.translate(&event) else {
            return;
        };
        if let Some(command) = gpu.viewer.handle_event(input) {
            gpu.execute(command, event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.take() {
            gpu.teardown();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.teardown();
        }
    }
}

fn load_config(args: &Args) -> RenderResult<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(mesh) = &args.mesh {
        config.assets.mesh = mesh.clone();
    }
    if let Some(texture) = &args.texture {
        config.assets.texture = Some(texture.clone());
    }
    if let Some(layout) = args.layout {
        config.assets.layout = layout;
    }
    Ok(config)
}

fn run(args: &Args) -> RenderResult<()> {
    let config = load_config(args)?;
    let event_loop = EventLoop::new().map_err(platform)?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).map_err(platform)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(LoggingConfig { env_filter: args.log.clone() });

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
