//! Interactive viewer for a single textured, lit mesh on OpenGL 3.3.
//!
//! The engine core (transforms, lighting, resource lifecycle, per-frame
//! rendering) is generic over `GraphicsBackend`; `main.rs` supplies the
//! window, the GL context and the input stream.

pub mod engine;

pub use engine::components::{ Command, InputEvent, InteractionState, Toggle };
pub use engine::config::ViewerConfig;
pub use engine::error::{ RenderError, RenderResult };
pub use engine::rendering::{ GlowBackend, GraphicsBackend };
pub use engine::viewer::Viewer;
