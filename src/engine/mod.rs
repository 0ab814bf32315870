pub mod components;
pub mod config;
pub mod error;
pub mod input;
pub mod loaders;
pub mod logging;
pub mod managers;
pub mod rendering;
pub mod utils;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::{ RenderError, RenderResult, ShaderStage };
pub use viewer::Viewer;
