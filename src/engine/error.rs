use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Programmable pipeline stage a shader source was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Every failure the viewer can hit. All of them are fatal at startup;
/// the per-frame path never produces one.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("asset format error: {0}")]
    AssetFormat(String),

    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link:\n{log}")]
    ShaderLink { log: String },

    #[error("required uniform `{name}` was not found in the linked program")]
    MissingUniform { name: String },

    #[error("GPU resource exhausted: {0}")]
    ResourceExhaustion(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("platform error: {0}")]
    Platform(String),
}

impl From<toml::de::Error> for RenderError {
    fn from(err: toml::de::Error) -> Self {
        RenderError::Config(err.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
