use std::path::Path;

use image::{ DynamicImage, ImageError };
use log::info;

use crate::engine::components::texture::TextureImage;
use crate::engine::error::{ RenderError, RenderResult };

fn from_decoded(image: DynamicImage) -> RenderResult<TextureImage> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    TextureImage::from_rgb(width, height, rgb.into_raw())
}

/// Decodes a PNG or JPEG file to RGB8. Alpha, if present, is dropped.
pub fn load_texture(path: &Path) -> RenderResult<TextureImage> {
    let image = image::open(path).map_err(|e| match e {
        ImageError::IoError(source) => RenderError::Io { path: path.to_path_buf(), source },
        other => RenderError::Image(other),
    })?;
    let texture = from_decoded(image)?;
    info!("loaded texture {} ({}x{})", path.display(), texture.width(), texture.height());
    Ok(texture)
}

pub fn load_texture_from_memory(bytes: &[u8]) -> RenderResult<TextureImage> {
    let image = image::load_from_memory(bytes)?;
    from_decoded(image)
}
