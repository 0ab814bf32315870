use log::{ debug, warn };

use crate::engine::error::{ RenderError, RenderResult };
use crate::engine::rendering::backend::GraphicsBackend;

/// Decoded RGB8 image, row-major, first row at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> RenderResult<Self> {
        let expected = (width as usize) * (height as usize) * 3;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(
                RenderError::AssetFormat(
                    format!(
                        "{}x{} RGB image needs {} bytes, got {}",
                        width,
                        height,
                        expected,
                        pixels.len()
                    )
                )
            );
        }
        Ok(Self { width, height, pixels })
    }

    /// 1x1 opaque white, used when a lit mesh has no diffuse texture.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy with the rows reversed so the first row is the bottom one, the
    /// origin convention texture uploads expect.
    pub fn flipped_vertically(&self) -> Self {
        let flipped = image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .map(|img| image::imageops::flip_vertical(&img).into_raw())
            .unwrap_or_else(|| self.pixels.clone());
        Self {
            width: self.width,
            height: self.height,
            pixels: flipped,
        }
    }
}

/// GPU-resident 2D texture. Sole owner of its handle; release is idempotent.
#[derive(Debug)]
pub struct GpuTexture<B: GraphicsBackend> {
    texture: Option<B::Texture>,
    width: u32,
    height: u32,
}

impl<B: GraphicsBackend> GpuTexture<B> {
    pub(crate) fn from_handle(texture: B::Texture, width: u32, height: u32) -> Self {
        Self {
            texture: Some(texture),
            width,
            height,
        }
    }

    pub fn handle(&self) -> Option<B::Texture> {
        self.texture
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_live(&self) -> bool {
        self.texture.is_some()
    }

    pub(crate) fn release(&mut self, backend: &B) -> bool {
        match self.texture.take() {
            Some(texture) => {
                backend.delete_texture(texture);
                debug!("released {}x{} texture", self.width, self.height);
                true
            }
            None => {
                warn!("texture already released, ignoring second release");
                false
            }
        }
    }
}
