use log::{ debug, info, warn };

use crate::engine::components::mesh::{ GpuMesh, GpuStream, MeshData };
use crate::engine::components::renderable::RenderableMesh;
use crate::engine::components::texture::{ GpuTexture, TextureImage };
use crate::engine::error::RenderResult;
use crate::engine::rendering::backend::GraphicsBackend;

/// Creates and destroys GPU resources and keeps count of what is live.
///
/// Handles themselves live in `GpuMesh`/`GpuTexture`; the counters here are
/// what shutdown checks to report leaks.
#[derive(Debug, Default)]
pub struct ResourceManager {
    live_buffers: usize,
    live_textures: usize,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures
    }

    /// Uploads every attribute stream to its own static buffer. If any
    /// upload fails, the buffers already created for this mesh are deleted
    /// before the error is returned.
    pub fn create_mesh<B: GraphicsBackend>(
        &mut self,
        backend: &B,
        data: &MeshData
    ) -> RenderResult<GpuMesh<B>> {
        let mut streams: Vec<GpuStream<B::Buffer>> = Vec::with_capacity(data.streams.len());

        for (attribute, floats) in &data.streams {
            match backend.create_buffer(floats) {
                Ok(buffer) => streams.push(GpuStream { attribute: *attribute, buffer }),
                Err(e) => {
                    warn!("{:?} stream upload failed, rolling back {} buffers", attribute, streams.len());
                    for stream in streams {
                        backend.delete_buffer(stream.buffer);
                    }
                    return Err(e);
                }
            }
        }

        self.live_buffers += streams.len();
        info!(
            "uploaded {:?} mesh: {} triangles in {} buffers",
            data.layout,
            data.triangle_count,
            streams.len()
        );
        Ok(GpuMesh::from_streams(streams, data.triangle_count))
    }

    /// Uploads `image` flipped vertically, so image row 0 ends up at v = 1.
    pub fn create_texture<B: GraphicsBackend>(
        &mut self,
        backend: &B,
        image: &TextureImage
    ) -> RenderResult<GpuTexture<B>> {
        let flipped = image.flipped_vertically();
        let handle = backend.create_texture(&flipped)?;
        self.live_textures += 1;
        debug!("uploaded {}x{} texture", image.width(), image.height());
        Ok(GpuTexture::from_handle(handle, image.width(), image.height()))
    }

    /// Second and later calls on the same mesh are no-ops.
    pub fn destroy_mesh<B: GraphicsBackend>(&mut self, backend: &B, mesh: &mut GpuMesh<B>) {
        let freed = mesh.release(backend);
        self.live_buffers = self.live_buffers.saturating_sub(freed);
    }

    /// Second and later calls on the same texture are no-ops.
    pub fn destroy_texture<B: GraphicsBackend>(&mut self, backend: &B, texture: &mut GpuTexture<B>) {
        if texture.release(backend) {
            self.live_textures = self.live_textures.saturating_sub(1);
        }
    }

    pub fn destroy_renderable<B: GraphicsBackend>(
        &mut self,
        backend: &B,
        renderable: &mut RenderableMesh<B>
    ) {
        self.destroy_mesh(backend, &mut renderable.mesh);
        if let Some(texture) = renderable.texture.as_mut() {
            self.destroy_texture(backend, texture);
        }
    }

    /// True when nothing created here is still alive.
    pub fn is_empty(&self) -> bool {
        self.live_buffers == 0 && self.live_textures == 0
    }
}
