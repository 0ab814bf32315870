use crate::engine::components::mesh::{ GpuMesh, VertexLayout };
use crate::engine::components::texture::GpuTexture;
use crate::engine::rendering::backend::GraphicsBackend;
use crate::engine::utils::math::{ Mat4x4, mat4x4_identity };

/// One drawable object: the mesh it owns, the diffuse texture it owns (if
/// any) and the mesh's own model offset.
#[derive(Debug)]
pub struct RenderableMesh<B: GraphicsBackend> {
    pub mesh: GpuMesh<B>,
    pub texture: Option<GpuTexture<B>>,
    pub layout: VertexLayout,
    pub intrinsic_model: Mat4x4,
}

impl<B: GraphicsBackend> RenderableMesh<B> {
    pub fn new(mesh: GpuMesh<B>, texture: Option<GpuTexture<B>>, layout: VertexLayout) -> Self {
        Self {
            mesh,
            texture,
            layout,
            intrinsic_model: mat4x4_identity(),
        }
    }

    pub fn with_intrinsic_model(mut self, model: Mat4x4) -> Self {
        self.intrinsic_model = model;
        self
    }

    pub fn is_live(&self) -> bool {
        self.mesh.is_live()
    }
}
