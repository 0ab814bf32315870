pub mod camera;
pub mod interaction_state;
pub mod light;
pub mod material;
pub mod mesh;
pub mod renderable;
pub mod texture;

pub use camera::Camera;
pub use interaction_state::{ Command, InputEvent, InputSettings, InteractionState, Toggle };
pub use light::Light;
pub use material::Material;
pub use mesh::{ GpuMesh, MeshData, VertexAttribute, VertexLayout };
pub use renderable::RenderableMesh;
pub use texture::{ GpuTexture, TextureImage };
