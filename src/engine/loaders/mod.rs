pub mod obj_loader;
pub mod texture_loader;

pub use obj_loader::{ load_mesh, load_mesh_from_reader, LayoutChoice };
pub use texture_loader::{ load_texture, load_texture_from_memory };
