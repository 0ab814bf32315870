pub mod resource_manager;

pub use resource_manager::ResourceManager;
