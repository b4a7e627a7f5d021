// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
pub mod renderer;

pub use memory::InMemoryDataSource;
pub use renderer::DebugRenderer;
