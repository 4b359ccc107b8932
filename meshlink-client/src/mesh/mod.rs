mod mesh;
mod mesh_command;
mod mesh_handle;

pub use mesh::*;
pub use mesh_command::*;
pub use mesh_handle::*;
