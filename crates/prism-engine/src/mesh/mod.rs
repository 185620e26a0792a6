//! Triangle mesh data, Wavefront OBJ loading, and GPU buffer upload.

mod mesh;
mod model;
mod obj;
mod vertex;

pub use mesh::Mesh;
pub use model::Model;
pub use obj::{load_obj, parse_obj, LoadOptions, MeshData, ObjError};
pub use vertex::Vertex;
