//! Shader sources and validated program construction.
//!
//! Shader files use a directive-delimited two-section format: a line reading
//! `#shader vertex` or `#shader fragment` opens the respective WGSL section,
//! which runs until the next directive or end of file. The same file format
//! drives both the built-in scene pipelines and the live-edited workbench
//! shaders.

mod program;
mod source;

pub use program::{Program, ProgramDesc};
pub use source::ShaderSource;
