//! Prism engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the sandbox app:
//! device/surface management, the window runtime loop, pointer input, frame
//! timing, coordinate mapping, the off-screen render target, shader program
//! construction, and OBJ mesh loading.

pub mod device;
pub mod window;
pub mod input;
pub mod time;

pub mod logging;
pub mod coords;
pub mod render;
pub mod shader;
pub mod mesh;
