//! Window + runtime loop.
//!
//! Owns the winit EventLoop and the single application window, and wires
//! them to the GPU layer. One window, one active frame at a time; the whole
//! engine is single-threaded and synchronous.

mod runtime;

pub use runtime::{App, AppControl, EventResponse, FrameCtx, Runtime, RuntimeConfig};
