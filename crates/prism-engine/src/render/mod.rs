//! Off-screen rendering.
//!
//! Scenes never draw to the window surface directly; they render into a
//! [`RenderTarget`] whose color attachment the UI layer displays as an image
//! inside a resizable panel.

mod ctx;
mod target;

pub use ctx::RenderCtx;
pub use target::{RenderTarget, TARGET_COLOR_FORMAT, TARGET_DEPTH_FORMAT};
