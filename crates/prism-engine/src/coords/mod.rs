//! Coordinate types shared between the runtime, the render target, and the UI.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down

mod panel;
mod rect;
mod vec2;

pub use panel::PanelMapping;
pub use rect::Rect;
pub use vec2::Vec2;
