//! Pointer input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The
//! runtime translates platform events into `PointerEvent`s; keyboard and
//! text input are owned by the UI layer in the sandbox and are not tracked
//! here.

mod state;
mod types;

pub use state::PointerState;
pub use types::{MouseButton, MouseButtonState, PointerEvent, PointerSnapshot};
