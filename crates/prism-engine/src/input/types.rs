/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic pointer event fed into [`PointerState`](super::PointerState).
///
/// Coordinates are logical pixels in window space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Moved { x: f32, y: f32 },
    Left,
    Button {
        button: MouseButton,
        state: MouseButtonState,
        x: f32,
        y: f32,
    },
}

/// Snapshot of the pointer forwarded to a scene alongside button events.
///
/// `x`/`y` are in whatever space the forwarder chose (the sandbox forwards
/// panel-local render-target pixels).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerSnapshot {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub right_down: bool,
}
