use std::collections::HashSet;

use super::types::{MouseButton, MouseButtonState, PointerEvent};

/// Current pointer state for a single window.
///
/// Holds "is down" information and the current pointer position in
/// window-space logical pixels. Fed by the runtime from platform events.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Pointer position, `None` while the cursor is outside the window.
    pub pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl PointerState {
    /// Applies a pointer event to the current state.
    pub fn apply_event(&mut self, ev: PointerEvent) {
        match ev {
            PointerEvent::Moved { x, y } => {
                self.pos = Some((x, y));
            }

            PointerEvent::Left => {
                self.pos = None;
            }

            PointerEvent::Button { button, state, x, y } => {
                self.pos = Some((x, y));
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(&button);
                    }
                }
            }
        }
    }

    /// Clears held buttons, e.g. on focus loss, avoiding stuck buttons.
    pub fn release_all(&mut self) {
        self.buttons_down.clear();
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_then_leave_clears_position() {
        let mut st = PointerState::default();
        st.apply_event(PointerEvent::Moved { x: 3.0, y: 4.0 });
        assert_eq!(st.pos, Some((3.0, 4.0)));
        st.apply_event(PointerEvent::Left);
        assert_eq!(st.pos, None);
    }

    #[test]
    fn press_and_release_track_button_set() {
        let mut st = PointerState::default();
        st.apply_event(PointerEvent::Button {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 1.0,
            y: 2.0,
        });
        assert!(st.button_down(MouseButton::Left));

        st.apply_event(PointerEvent::Button {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            x: 1.0,
            y: 2.0,
        });
        assert!(!st.button_down(MouseButton::Left));
    }

    #[test]
    fn release_all_clears_held_buttons() {
        let mut st = PointerState::default();
        st.apply_event(PointerEvent::Button {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        });
        st.release_all();
        assert!(st.buttons_down.is_empty());
    }
}
