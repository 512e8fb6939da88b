//! Input handling.
//!
//! [`Input`] turns raw window events into the two things the scene cares
//! about: a new pointer position and a request to move on to the next
//! pattern. It never touches particle data itself.
//!
//! | Event | Action |
//! |-------|--------|
//! | cursor move | pointer update |
//! | left button down | trigger |
//! | touch start | pointer update + trigger |
//! | touch move | pointer update |
//! | Escape | exit |

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::pointer::normalize_screen;

/// What an input event asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// The pointer moved to this normalized position.
    Pointer(Vec2),
    /// Start the next transition, optionally moving the pointer first.
    Trigger(Option<Vec2>),
    /// Close the window.
    Exit,
}

/// Translates window events into [`InputAction`]s.
#[derive(Debug)]
pub struct Input {
    window_size: (u32, u32),
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
        }
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.pointer_moved(position.x, position.y),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*state, *button),
            WindowEvent::Touch(touch) => {
                self.touch(touch.phase, touch.location.x, touch.location.y)
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let escape = event.physical_key == PhysicalKey::Code(KeyCode::Escape);
                (escape && event.state == ElementState::Pressed).then_some(InputAction::Exit)
            }
            _ => None,
        }
    }

    fn ndc(&self, x: f64, y: f64) -> Option<Vec2> {
        let (w, h) = self.window_size;
        normalize_screen(x, y, w, h)
    }

    pub(crate) fn pointer_moved(&self, x: f64, y: f64) -> Option<InputAction> {
        self.ndc(x, y).map(InputAction::Pointer)
    }

    pub(crate) fn mouse_button(&self, state: ElementState, button: MouseButton) -> Option<InputAction> {
        (state == ElementState::Pressed && button == MouseButton::Left).then_some(InputAction::Trigger(None))
    }

    pub(crate) fn touch(&self, phase: TouchPhase, x: f64, y: f64) -> Option<InputAction> {
        match phase {
            TouchPhase::Started => Some(InputAction::Trigger(self.ndc(x, y))),
            TouchPhase::Moved => self.pointer_moved(x, y),
            TouchPhase::Ended | TouchPhase::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_maps_to_ndc() {
        let input = Input::new(800, 600);
        assert_eq!(
            input.pointer_moved(0.0, 600.0),
            Some(InputAction::Pointer(Vec2::new(-1.0, -1.0)))
        );
        let Some(InputAction::Pointer(center)) = input.pointer_moved(400.0, 300.0) else {
            panic!("expected a pointer action");
        };
        assert!(center.length() < 1e-6);
    }

    #[test]
    fn test_left_press_triggers() {
        let input = Input::new(800, 600);
        assert_eq!(
            input.mouse_button(ElementState::Pressed, MouseButton::Left),
            Some(InputAction::Trigger(None))
        );
        assert_eq!(input.mouse_button(ElementState::Released, MouseButton::Left), None);
        assert_eq!(input.mouse_button(ElementState::Pressed, MouseButton::Right), None);
    }

    #[test]
    fn test_touch_phases() {
        let input = Input::new(100, 100);
        assert_eq!(
            input.touch(TouchPhase::Started, 100.0, 0.0),
            Some(InputAction::Trigger(Some(Vec2::new(1.0, 1.0))))
        );
        assert_eq!(
            input.touch(TouchPhase::Moved, 50.0, 50.0),
            Some(InputAction::Pointer(Vec2::ZERO))
        );
        assert_eq!(input.touch(TouchPhase::Ended, 50.0, 50.0), None);
    }

    #[test]
    fn test_zero_sized_window_ignores_pointer() {
        let mut input = Input::new(800, 600);
        input.set_window_size(0, 0);
        assert_eq!(input.pointer_moved(10.0, 10.0), None);
        assert_eq!(
            input.touch(TouchPhase::Started, 10.0, 10.0),
            Some(InputAction::Trigger(None))
        );
    }
}
