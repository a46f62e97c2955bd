//! Window-independent snapshot of user input.
//!
//! The event loop feeds winit events in; the camera and robot controllers read
//! held keys and drain accumulated mouse and scroll deltas once per frame.

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseScrollDelta},
    keyboard::KeyCode,
};

/// Pixel scroll deltas are converted to lines at this rate
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    mouse_delta: (f32, f32),
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held.insert(key);
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Accumulates raw device motion (y grows downward)
    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx as f32;
        self.mouse_delta.1 += dy as f32;
    }

    pub fn add_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 / PIXELS_PER_LINE,
        };
    }

    /// Returns and clears the mouse motion gathered since the last call
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Returns and clears the scroll gathered since the last call
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Forgets held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// `1.0` if only `positive` is held, `-1.0` if only `negative`, else `0.0`
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_held(KeyCode::KeyW));
        input.process_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_held(KeyCode::KeyW));
    }

    #[test]
    fn test_deltas_drain() {
        let mut input = InputState::new();
        input.add_mouse_motion(3.0, -2.0);
        input.add_mouse_motion(1.0, 1.0);
        input.add_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        input.add_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));

        assert_eq!(input.take_mouse_delta(), (4.0, -1.0));
        assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
        assert_eq!(input.take_scroll(), 4.0);
        assert_eq!(input.take_scroll(), 0.0);
    }

    #[test]
    fn test_axis() {
        let mut input = InputState::new();
        assert_eq!(input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown), 0.0);
        input.process_key(KeyCode::ArrowDown, ElementState::Pressed);
        assert_eq!(input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown), -1.0);
        input.process_key(KeyCode::ArrowUp, ElementState::Pressed);
        assert_eq!(input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown), 0.0);
        input.release_all();
        assert!(!input.is_held(KeyCode::ArrowUp));
    }
}
