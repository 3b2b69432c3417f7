//! Translation of `winit` window events into [`GuiEvent`]s

use std::collections::HashSet;
use std::time::Instant;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::{EventKind, GuiEvent, Key, MouseButton};

/// Tracks pointer, button and modifier state across window events
///
/// Positions are flipped so that y grows upward from the bottom of the window.
pub struct WinitInputAdapter {
    cursor: (f32, f32),
    window_size: (f32, f32),
    buttons: HashSet<MouseButton>,
    shift_held: bool,
    start: Instant,
}

impl WinitInputAdapter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor: (0.0, 0.0),
            window_size: (width as f32, height as f32),
            buttons: HashSet::new(),
            shift_held: false,
            start: Instant::now(),
        }
    }

    /// Translate one window event; events with no counterpart yield `None`
    pub fn translate(&mut self, event: &WindowEvent) -> Option<GuiEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    _ => return None,
                };
                Some(self.mouse_button(button, *state == ElementState::Pressed))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 20.0,
                };
                Some(self.scroll(lines))
            }
            WindowEvent::Resized(size) => Some(self.resized(size.width, size.height)),
            WindowEvent::CloseRequested => Some(self.stamp(GuiEvent::close_window())),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => key_from_code(code),
                    PhysicalKey::Unidentified(_) => Key::Other,
                };
                Some(self.key(key, event.state == ElementState::Pressed))
            }
            _ => None,
        }
    }

    /// Pointer moved to window pixel `(x, y_down)` (origin top-left)
    pub fn cursor_moved(&mut self, x: f32, y_down: f32) -> GuiEvent {
        self.cursor = (x, self.window_size.1 - y_down);
        let event = match self.held_button() {
            Some(button) => GuiEvent::drag(0.0, 0.0, button),
            None => GuiEvent::moved(0.0, 0.0),
        };
        self.stamp(event)
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) -> GuiEvent {
        let kind = if pressed {
            self.buttons.insert(button);
            EventKind::Push
        } else {
            self.buttons.remove(&button);
            EventKind::Release
        };
        self.stamp(GuiEvent {
            button: Some(button),
            ..GuiEvent::new(kind)
        })
    }

    pub fn scroll(&mut self, lines: f32) -> GuiEvent {
        self.stamp(GuiEvent::scroll(lines))
    }

    pub fn resized(&mut self, width: u32, height: u32) -> GuiEvent {
        self.window_size = (width as f32, height as f32);
        self.stamp(GuiEvent::new(EventKind::Resize))
    }

    pub fn key(&mut self, key: Key, pressed: bool) -> GuiEvent {
        if key == Key::Shift {
            self.shift_held = pressed;
        }
        let event = if pressed {
            GuiEvent::key_down(key)
        } else {
            GuiEvent::key_up(key)
        };
        self.stamp(event)
    }

    fn held_button(&self) -> Option<MouseButton> {
        [MouseButton::Left, MouseButton::Middle, MouseButton::Right]
            .into_iter()
            .find(|b| self.buttons.contains(b))
    }

    /// Fill in position, window extent, modifiers and time
    fn stamp(&self, event: GuiEvent) -> GuiEvent {
        GuiEvent {
            x: self.cursor.0,
            y: self.cursor.1,
            window_width: self.window_size.0,
            window_height: self.window_size.1,
            shift: self.shift_held,
            time: self.start.elapsed().as_secs_f64(),
            ..event
        }
    }
}

fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::KeyA => Key::Character('a'),
        KeyCode::KeyC => Key::Character('c'),
        KeyCode::KeyS => Key::Character('s'),
        KeyCode::KeyW => Key::Character('w'),
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_is_flipped() {
        let mut adapter = WinitInputAdapter::new(800, 600);
        let event = adapter.cursor_moved(100.0, 50.0);
        assert_eq!(event.kind, EventKind::Move);
        assert_eq!(event.position(), (100.0, 550.0));
    }

    #[test]
    fn test_motion_with_button_held_is_drag() {
        let mut adapter = WinitInputAdapter::new(800, 600);
        adapter.cursor_moved(10.0, 10.0);
        let push = adapter.mouse_button(MouseButton::Left, true);
        assert_eq!(push.kind, EventKind::Push);
        assert_eq!(push.position(), (10.0, 590.0));

        let drag = adapter.cursor_moved(20.0, 10.0);
        assert_eq!(drag.kind, EventKind::Drag);
        assert_eq!(drag.button, Some(MouseButton::Left));

        adapter.mouse_button(MouseButton::Left, false);
        assert_eq!(adapter.cursor_moved(30.0, 10.0).kind, EventKind::Move);
    }

    #[test]
    fn test_shift_tracked_from_keys() {
        let mut adapter = WinitInputAdapter::new(800, 600);
        adapter.key(Key::Shift, true);
        assert!(adapter.cursor_moved(0.0, 0.0).shift);
        adapter.key(Key::Shift, false);
        assert!(!adapter.cursor_moved(0.0, 0.0).shift);
    }

    #[test]
    fn test_resize_updates_extent() {
        let mut adapter = WinitInputAdapter::new(800, 600);
        let event = adapter.resized(1024, 768);
        assert_eq!(event.kind, EventKind::Resize);
        assert_eq!((event.window_width, event.window_height), (1024.0, 768.0));
        assert_eq!(adapter.cursor_moved(0.0, 0.0).y, 768.0);
    }
}
