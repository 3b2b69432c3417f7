//! # GUI Events
//!
//! Window-system input translated into [`GuiEvent`]s and dispatched to
//! [`EventHandler`]s. Coordinates are window pixels with the origin at the
//! bottom-left corner (y up); [`GuiEvent::x_normalized`] and
//! [`GuiEvent::y_normalized`] map them to normalized device coordinates.
//!
//! Handlers run in registration order and the first one returning `true`
//! consumes the event.

pub mod pick_handler;
pub mod winit_input;

pub use pick_handler::{PickHandler, PickState};
pub use winit_input::WinitInputAdapter;

use std::collections::VecDeque;

use crate::gfx::camera::Camera;
use crate::gfx::picking::{self, Intersection, Selection};
use crate::gfx::scene::NodeRef;
use crate::gfx::visitor::FrameStamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Mouse button pressed
    Push,
    /// Mouse button released
    Release,
    DoubleClick,
    /// Pointer moved with no button held
    Move,
    /// Pointer moved with a button held
    Drag,
    Scroll,
    KeyDown,
    KeyUp,
    Resize,
    CloseWindow,
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Shift,
    Character(char),
    Other,
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuiEvent {
    pub kind: EventKind,
    /// Pointer position in window pixels, y up
    pub x: f32,
    pub y: f32,
    /// Window extent the position refers to
    pub window_width: f32,
    pub window_height: f32,
    pub button: Option<MouseButton>,
    pub key: Option<Key>,
    /// Vertical scroll amount in lines; positive scrolls up
    pub scroll_delta: f32,
    pub shift: bool,
    /// Seconds since the event source started
    pub time: f64,
}

impl GuiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            x: 0.0,
            y: 0.0,
            window_width: 800.0,
            window_height: 600.0,
            button: None,
            key: None,
            scroll_delta: 0.0,
            shift: false,
            time: 0.0,
        }
    }

    pub fn push(x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(EventKind::Push).at(x, y)
        }
    }

    pub fn release(x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(EventKind::Release).at(x, y)
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(EventKind::Move).at(x, y)
    }

    pub fn drag(x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(EventKind::Drag).at(x, y)
        }
    }

    pub fn scroll(delta: f32) -> Self {
        Self {
            scroll_delta: delta,
            ..Self::new(EventKind::Scroll)
        }
    }

    pub fn key_down(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown)
        }
    }

    pub fn key_up(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyUp)
        }
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Self::new(EventKind::Resize).with_window(width as f32, height as f32)
    }

    pub fn close_window() -> Self {
        Self::new(EventKind::CloseWindow)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_window(mut self, width: f32, height: f32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn at_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Pointer x in [-1, 1]
    pub fn x_normalized(&self) -> f32 {
        normalize(self.x, self.window_width)
    }

    /// Pointer y in [-1, 1], +1 at the top of the window
    pub fn y_normalized(&self) -> f32 {
        normalize(self.y, self.window_height)
    }
}

fn normalize(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        0.0
    } else {
        2.0 * v / extent - 1.0
    }
}

/// FIFO of events waiting for the next frame
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<GuiEvent>,
    window_width: f32,
    window_height: f32,
}

impl EventQueue {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            events: VecDeque::new(),
            window_width: window_width as f32,
            window_height: window_height as f32,
        }
    }

    /// Queue an event, stamping it with the current window extent unless it is a resize
    pub fn push(&mut self, mut event: GuiEvent) {
        if event.kind == EventKind::Resize {
            self.window_width = event.window_width;
            self.window_height = event.window_height;
        } else {
            event.window_width = self.window_width;
            event.window_height = self.window_height;
        }
        self.events.push_back(event);
    }

    pub fn mouse_push(&mut self, x: f32, y: f32, button: MouseButton) {
        self.push(GuiEvent::push(x, y, button));
    }

    pub fn mouse_release(&mut self, x: f32, y: f32, button: MouseButton) {
        self.push(GuiEvent::release(x, y, button));
    }

    pub fn mouse_motion(&mut self, x: f32, y: f32) {
        self.push(GuiEvent::moved(x, y));
    }

    pub fn close_window(&mut self) {
        self.push(GuiEvent::close_window());
    }

    pub fn pop(&mut self) -> Option<GuiEvent> {
        self.events.pop_front()
    }

    pub fn take_all(&mut self) -> Vec<GuiEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.window_width, self.window_height)
    }
}

/// What handlers may read and change while processing an event
pub struct ActionContext<'a> {
    pub scene: Option<&'a NodeRef>,
    pub camera: &'a mut Camera,
    pub selection: &'a mut Selection,
    pub frame: FrameStamp,
    pub pick_tolerance: f32,
    done: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        scene: Option<&'a NodeRef>,
        camera: &'a mut Camera,
        selection: &'a mut Selection,
        frame: FrameStamp,
        pick_tolerance: f32,
    ) -> Self {
        Self {
            scene,
            camera,
            selection,
            frame,
            pick_tolerance,
            done: false,
        }
    }

    /// Nearest scene intersection under `(x, y)` in normalized device coordinates
    pub fn pick(&self, x: f32, y: f32) -> Option<Intersection> {
        let scene = self.scene?;
        picking::pick(scene, self.camera.view_projection(), x, y, self.pick_tolerance)
    }

    /// Ask the viewer to stop after this frame
    pub fn request_done(&mut self) {
        self.done = true;
    }

    pub fn done_requested(&self) -> bool {
        self.done
    }
}

/// Callback bound to GUI events
pub trait EventHandler {
    /// Returns `true` when the event was consumed
    fn handle(&mut self, event: &GuiEvent, ctx: &mut ActionContext<'_>) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&GuiEvent, &mut ActionContext<'_>) -> bool,
{
    fn handle(&mut self, event: &GuiEvent, ctx: &mut ActionContext<'_>) -> bool {
        self(event, ctx)
    }
}
