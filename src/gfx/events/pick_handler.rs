//! Click-to-select
//!
//! A release at exactly the press position is a click and triggers a pick; any
//! other release was a drag and is left for the camera manipulator. There is
//! no distance threshold and no timing.

use super::{ActionContext, EventHandler, EventKind, GuiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickState {
    #[default]
    Idle,
    Pressed,
}

#[derive(Debug, Default)]
pub struct PickHandler {
    state: PickState,
    press_position: (f32, f32),
    last_position: (f32, f32),
    pick_count: usize,
}

impl PickHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn last_position(&self) -> (f32, f32) {
        self.last_position
    }

    /// Number of pick queries performed so far
    pub fn pick_count(&self) -> usize {
        self.pick_count
    }
}

impl EventHandler for PickHandler {
    fn handle(&mut self, event: &GuiEvent, ctx: &mut ActionContext<'_>) -> bool {
        match event.kind {
            EventKind::Push => {
                self.state = PickState::Pressed;
                self.press_position = event.position();
                self.last_position = event.position();
                false
            }
            EventKind::Move | EventKind::Drag => {
                self.last_position = event.position();
                false
            }
            EventKind::Release => {
                let was_pressed = self.state == PickState::Pressed;
                self.state = PickState::Idle;
                self.last_position = event.position();

                if !was_pressed || event.position() != self.press_position {
                    return false;
                }

                self.pick_count += 1;
                let hit = ctx.pick(event.x_normalized(), event.y_normalized());
                ctx.selection.apply(hit.as_ref()).is_selected()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use crate::gfx::events::MouseButton;
    use crate::gfx::picking::Selection;
    use crate::gfx::visitor::FrameStamp;

    fn run(handler: &mut PickHandler, events: &[GuiEvent]) -> Vec<bool> {
        let mut camera = Camera::default();
        let mut selection = Selection::default();
        let mut ctx = ActionContext::new(None, &mut camera, &mut selection, FrameStamp::default(), 0.05);
        events.iter().map(|e| handler.handle(e, &mut ctx)).collect()
    }

    #[test]
    fn test_click_triggers_pick() {
        let mut handler = PickHandler::new();
        let consumed = run(
            &mut handler,
            &[
                GuiEvent::push(10.0, 10.0, MouseButton::Left),
                GuiEvent::moved(10.0, 10.0),
                GuiEvent::release(10.0, 10.0, MouseButton::Left),
            ],
        );

        assert_eq!(handler.pick_count(), 1);
        // No scene: the pick misses, so nothing is consumed
        assert_eq!(consumed, vec![false, false, false]);
        assert_eq!(handler.state(), PickState::Idle);
    }

    #[test]
    fn test_drag_does_not_pick() {
        let mut handler = PickHandler::new();
        run(
            &mut handler,
            &[
                GuiEvent::push(10.0, 10.0, MouseButton::Left),
                GuiEvent::release(50.0, 50.0, MouseButton::Left),
            ],
        );
        assert_eq!(handler.pick_count(), 0);
    }

    #[test]
    fn test_drag_back_to_press_position_is_a_click() {
        let mut handler = PickHandler::new();
        run(
            &mut handler,
            &[
                GuiEvent::push(10.0, 10.0, MouseButton::Left),
                GuiEvent::drag(30.0, 30.0, MouseButton::Left),
                GuiEvent::drag(10.0, 10.0, MouseButton::Left),
                GuiEvent::release(10.0, 10.0, MouseButton::Left),
            ],
        );
        assert_eq!(handler.pick_count(), 1);
        assert_eq!(handler.last_position(), (10.0, 10.0));
    }

    #[test]
    fn test_push_and_move_are_not_consumed() {
        let mut handler = PickHandler::new();
        let consumed = run(
            &mut handler,
            &[GuiEvent::push(1.0, 2.0, MouseButton::Left), GuiEvent::moved(3.0, 4.0)],
        );
        assert_eq!(consumed, vec![false, false]);
        assert_eq!(handler.state(), PickState::Pressed);
        assert_eq!(handler.last_position(), (3.0, 4.0));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut handler = PickHandler::new();
        run(&mut handler, &[GuiEvent::release(0.0, 0.0, MouseButton::Left)]);
        assert_eq!(handler.pick_count(), 0);
    }
}
