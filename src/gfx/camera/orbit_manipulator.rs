use super::orbit_camera::OrbitCamera;
use crate::gfx::events::{ActionContext, EventHandler, EventKind, GuiEvent, Key, MouseButton};
use crate::gfx::visitor::bounds::compute_bound;

/// Mouse-driven orbit camera
///
/// Left drag rotates, shift + left drag or middle drag pans, scrolling zooms
/// and Space returns to the home view framing the whole scene.
pub struct OrbitManipulator {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    camera: OrbitCamera,
    last_position: Option<(f32, f32)>,
    homed: bool,
}

impl OrbitManipulator {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            camera: OrbitCamera::default(),
            last_position: None,
            homed: false,
        }
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Frame the scene and write the resulting view into the context's camera
    pub fn home(&mut self, ctx: &mut ActionContext<'_>) {
        match ctx.scene {
            Some(scene) => self.camera.home(&compute_bound(scene)),
            None => self.camera = OrbitCamera::default(),
        }
        self.homed = true;
        ctx.camera.view = self.camera.view_matrix();
    }

    /// Whether the first frame has already framed the scene
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    fn drag(&mut self, event: &GuiEvent) {
        let (x, y) = event.position();
        let Some((last_x, last_y)) = self.last_position.replace((x, y)) else {
            return;
        };
        let (dx, dy) = (x - last_x, y - last_y);

        let pan = event.button == Some(MouseButton::Middle)
            || (event.button == Some(MouseButton::Left) && event.shift);
        if pan {
            // SHIFT + DRAG = PAN (move focus point)
            self.camera.pan((-dx * self.pan_speed, -dy * self.pan_speed));
        } else if event.button == Some(MouseButton::Left) {
            // NORMAL DRAG = ROTATE (orbit around focus)
            self.camera.add_yaw(-dx * self.rotate_speed);
            self.camera.add_pitch(-dy * self.rotate_speed);
        } else {
            // Right drag zooms
            self.camera.add_distance(dy * self.zoom_speed * 0.1);
        }
    }
}

impl Default for OrbitManipulator {
    fn default() -> Self {
        Self::new(0.01, 0.1)
    }
}

impl EventHandler for OrbitManipulator {
    fn handle(&mut self, event: &GuiEvent, ctx: &mut ActionContext<'_>) -> bool {
        let consumed = match event.kind {
            EventKind::Frame if !self.homed => {
                self.home(ctx);
                false
            }
            EventKind::Push => {
                self.last_position = Some(event.position());
                false
            }
            EventKind::Release => {
                self.last_position = None;
                false
            }
            EventKind::Drag => {
                self.drag(event);
                true
            }
            EventKind::Scroll => {
                self.camera.add_distance(-event.scroll_delta * self.zoom_speed);
                true
            }
            EventKind::KeyDown if event.key == Some(Key::Space) => {
                self.home(ctx);
                true
            }
            _ => return false,
        };

        ctx.camera.view = self.camera.view_matrix();
        consumed
    }
}

impl std::fmt::Debug for OrbitManipulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitManipulator")
            .field("target", &self.camera.target)
            .field("distance", &self.camera.distance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use crate::gfx::geometry::create_quad;
    use crate::gfx::picking::Selection;
    use crate::gfx::scene::NodeRef;
    use crate::gfx::visitor::FrameStamp;
    use cgmath::Vector3;

    fn with_ctx<R>(scene: Option<&NodeRef>, f: impl FnOnce(&mut ActionContext<'_>) -> R) -> (R, Camera) {
        let mut camera = Camera::default();
        let mut selection = Selection::default();
        let r = {
            let mut ctx = ActionContext::new(scene, &mut camera, &mut selection, FrameStamp::default(), 0.05);
            f(&mut ctx)
        };
        (r, camera)
    }

    #[test]
    fn test_drag_rotates_and_is_consumed() {
        let mut manip = OrbitManipulator::default();
        let yaw_before = manip.orbit().yaw;

        let (consumed, camera) = with_ctx(None, |ctx| {
            assert!(!manip.handle(&GuiEvent::push(100.0, 100.0, MouseButton::Left), ctx));
            manip.handle(&GuiEvent::drag(150.0, 100.0, MouseButton::Left), ctx)
        });

        assert!(consumed);
        assert!(manip.orbit().yaw < yaw_before);
        assert_eq!(camera.view, manip.orbit().view_matrix());
    }

    #[test]
    fn test_scroll_zooms() {
        let mut manip = OrbitManipulator::default();
        let before = manip.orbit().distance;
        with_ctx(None, |ctx| manip.handle(&GuiEvent::scroll(1.0), ctx));
        assert!(manip.orbit().distance < before);
    }

    #[test]
    fn test_space_homes_on_scene() {
        let geode = NodeRef::geode(vec![create_quad()]);
        let mut manip = OrbitManipulator::default();
        manip.orbit_mut().pan((5.0, 5.0));

        let (consumed, _) = with_ctx(Some(&geode), |ctx| {
            manip.handle(&GuiEvent::key_down(Key::Space), ctx)
        });
        assert!(consumed);
        assert!(manip.is_homed());
        assert_eq!(manip.orbit().target, Vector3::new(0.0, 0.0, 0.0));
    }
}
