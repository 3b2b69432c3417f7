use cgmath::Deg;
use std::time::Instant;

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::gfx::{
    camera::{Camera, OrbitManipulator},
    events::{ActionContext, EventHandler, EventKind, EventQueue, GuiEvent, Key},
    picking::Selection,
    rendering::RenderBackend,
    scene::NodeRef,
    visitor::{self, FrameStamp, UpdateVisitor},
};
use crate::performance::FrameStats;

/// Frame-driven scene viewer
///
/// Owns the scene root, the camera and its manipulator, the registered event
/// handlers and the current selection. Each [`frame`](Viewer::frame) handles
/// queued events, runs the update traversal and asks the backend to render.
pub struct Viewer {
    config: ViewerConfig,
    scene: Option<NodeRef>,
    camera: Camera,
    handlers: Vec<Box<dyn EventHandler>>,
    manipulator: Option<Box<dyn EventHandler>>,
    event_queue: EventQueue,
    selection: Selection,
    frame_stamp: FrameStamp,
    stats: FrameStats,
    done: bool,
    start: Instant,
}

impl Viewer {
    /// Create a viewer with an orbit manipulator and no scene
    pub fn new(config: ViewerConfig) -> Self {
        let mut camera = Camera::new(
            config.window_width,
            config.window_height,
            Deg(config.fovy),
            config.znear,
            config.zfar,
        );
        camera.set_clear_color(config.clear_color);

        Self {
            event_queue: EventQueue::new(config.window_width, config.window_height),
            stats: FrameStats::new(config.stats_window),
            camera,
            scene: None,
            handlers: Vec::new(),
            manipulator: Some(Box::new(OrbitManipulator::default())),
            selection: Selection::default(),
            frame_stamp: FrameStamp::default(),
            done: false,
            start: Instant::now(),
            config,
        }
    }

    /// Set the root of the graph to update and render
    ///
    /// The default manipulator frames the scene on the first frame it sees.
    pub fn set_scene_data(&mut self, root: NodeRef) {
        log::debug!("Scene data set to {:?}", root);
        self.scene = Some(root);
    }

    pub fn scene_data(&self) -> Option<&NodeRef> {
        self.scene.as_ref()
    }

    /// Register a handler; handlers run in registration order, before the manipulator
    pub fn add_event_handler(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn set_camera_manipulator(&mut self, manipulator: impl EventHandler + 'static) {
        self.manipulator = Some(Box::new(manipulator));
    }

    /// Remove the manipulator, leaving the camera wherever it was put
    pub fn clear_camera_manipulator(&mut self) {
        self.manipulator = None;
    }

    /// Replace the selection, e.g. to attach a different callback on pick
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection.clear();
        self.selection = selection;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn event_queue(&mut self) -> &mut EventQueue {
        &mut self.event_queue
    }

    pub fn frame_stamp(&self) -> &FrameStamp {
        &self.frame_stamp
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Run one frame: events, update traversal, render
    pub fn frame(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.stats.begin_frame();

        self.frame_stamp
            .advance(self.start.elapsed().as_secs_f64());
        self.event_queue.push(GuiEvent::new(EventKind::Frame));
        self.dispatch_events();

        if let Some(root) = &self.scene {
            let mut update = UpdateVisitor::new(self.frame_stamp);
            visitor::traverse(root, &mut update);
            log::trace!(
                "Frame {}: {} update callback(s)",
                self.frame_stamp.frame_number,
                update.callbacks_run()
            );
        }

        let stats = backend.render(self.scene.as_ref(), &self.camera)?;
        self.stats.update_render_stats(stats.draw_calls, stats.vertex_count);
        self.stats.end_frame();
        Ok(())
    }

    /// Poll and render frames until a handler or the window asks to stop
    pub fn run(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        log::info!("Starting viewer '{}'", self.config.window_title);
        while !self.done {
            backend.poll_events(&mut self.event_queue);
            self.frame(backend)?;
        }
        self.stats.log_summary();
        Ok(())
    }

    fn dispatch_events(&mut self) {
        for event in self.event_queue.take_all() {
            match event.kind {
                EventKind::Resize => {
                    self.camera
                        .resize(event.window_width as u32, event.window_height as u32);
                }
                EventKind::CloseWindow => {
                    log::info!("Window closed");
                    self.done = true;
                }
                EventKind::KeyDown
                    if event.key == Some(Key::Escape) && self.config.escape_sets_done =>
                {
                    self.done = true;
                }
                _ => {}
            }

            let mut ctx = ActionContext::new(
                self.scene.as_ref(),
                &mut self.camera,
                &mut self.selection,
                self.frame_stamp,
                self.config.pick_tolerance,
            );

            let consumed = self
                .handlers
                .iter_mut()
                .chain(self.manipulator.iter_mut())
                .any(|handler| handler.handle(&event, &mut ctx));
            if consumed {
                log::trace!("{:?} consumed", event.kind);
            }

            if ctx.done_requested() {
                self.done = true;
            }
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
