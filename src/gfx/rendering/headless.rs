use std::collections::VecDeque;

use super::{RenderBackend, RenderStats};
use crate::error::{Error, Result};
use crate::gfx::camera::{Camera, CameraUniform};
use crate::gfx::events::{EventQueue, GuiEvent};
use crate::gfx::geometry::Vertex3D;
use crate::gfx::scene::NodeRef;
use crate::gfx::visitor::collect::{collect_drawables, DrawList};

/// Windowless backend
///
/// Scripted events are delivered at the frame they are scheduled for. Once
/// `max_frames` frames have been rendered a close-window event is queued.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    script: VecDeque<(u64, GuiEvent)>,
    max_frames: Option<u64>,
    frames_rendered: u64,
    close_sent: bool,
    last_draw_list: DrawList,
    last_uniform: CameraUniform,
    total_uploaded_bytes: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Deliver `event` before frame `frame` (0-based) is processed
    pub fn schedule(&mut self, frame: u64, event: GuiEvent) {
        let at = self.script.partition_point(|(f, _)| *f <= frame);
        self.script.insert(at, (frame, event));
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Draw list built for the most recent frame
    pub fn last_draw_list(&self) -> &DrawList {
        &self.last_draw_list
    }

    pub fn last_uniform(&self) -> &CameraUniform {
        &self.last_uniform
    }

    pub fn total_uploaded_bytes(&self) -> usize {
        self.total_uploaded_bytes
    }
}

impl RenderBackend for HeadlessRenderer {
    fn poll_events(&mut self, queue: &mut EventQueue) {
        while self
            .script
            .front()
            .is_some_and(|(frame, _)| *frame <= self.frames_rendered)
        {
            if let Some((_, event)) = self.script.pop_front() {
                queue.push(event);
            }
        }

        if !self.close_sent && self.max_frames.is_some_and(|max| self.frames_rendered >= max) {
            log::debug!("Headless renderer reached {} frames", self.frames_rendered);
            queue.close_window();
            self.close_sent = true;
        }
    }

    fn render(&mut self, scene: Option<&NodeRef>, camera: &Camera) -> Result<RenderStats> {
        let draw_list = match scene {
            Some(root) => collect_drawables(root),
            None => DrawList::default(),
        };

        let mut stats = RenderStats::default();
        for item in &draw_list.items {
            let node = item.node.borrow();
            let geometry = node.drawables().get(item.drawable_index).ok_or_else(|| {
                Error::Render(format!(
                    "draw item refers to missing drawable {} of '{}'",
                    item.drawable_index,
                    node.name()
                ))
            })?;

            let vertices: Vec<Vertex3D> = geometry.to_vertices();
            stats.uploaded_bytes += bytemuck::cast_slice::<Vertex3D, u8>(&vertices).len();
            stats.vertex_count += vertices.len() as u32;
            stats.draw_calls += geometry.primitive_sets.len() as u32;
        }

        self.last_uniform = camera.uniform();
        stats.uploaded_bytes += bytemuck::bytes_of(&self.last_uniform).len();

        self.total_uploaded_bytes += stats.uploaded_bytes;
        self.last_draw_list = draw_list;
        self.frames_rendered += 1;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::events::{EventKind, MouseButton};
    use crate::gfx::geometry::{create_quad, PrimitiveMode, PrimitiveSet, Vertex3D};

    #[test]
    fn test_render_counts_vertices_and_bytes() {
        let geode = NodeRef::geode(vec![create_quad()]);
        let root = NodeRef::group();
        root.add_child(&geode);

        let mut renderer = HeadlessRenderer::new();
        let stats = renderer.render(Some(&root), &Camera::default()).unwrap();

        assert_eq!(stats.vertex_count, 4);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(
            stats.uploaded_bytes,
            4 * std::mem::size_of::<Vertex3D>() + std::mem::size_of::<CameraUniform>()
        );
        assert_eq!(renderer.last_draw_list().len(), 1);
    }

    #[test]
    fn test_draw_calls_count_primitive_sets() {
        let mut geometry = create_quad();
        geometry.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::LineLoop, 0, 4));
        let root = NodeRef::group();
        root.add_child(&NodeRef::geode(vec![geometry, create_quad()]));

        let stats = HeadlessRenderer::new()
            .render(Some(&root), &Camera::default())
            .unwrap();
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.vertex_count, 8);
    }

    #[test]
    fn test_scripted_events_and_close() {
        let mut renderer = HeadlessRenderer::new().with_max_frames(2);
        renderer.schedule(1, GuiEvent::release(1.0, 1.0, MouseButton::Left));
        renderer.schedule(0, GuiEvent::push(1.0, 1.0, MouseButton::Left));

        let mut queue = EventQueue::new(800, 600);
        renderer.poll_events(&mut queue);
        assert_eq!(queue.pop().map(|e| e.kind), Some(EventKind::Push));
        assert!(queue.is_empty());

        renderer.render(None, &Camera::default()).unwrap();
        renderer.poll_events(&mut queue);
        assert_eq!(queue.pop().map(|e| e.kind), Some(EventKind::Release));

        renderer.render(None, &Camera::default()).unwrap();
        renderer.poll_events(&mut queue);
        assert_eq!(queue.pop().map(|e| e.kind), Some(EventKind::CloseWindow));

        // Only one close request
        renderer.poll_events(&mut queue);
        assert!(queue.is_empty());
    }
}
