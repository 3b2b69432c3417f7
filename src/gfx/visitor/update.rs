//! Update traversal
//!
//! Runs once per frame, parents before children. Nodes with an update callback
//! hand control to it; the callback decides whether the children are visited
//! by calling [`UpdateContext::traverse`]. Nodes without one are traversed
//! automatically.

use super::{NodeVisitor, Traversal};
use crate::gfx::scene::NodeRef;

/// Frame counters handed to update callbacks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStamp {
    pub frame_number: u64,
    /// Seconds since the viewer started
    pub reference_time: f64,
    /// Accumulated simulation time in seconds
    pub simulation_time: f64,
}

impl FrameStamp {
    /// Move to the next frame at `reference_time`, advancing simulation time by the gap
    pub fn advance(&mut self, reference_time: f64) {
        let dt = (reference_time - self.reference_time).max(0.0);
        self.frame_number += 1;
        self.reference_time = reference_time;
        self.simulation_time += dt;
    }
}

/// What an update callback sees of the running traversal
pub struct UpdateContext<'a> {
    frame: FrameStamp,
    visitor: &'a mut dyn NodeVisitor,
    traversal: &'a mut Traversal,
}

impl UpdateContext<'_> {
    pub fn frame(&self) -> &FrameStamp {
        &self.frame
    }

    /// Continue the update traversal into the children of `node`
    pub fn traverse(&mut self, node: &NodeRef) {
        self.traversal.traverse(node, &mut *self.visitor);
    }

    /// Path from the root to the node whose callback is running
    pub fn path(&self) -> &[NodeRef] {
        self.traversal.path()
    }
}

/// Dispatches update callbacks for one frame
#[derive(Debug, Default)]
pub struct UpdateVisitor {
    frame: FrameStamp,
    callbacks_run: usize,
}

impl UpdateVisitor {
    pub fn new(frame: FrameStamp) -> Self {
        Self {
            frame,
            callbacks_run: 0,
        }
    }

    pub fn frame(&self) -> &FrameStamp {
        &self.frame
    }

    /// Number of callbacks invoked by this visitor
    pub fn callbacks_run(&self) -> usize {
        self.callbacks_run
    }
}

impl NodeVisitor for UpdateVisitor {
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
        // Cloned out of the node so the callback can replace itself; the new
        // one runs from the next frame.
        let Some(callback) = node.update_callback() else {
            traversal.traverse(node, self);
            return;
        };

        let Ok(mut callback) = callback.try_borrow_mut() else {
            log::warn!(
                "Update callback of '{}' is already running further up the graph; skipping it",
                node.name()
            );
            traversal.traverse(node, self);
            return;
        };

        self.callbacks_run += 1;
        let frame = self.frame;
        let mut ctx = UpdateContext {
            frame,
            visitor: self,
            traversal,
        };
        callback.update(node, &mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::callback::{from_fn, CallbackRef};
    use crate::gfx::visitor::traverse;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter(hits: &Rc<Cell<u32>>, continue_traversal: bool) -> CallbackRef {
        let hits = hits.clone();
        from_fn(move |node, ctx| {
            hits.set(hits.get() + 1);
            if continue_traversal {
                ctx.traverse(node);
            }
        })
    }

    #[test]
    fn test_parents_before_children() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let root = NodeRef::group().named("root");
        let child = NodeRef::group().named("child");
        root.add_child(&child);

        for node in [&root, &child] {
            let order = order.clone();
            node.set_update_callback(Some(from_fn(move |n, ctx| {
                order.borrow_mut().push(n.name());
                ctx.traverse(n);
            })));
        }

        let mut uv = UpdateVisitor::default();
        traverse(&root, &mut uv);
        assert_eq!(*order.borrow(), vec!["root", "child"]);
        assert_eq!(uv.callbacks_run(), 2);
    }

    #[test]
    fn test_pruning_lasts_one_frame() {
        let parent_hits = Rc::new(Cell::new(0));
        let child_hits = Rc::new(Cell::new(0));

        let parent = NodeRef::group();
        let child = NodeRef::group();
        parent.add_child(&child);
        parent.set_update_callback(Some(counter(&parent_hits, false)));
        child.set_update_callback(Some(counter(&child_hits, true)));

        traverse(&parent, &mut UpdateVisitor::default());
        assert_eq!(parent_hits.get(), 1);
        assert_eq!(child_hits.get(), 0);

        // Switching to a continuing callback reaches the child on the next frame
        parent.set_update_callback(Some(counter(&parent_hits, true)));
        traverse(&parent, &mut UpdateVisitor::default());
        assert_eq!(parent_hits.get(), 2);
        assert_eq!(child_hits.get(), 1);
    }

    #[test]
    fn test_nodes_without_callback_traverse_automatically() {
        let hits = Rc::new(Cell::new(0));
        let root = NodeRef::group();
        let middle = NodeRef::identity_transform();
        let leaf = NodeRef::group();
        root.add_child(&middle);
        middle.add_child(&leaf);
        leaf.set_update_callback(Some(counter(&hits, true)));

        let visited = traverse(&root, &mut UpdateVisitor::default());
        assert_eq!(visited, 3);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_replacing_own_callback_applies_next_frame() {
        let first_hits = Rc::new(Cell::new(0));
        let second_hits = Rc::new(Cell::new(0));
        let node = NodeRef::group();

        let replacement = counter(&second_hits, true);
        let first = {
            let hits = first_hits.clone();
            from_fn(move |n: &NodeRef, ctx| {
                hits.set(hits.get() + 1);
                n.set_update_callback(Some(replacement.clone()));
                ctx.traverse(n);
            })
        };
        node.set_update_callback(Some(first));

        traverse(&node, &mut UpdateVisitor::default());
        assert_eq!((first_hits.get(), second_hits.get()), (1, 0));

        traverse(&node, &mut UpdateVisitor::default());
        assert_eq!((first_hits.get(), second_hits.get()), (1, 1));
    }

    #[test]
    fn test_frame_stamp_advance() {
        let mut stamp = FrameStamp::default();
        stamp.advance(0.5);
        stamp.advance(1.25);

        assert_eq!(stamp.frame_number, 2);
        assert_eq!(stamp.reference_time, 1.25);
        assert!((stamp.simulation_time - 1.25).abs() < 1e-12);
    }
}
