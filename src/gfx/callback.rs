//! # Update Callbacks
//!
//! Per-node behavior run once per frame by the update traversal. A callback
//! object lives as long as some node (or selection factory) holds it, so any
//! fields it keeps persist across frames.
//!
//! Callbacks must continue the traversal themselves:
//!
//! ```
//! use thistle::gfx::callback::from_fn;
//! use thistle::gfx::scene::NodeRef;
//!
//! let node = NodeRef::identity_transform();
//! node.set_update_callback(Some(from_fn(|node, ctx| {
//!     // ... modify the node ...
//!     ctx.traverse(node);
//! })));
//! ```

use cgmath::{InnerSpace, Matrix4, Rad, Vector3, Zero};
use std::cell::RefCell;
use std::rc::Rc;

use crate::gfx::scene::NodeRef;
use crate::gfx::visitor::UpdateContext;

/// Behavior attached to a node and run during the update traversal
pub trait UpdateCallback {
    /// Called once per frame with the node it is attached to
    ///
    /// Call `ctx.traverse(node)` to update the node's children as well;
    /// returning without doing so skips the subtree for this frame.
    fn update(&mut self, node: &NodeRef, ctx: &mut UpdateContext<'_>);
}

impl<F> UpdateCallback for F
where
    F: FnMut(&NodeRef, &mut UpdateContext<'_>),
{
    fn update(&mut self, node: &NodeRef, ctx: &mut UpdateContext<'_>) {
        self(node, ctx)
    }
}

/// Shared handle to a callback
pub type CallbackRef = Rc<RefCell<dyn UpdateCallback>>;

/// Wrap a callback object into a shareable handle
pub fn callback_ref<C: UpdateCallback + 'static>(callback: C) -> CallbackRef {
    Rc::new(RefCell::new(callback))
}

/// Wrap a closure into a shareable callback handle
pub fn from_fn<F>(f: F) -> CallbackRef
where
    F: FnMut(&NodeRef, &mut UpdateContext<'_>) + 'static,
{
    callback_ref(f)
}

/// Spins a transform node about an axis
///
/// Each frame the node's matrix becomes a rotation by the current angle about
/// `axis`, followed by a translation by `offset`. The angle then grows by `step`.
#[derive(Debug, Clone)]
pub struct RotateCallback {
    angle: f64,
    step: f64,
    axis: Vector3<f32>,
    offset: Vector3<f32>,
}

impl RotateCallback {
    pub const DEFAULT_STEP: f64 = 0.01;

    /// Rotate about +Z in place
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            step: Self::DEFAULT_STEP,
            axis: Vector3::unit_z(),
            offset: Vector3::zero(),
        }
    }

    pub fn with_axis(mut self, axis: Vector3<f32>) -> Self {
        if axis.magnitude2() > 0.0 {
            self.axis = axis.normalize();
        }
        self
    }

    pub fn with_offset(mut self, offset: Vector3<f32>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Angle the next frame will use, in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.offset)
            * Matrix4::from_axis_angle(self.axis, Rad(self.angle as f32))
    }
}

impl Default for RotateCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateCallback for RotateCallback {
    fn update(&mut self, node: &NodeRef, ctx: &mut UpdateContext<'_>) {
        if !node.set_matrix(self.matrix()) {
            log::debug!("RotateCallback attached to non-transform node '{}'", node.name());
        }
        self.angle += self.step;
        ctx.traverse(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::DataVariance;
    use crate::gfx::visitor::{traverse, UpdateVisitor};
    use cgmath::{Vector4, SquareMatrix};

    fn approx_eq(a: Vector4<f32>, b: Vector4<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_rotate_callback_accumulates_angle() {
        let node = NodeRef::identity_transform().with_variance(DataVariance::Dynamic);
        let rotate = Rc::new(RefCell::new(RotateCallback::new()));
        let cb: CallbackRef = rotate.clone();
        node.set_update_callback(Some(cb));

        const TICKS: usize = 250;
        for _ in 0..TICKS {
            traverse(&node, &mut UpdateVisitor::default());
        }

        let angle = rotate.borrow().angle();
        assert!((angle - 0.01 * TICKS as f64).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_callback_sets_matrix() {
        let node = NodeRef::identity_transform();
        let rotate = RotateCallback::new()
            .with_step(std::f64::consts::FRAC_PI_2)
            .with_offset(Vector3::new(-6.0, 0.0, 0.0));
        node.set_update_callback(Some(callback_ref(rotate)));

        // First frame uses angle 0: translation only
        traverse(&node, &mut UpdateVisitor::default());
        let m = node.matrix().unwrap();
        assert!(approx_eq(m * Vector4::new(1.0, 0.0, 0.0, 1.0), Vector4::new(-5.0, 0.0, 0.0, 1.0)));

        // Second frame: rotate +X onto +Y, then translate
        traverse(&node, &mut UpdateVisitor::default());
        let m = node.matrix().unwrap();
        assert!(approx_eq(m * Vector4::new(1.0, 0.0, 0.0, 1.0), Vector4::new(-6.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotate_callback_continues_traversal() {
        let parent = NodeRef::identity_transform();
        let child = NodeRef::identity_transform();
        parent.add_child(&child);
        parent.set_update_callback(Some(callback_ref(RotateCallback::new())));
        child.set_update_callback(Some(callback_ref(RotateCallback::new().with_step(0.5))));

        traverse(&parent, &mut UpdateVisitor::default());
        traverse(&parent, &mut UpdateVisitor::default());

        assert_ne!(child.matrix(), Some(Matrix4::identity()));
    }
}
