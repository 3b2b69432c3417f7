//! World-space bounds of a subgraph

use cgmath::{Matrix4, SquareMatrix};

use super::{NodeVisitor, Traversal};
use crate::gfx::geometry::BoundingBox;
use crate::gfx::scene::{NodeKind, NodeRef};

/// Accumulates the bounding box of every drawable below the start node,
/// in the start node's parent frame
#[derive(Debug)]
pub struct ComputeBoundsVisitor {
    matrix_stack: Vec<Matrix4<f32>>,
    bound: BoundingBox,
}

impl ComputeBoundsVisitor {
    pub fn new() -> Self {
        Self {
            matrix_stack: vec![Matrix4::identity()],
            bound: BoundingBox::empty(),
        }
    }

    pub fn bound(&self) -> &BoundingBox {
        &self.bound
    }

    fn current(&self) -> Matrix4<f32> {
        self.matrix_stack.last().copied().unwrap_or_else(Matrix4::identity)
    }
}

impl Default for ComputeBoundsVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeVisitor for ComputeBoundsVisitor {
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
        let local = {
            let n = node.borrow();
            match n.kind() {
                NodeKind::Transform { matrix } => Some(*matrix),
                NodeKind::Geode { drawables } => {
                    let world = self.current();
                    for drawable in drawables {
                        let b = drawable.bound();
                        if b.valid() {
                            self.bound.expand_by_box(&b.transform(&world));
                        }
                    }
                    None
                }
                NodeKind::Group | NodeKind::LightSource { .. } => None,
            }
        };

        match local {
            Some(matrix) => {
                let world = self.current() * matrix;
                self.matrix_stack.push(world);
                traversal.traverse(node, self);
                self.matrix_stack.pop();
            }
            None => traversal.traverse(node, self),
        }
    }
}

/// Bounding box of everything drawable under `root`
pub fn compute_bound(root: &NodeRef) -> BoundingBox {
    let mut visitor = ComputeBoundsVisitor::new();
    super::traverse(root, &mut visitor);
    visitor.bound
}
