//! Flattening a scene into draw items
//!
//! The collector walks the graph with a stack of world matrices and a stack of
//! accumulated [`StateSet`]s. Every drawable becomes one [`DrawItem`] carrying
//! the state it should be drawn with; every light source contributes its light
//! together with the world matrix it sits under.

use cgmath::{Matrix4, SquareMatrix};

use super::{NodeVisitor, Traversal};
use crate::gfx::scene::{Light, NodeKind, NodeRef, StateSet};

/// One drawable ready for a renderer
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Geode owning the drawable
    pub node: NodeRef,
    /// Index into the geode's drawables
    pub drawable_index: usize,
    pub world_matrix: Matrix4<f32>,
    /// Accumulated state from the root down to the geode
    pub state: StateSet,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
    pub lights: Vec<(Light, Matrix4<f32>)>,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Visitor producing a [`DrawList`]
#[derive(Debug)]
pub struct DrawableCollector {
    matrix_stack: Vec<Matrix4<f32>>,
    state_stack: Vec<StateSet>,
    list: DrawList,
}

impl DrawableCollector {
    pub fn new() -> Self {
        Self {
            matrix_stack: vec![Matrix4::identity()],
            state_stack: vec![StateSet::new()],
            list: DrawList::default(),
        }
    }

    pub fn into_draw_list(self) -> DrawList {
        self.list
    }

    fn current_matrix(&self) -> Matrix4<f32> {
        self.matrix_stack.last().copied().unwrap_or_else(Matrix4::identity)
    }

    fn current_state(&self) -> StateSet {
        self.state_stack.last().cloned().unwrap_or_default()
    }
}

impl Default for DrawableCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeVisitor for DrawableCollector {
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
        let (local, state) = {
            let n = node.borrow();
            let state = match n.state_set() {
                Some(ss) => self.current_state().accumulate(ss),
                None => self.current_state(),
            };
            let world = self.current_matrix();

            match n.kind() {
                NodeKind::Geode { drawables } => {
                    for index in 0..drawables.len() {
                        self.list.items.push(DrawItem {
                            node: node.clone(),
                            drawable_index: index,
                            world_matrix: world,
                            state: state.clone(),
                        });
                    }
                }
                NodeKind::LightSource { light } => self.list.lights.push((*light, world)),
                NodeKind::Group | NodeKind::Transform { .. } => {}
            }

            (n.matrix(), state)
        };

        self.state_stack.push(state);
        if let Some(matrix) = local {
            let world = self.current_matrix() * matrix;
            self.matrix_stack.push(world);
            traversal.traverse(node, self);
            self.matrix_stack.pop();
        } else {
            traversal.traverse(node, self);
        }
        self.state_stack.pop();
    }
}

/// Collect the draw list for the graph under `root`
pub fn collect_drawables(root: &NodeRef) -> DrawList {
    let mut collector = DrawableCollector::new();
    super::traverse(root, &mut collector);
    collector.into_draw_list()
}
