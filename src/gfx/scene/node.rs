//! # Scene Graph Nodes
//!
//! Nodes are shared through [`NodeRef`], a reference-counted handle. One node
//! may be the child of several parents (a single geode placed under many
//! transforms) and stays alive as long as any parent, root holder, selection
//! slot or callback still references it.
//!
//! The graph is expected to stay acyclic. Nothing checks this beyond refusing
//! to make a node its own child; traversing a cyclic graph does not terminate.

use cgmath::{Matrix4, SquareMatrix};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use super::light::Light;
use super::state::StateSet;
use crate::gfx::callback::CallbackRef;
use crate::gfx::geometry::Geometry;

/// Whether a node may change once it has been traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DataVariance {
    /// Fixed after construction; renderers may cache and share it
    Static,
    /// May be modified during traversal (e.g. by an update callback)
    #[default]
    Dynamic,
}

/// What a node is, beyond being a container of children
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain grouping node
    Group,
    /// Applies `matrix` to the coordinate frame of its subtree
    Transform { matrix: Matrix4<f32> },
    /// Leaf holding drawable geometry
    Geode { drawables: Vec<Geometry> },
    /// Positions a light in the frame of the node
    LightSource { light: Light },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Transform { .. } => "Transform",
            NodeKind::Geode { .. } => "Geode",
            NodeKind::LightSource { .. } => "LightSource",
        }
    }
}

/// A scene graph vertex
pub struct Node {
    name: String,
    data_variance: DataVariance,
    kind: NodeKind,
    children: Vec<NodeRef>,
    state_set: Option<StateSet>,
    update_callback: Option<CallbackRef>,
    traversed: bool,
    warned_static: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            data_variance: DataVariance::default(),
            kind,
            children: Vec::new(),
            state_set: None,
            update_callback: None,
            traversed: false,
            warned_static: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.check_static_mutation("set_name");
        self.name = name.into();
    }

    pub fn data_variance(&self) -> DataVariance {
        self.data_variance
    }

    pub fn set_data_variance(&mut self, variance: DataVariance) {
        self.data_variance = variance;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        self.check_static_mutation("kind_mut");
        &mut self.kind
    }

    pub fn is_transform(&self) -> bool {
        matches!(self.kind, NodeKind::Transform { .. })
    }

    pub fn is_geode(&self) -> bool {
        matches!(self.kind, NodeKind::Geode { .. })
    }

    /// Transform matrix, if this is a transform node
    pub fn matrix(&self) -> Option<Matrix4<f32>> {
        match &self.kind {
            NodeKind::Transform { matrix } => Some(*matrix),
            _ => None,
        }
    }

    /// Set the matrix of a transform node; returns false for other kinds
    pub fn set_matrix(&mut self, m: Matrix4<f32>) -> bool {
        self.check_static_mutation("set_matrix");
        match &mut self.kind {
            NodeKind::Transform { matrix } => {
                *matrix = m;
                true
            }
            _ => false,
        }
    }

    pub fn drawables(&self) -> &[Geometry] {
        match &self.kind {
            NodeKind::Geode { drawables } => drawables,
            _ => &[],
        }
    }

    /// Add a drawable to a geode; returns false for other kinds
    pub fn add_drawable(&mut self, geometry: Geometry) -> bool {
        self.check_static_mutation("add_drawable");
        match &mut self.kind {
            NodeKind::Geode { drawables } => {
                drawables.push(geometry);
                true
            }
            _ => false,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::LightSource { light } => Some(light),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn state_set(&self) -> Option<&StateSet> {
        self.state_set.as_ref()
    }

    pub fn get_or_create_state_set(&mut self) -> &mut StateSet {
        self.check_static_mutation("get_or_create_state_set");
        self.state_set.get_or_insert_with(StateSet::new)
    }

    pub fn set_state_set(&mut self, state_set: Option<StateSet>) {
        self.check_static_mutation("set_state_set");
        self.state_set = state_set;
    }

    pub fn update_callback(&self) -> Option<CallbackRef> {
        self.update_callback.clone()
    }

    /// Attach, replace or clear the update callback
    ///
    /// Callbacks are behavior rather than node data, so this is allowed on
    /// traversed STATIC nodes without a warning.
    pub fn set_update_callback(&mut self, callback: Option<CallbackRef>) {
        self.update_callback = callback;
    }

    pub fn has_update_callback(&self) -> bool {
        self.update_callback.is_some()
    }

    /// Whether any traversal has visited this node
    pub fn is_traversed(&self) -> bool {
        self.traversed
    }

    pub(crate) fn mark_traversed(&mut self) {
        self.traversed = true;
    }

    /// Copy of the node's data fields, for checking that STATIC nodes stay put
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            name: self.name.clone(),
            data_variance: self.data_variance,
            kind: self.kind.clone(),
            state_set: self.state_set.clone(),
            num_children: self.children.len(),
        }
    }

    fn check_static_mutation(&mut self, what: &str) {
        if self.data_variance == DataVariance::Static && self.traversed && !self.warned_static {
            self.warned_static = true;
            log::warn!(
                "{} called on STATIC node '{}' after it was traversed; mark it DYNAMIC",
                what,
                self.name
            );
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind.type_name())
            .field("data_variance", &self.data_variance)
            .field("children", &self.children.len())
            .field("update_callback", &self.update_callback.is_some())
            .finish()
    }
}

/// Data fields of a node at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub name: String,
    pub data_variance: DataVariance,
    pub kind: NodeKind,
    pub state_set: Option<StateSet>,
    pub num_children: usize,
}

/// Shared handle to a [`Node`]
///
/// Equality is identity: two handles are equal when they point at the same node.
#[derive(Clone)]
pub struct NodeRef(Rc<RefCell<Node>>);

impl NodeRef {
    pub fn new(node: Node) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    /// Create an empty group node
    pub fn group() -> Self {
        Self::new(Node::new(NodeKind::Group))
    }

    /// Create a transform node with the given matrix
    pub fn transform(matrix: Matrix4<f32>) -> Self {
        Self::new(Node::new(NodeKind::Transform { matrix }))
    }

    /// Create a transform node with an identity matrix
    pub fn identity_transform() -> Self {
        Self::transform(Matrix4::identity())
    }

    /// Create a geode holding the given drawables
    pub fn geode(drawables: Vec<Geometry>) -> Self {
        Self::new(Node::new(NodeKind::Geode { drawables }))
    }

    pub fn light_source(light: Light) -> Self {
        Self::new(Node::new(NodeKind::LightSource { light }))
    }

    /// Builder-style name setter
    pub fn named(self, name: impl Into<String>) -> Self {
        self.borrow_mut().set_name(name);
        self
    }

    /// Builder-style data variance setter
    pub fn with_variance(self, variance: DataVariance) -> Self {
        self.borrow_mut().set_data_variance(variance);
        self
    }

    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    pub(crate) fn try_borrow_mut(&self) -> Option<RefMut<'_, Node>> {
        self.0.try_borrow_mut().ok()
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared node, stable for its lifetime
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Number of owners currently holding this node
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn downgrade(&self) -> WeakNodeRef {
        WeakNodeRef(Rc::downgrade(&self.0))
    }

    pub fn name(&self) -> String {
        self.borrow().name().to_string()
    }

    pub fn is_transform(&self) -> bool {
        self.borrow().is_transform()
    }

    /// Append `child` to this node's children
    ///
    /// Returns false (and leaves the graph untouched) when the child is this
    /// node itself or when this node is a geode, which cannot have children.
    pub fn add_child(&self, child: &NodeRef) -> bool {
        if self.ptr_eq(child) {
            log::warn!("Refusing to add node '{}' as its own child", self.name());
            return false;
        }
        let mut node = self.borrow_mut();
        if node.is_geode() {
            log::warn!("Geode '{}' cannot have children", node.name());
            return false;
        }
        node.check_static_mutation("add_child");
        node.children.push(child.clone());
        true
    }

    /// Remove every occurrence of `child`; returns whether anything was removed
    pub fn remove_child(&self, child: &NodeRef) -> bool {
        let mut node = self.borrow_mut();
        let before = node.children.len();
        node.children.retain(|c| !c.ptr_eq(child));
        let removed = node.children.len() != before;
        if removed {
            node.check_static_mutation("remove_child");
        }
        removed
    }

    /// Snapshot of the child list
    ///
    /// Traversals iterate over this copy so visitors and callbacks may edit the
    /// live child list without holding a borrow across the walk.
    pub fn children(&self) -> Vec<NodeRef> {
        self.borrow().children.clone()
    }

    pub fn num_children(&self) -> usize {
        self.borrow().num_children()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef> {
        self.borrow().children.get(index).cloned()
    }

    pub fn update_callback(&self) -> Option<CallbackRef> {
        self.borrow().update_callback()
    }

    pub fn set_update_callback(&self, callback: Option<CallbackRef>) {
        self.borrow_mut().set_update_callback(callback);
    }

    pub fn matrix(&self) -> Option<Matrix4<f32>> {
        self.borrow().matrix()
    }

    pub fn set_matrix(&self, m: Matrix4<f32>) -> bool {
        self.borrow_mut().set_matrix(m)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(node) => write!(f, "NodeRef({} '{}')", node.kind.type_name(), node.name),
            Err(_) => write!(f, "NodeRef(<borrowed>)"),
        }
    }
}

/// Non-owning handle to a node
#[derive(Clone)]
pub struct WeakNodeRef(Weak<RefCell<Node>>);

impl WeakNodeRef {
    pub fn upgrade(&self) -> Option<NodeRef> {
        self.0.upgrade().map(NodeRef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::create_quad;
    use cgmath::Vector3;

    #[test]
    fn test_shared_child_multiple_parents() {
        let geode = NodeRef::geode(vec![create_quad()]);
        let left = NodeRef::transform(Matrix4::from_translation(Vector3::new(-6.0, 0.0, 0.0)));
        let right = NodeRef::transform(Matrix4::from_translation(Vector3::new(6.0, 0.0, 0.0)));

        assert!(left.add_child(&geode));
        assert!(right.add_child(&geode));

        assert!(left.child(0).unwrap().ptr_eq(&right.child(0).unwrap()));
        // local handle + two parents
        assert_eq!(geode.strong_count(), 3);
    }

    #[test]
    fn test_node_dropped_with_last_owner() {
        let parent = NodeRef::group();
        let weak = {
            let child = NodeRef::group().named("child");
            parent.add_child(&child);
            child.downgrade()
        };
        assert!(weak.upgrade().is_some());

        parent.remove_child(&weak.upgrade().unwrap());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_add_child_rejects_self_and_geode_parent() {
        let group = NodeRef::group();
        assert!(!group.add_child(&group));

        let geode = NodeRef::geode(Vec::new());
        assert!(!geode.add_child(&NodeRef::group()));
        assert_eq!(geode.num_children(), 0);
    }

    #[test]
    fn test_set_matrix_only_on_transforms() {
        let group = NodeRef::group();
        assert!(!group.set_matrix(Matrix4::identity()));
        assert!(group.matrix().is_none());

        let mt = NodeRef::identity_transform();
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        assert!(mt.set_matrix(m));
        assert_eq!(mt.matrix(), Some(m));
    }

    #[test]
    fn test_snapshot_detects_changes() {
        let mt = NodeRef::identity_transform()
            .named("Flat")
            .with_variance(DataVariance::Static);
        let before = mt.borrow().snapshot();

        mt.set_matrix(Matrix4::from_scale(2.0));
        assert_ne!(before, mt.borrow().snapshot());
    }
}
