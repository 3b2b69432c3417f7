//! # Scene Graph Traversal
//!
//! A [`NodeVisitor`] is applied to every node a [`Traversal`] reaches. Descent
//! is explicit: the traversal only enters a node's children when the visitor
//! calls [`Traversal::traverse`] from its `apply`. A visitor that returns
//! without continuing prunes that subtree.
//!
//! The traversal keeps the path from the root to the current node and counts
//! every node it visits. Shared nodes are visited once per parent.
//!
//! Graphs with cycles are not detected; traversing one does not terminate.

pub mod bounds;
pub mod collect;
pub mod find;
pub mod update;

pub use bounds::ComputeBoundsVisitor;
pub use collect::{DrawItem, DrawList, DrawableCollector};
pub use find::FindNamedNode;
pub use update::{FrameStamp, UpdateContext, UpdateVisitor};

use crate::gfx::scene::NodeRef;

/// Nodes from the traversal root down to (and including) the current node
pub type NodePath = Vec<NodeRef>;

/// A traversal strategy applied per visited node
pub trait NodeVisitor {
    /// Called once for each node reached
    ///
    /// Call `traversal.traverse(node, self)` to continue into the children.
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal);
}

/// Walk state shared by every visitor
#[derive(Debug, Default)]
pub struct Traversal {
    path: NodePath,
    visited: usize,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `node`: push it onto the path, mark it traversed and apply the visitor
    pub fn accept<V: NodeVisitor + ?Sized>(&mut self, node: &NodeRef, visitor: &mut V) {
        self.visited += 1;
        // A node already borrowed further up the call stack keeps its flag as is
        if let Some(mut n) = node.try_borrow_mut() {
            n.mark_traversed();
        }

        self.path.push(node.clone());
        visitor.apply(node, self);
        self.path.pop();
    }

    /// Continue into the children of `node`
    ///
    /// Iterates over a snapshot of the child list, so children added or removed
    /// during the walk show up from the next traversal on.
    pub fn traverse<V: NodeVisitor + ?Sized>(&mut self, node: &NodeRef, visitor: &mut V) {
        for child in node.children() {
            self.accept(&child, visitor);
        }
    }

    /// Path from the root to the node currently being visited
    pub fn path(&self) -> &[NodeRef] {
        &self.path
    }

    /// Number of nodes visited so far
    pub fn visited(&self) -> usize {
        self.visited
    }
}

/// Apply `visitor` starting at `root`; returns the number of nodes visited
pub fn traverse<V: NodeVisitor + ?Sized>(root: &NodeRef, visitor: &mut V) -> usize {
    let mut traversal = Traversal::new();
    traversal.accept(root, visitor);
    traversal.visited()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        names: Vec<String>,
        prune: Option<String>,
    }

    impl NodeVisitor for Recorder {
        fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
            let name = node.name();
            self.names.push(name.clone());
            if self.prune.as_deref() != Some(name.as_str()) {
                traversal.traverse(node, self);
            }
        }
    }

    fn sample_graph() -> NodeRef {
        let root = NodeRef::group().named("root");
        let a = NodeRef::group().named("a");
        let b = NodeRef::group().named("b");
        a.add_child(&NodeRef::group().named("a1"));
        a.add_child(&NodeRef::group().named("a2"));
        b.add_child(&NodeRef::group().named("b1"));
        root.add_child(&a);
        root.add_child(&b);
        root
    }

    #[test]
    fn test_depth_first_order() {
        let root = sample_graph();
        let mut rec = Recorder { names: Vec::new(), prune: None };
        let visited = traverse(&root, &mut rec);

        assert_eq!(visited, 6);
        assert_eq!(rec.names, vec!["root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn test_not_continuing_prunes_subtree() {
        let root = sample_graph();
        let mut rec = Recorder { names: Vec::new(), prune: Some("a".into()) };
        let visited = traverse(&root, &mut rec);

        assert_eq!(visited, 4);
        assert_eq!(rec.names, vec!["root", "a", "b", "b1"]);
    }

    #[test]
    fn test_path_tracks_ancestors() {
        struct PathDepth(Vec<usize>);
        impl NodeVisitor for PathDepth {
            fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
                assert!(traversal.path().last().unwrap().ptr_eq(node));
                self.0.push(traversal.path().len());
                traversal.traverse(node, self);
            }
        }

        let mut depths = PathDepth(Vec::new());
        traverse(&sample_graph(), &mut depths);
        assert_eq!(depths.0, vec![1, 2, 3, 3, 2, 3]);
    }

    #[test]
    fn test_accept_marks_traversed() {
        let root = sample_graph();
        assert!(!root.borrow().is_traversed());
        let mut rec = Recorder { names: Vec::new(), prune: None };
        traverse(&root, &mut rec);
        assert!(root.borrow().is_traversed());
        assert!(root.child(0).unwrap().child(1).unwrap().borrow().is_traversed());
    }
}
