//! Name lookup

use super::{NodeVisitor, Traversal};
use crate::gfx::scene::NodeRef;

/// Finds nodes whose name equals a target string
///
/// The whole graph is always visited, even after a match, so graphs with
/// duplicate names report every match. [`node`](Self::node) returns the first
/// one in traversal order.
#[derive(Debug)]
pub struct FindNamedNode {
    name: String,
    matches: Vec<NodeRef>,
}

impl FindNamedNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matches: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First matching node, if any
    pub fn node(&self) -> Option<&NodeRef> {
        self.matches.first()
    }

    /// Every matching node in traversal order
    pub fn matches(&self) -> &[NodeRef] {
        &self.matches
    }
}

impl NodeVisitor for FindNamedNode {
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
        if node.borrow().name() == self.name {
            self.matches.push(node.clone());
        }
        traversal.traverse(node, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::create_quad_pair;
    use crate::gfx::visitor::traverse;

    fn state_scene() -> NodeRef {
        let root = NodeRef::group().named("root");
        for name in ["Flat", "Smooth", "Cull", "Wire"] {
            let mt = NodeRef::identity_transform().named(name);
            mt.add_child(&NodeRef::geode(vec![create_quad_pair()]));
            root.add_child(&mt);
        }
        root
    }

    #[test]
    fn test_find_existing_name() {
        let root = state_scene();
        let mut fnn = FindNamedNode::new("Flat");
        let visited = traverse(&root, &mut fnn);

        let found = fnn.node().expect("Flat should be found");
        assert_eq!(found.name(), "Flat");
        assert!(found.ptr_eq(&root.child(0).unwrap()));
        // root + 4 transforms + 4 geodes, even though the match was the first transform
        assert_eq!(visited, 9);
    }

    #[test]
    fn test_missing_name_still_visits_everything() {
        let root = state_scene();
        let mut fnn = FindNamedNode::new("Missing");
        let visited = traverse(&root, &mut fnn);

        assert!(fnn.node().is_none());
        assert!(fnn.matches().is_empty());
        assert_eq!(visited, 9);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let root = NodeRef::group();
        let first = NodeRef::group().named("dup");
        let second = NodeRef::group().named("dup");
        root.add_child(&first);
        root.add_child(&second);

        let mut fnn = FindNamedNode::new("dup");
        traverse(&root, &mut fnn);

        assert_eq!(fnn.matches().len(), 2);
        assert!(fnn.node().unwrap().ptr_eq(&first));
    }
}
