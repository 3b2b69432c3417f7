//! Selection policy for pick results
//!
//! The selected node is the deepest transform on the hit path. Selecting a
//! node attaches a fresh update callback to it and detaches the callback of
//! the previous selection.

use std::fmt;

use super::Intersection;
use crate::gfx::callback::{callback_ref, CallbackRef, RotateCallback};
use crate::gfx::scene::NodeRef;

/// Result of applying a pick to the selection
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// A transform was found on the hit path and is now selected
    Selected(NodeRef),
    /// Geometry was hit but no transform lies on its path; selection unchanged
    Failed,
    /// Nothing was hit; the previous selection was cleared
    Missed,
}

impl PickOutcome {
    pub fn is_selected(&self) -> bool {
        matches!(self, PickOutcome::Selected(_))
    }
}

/// The currently selected node and the callback it should carry
pub struct Selection {
    selected: Option<NodeRef>,
    factory: Box<dyn Fn() -> CallbackRef>,
}

impl Selection {
    /// `factory` creates the callback attached to each newly selected node
    pub fn new(factory: impl Fn() -> CallbackRef + 'static) -> Self {
        Self {
            selected: None,
            factory: Box::new(factory),
        }
    }

    pub fn selected(&self) -> Option<&NodeRef> {
        self.selected.as_ref()
    }

    /// Apply the nearest intersection of a pick, or a miss when `None`
    pub fn apply(&mut self, hit: Option<&Intersection>) -> PickOutcome {
        match hit {
            Some(hit) => self.select_from_path(&hit.node_path),
            None => {
                self.clear();
                PickOutcome::Missed
            }
        }
    }

    /// Select the deepest transform on `path` (root first)
    pub fn select_from_path(&mut self, path: &[NodeRef]) -> PickOutcome {
        let Some(target) = path.iter().rev().find(|n| n.is_transform()) else {
            if self.selected.is_none() {
                log::info!("Pick failed.");
            }
            return PickOutcome::Failed;
        };

        if let Some(previous) = self.selected.take() {
            previous.set_update_callback(None);
        }

        log::info!("Selected '{}'", target.name());
        target.set_update_callback(Some((self.factory)()));
        self.selected = Some(target.clone());
        PickOutcome::Selected(target.clone())
    }

    /// Detach the callback from the selected node and forget it
    pub fn clear(&mut self) {
        if let Some(previous) = self.selected.take() {
            previous.set_update_callback(None);
        }
    }
}

impl Default for Selection {
    /// Spins the selected transform about +Z
    fn default() -> Self {
        Self::new(|| callback_ref(RotateCallback::new()))
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::create_quad;
    use std::rc::Rc;

    fn scene() -> (NodeRef, NodeRef, NodeRef, NodeRef) {
        let geode = NodeRef::geode(vec![create_quad()]).named("cow");
        let a = NodeRef::identity_transform().named("Left Rotation");
        let b = NodeRef::identity_transform().named("Right Rotation");
        a.add_child(&geode);
        b.add_child(&geode);
        let root = NodeRef::group();
        root.add_child(&a);
        root.add_child(&b);
        (root, a, b, geode)
    }

    #[test]
    fn test_select_a_then_b_moves_callback() {
        let (root, a, b, geode) = scene();
        let mut selection = Selection::default();

        let outcome = selection.select_from_path(&[root.clone(), a.clone(), geode.clone()]);
        assert_eq!(outcome, PickOutcome::Selected(a.clone()));
        assert!(a.update_callback().is_some());

        let outcome = selection.select_from_path(&[root, b.clone(), geode]);
        assert_eq!(outcome, PickOutcome::Selected(b.clone()));
        assert!(a.update_callback().is_none());

        let cb = b.update_callback().expect("B carries the callback");
        // B's slot plus the local clone
        assert_eq!(Rc::strong_count(&cb), 2);
        assert!(selection.selected().unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_miss_clears_selection() {
        let (root, a, _, geode) = scene();
        let mut selection = Selection::default();
        selection.select_from_path(&[root, a.clone(), geode]);

        assert_eq!(selection.apply(None), PickOutcome::Missed);
        assert!(selection.selected().is_none());
        assert!(a.update_callback().is_none());
    }

    #[test]
    fn test_path_without_transform_fails() {
        let (root, a, _, geode) = scene();
        let mut selection = Selection::default();
        selection.select_from_path(&[root.clone(), a.clone(), geode.clone()]);

        let plain_root = NodeRef::group();
        let lone = NodeRef::geode(vec![create_quad()]);
        plain_root.add_child(&lone);

        let outcome = selection.select_from_path(&[plain_root, lone]);
        assert_eq!(outcome, PickOutcome::Failed);
        // Previous selection kept
        assert!(selection.selected().unwrap().ptr_eq(&a));
        assert!(a.update_callback().is_some());
    }

    #[test]
    fn test_failed_pick_with_nothing_selected() {
        let plain_root = NodeRef::group();
        let lone = NodeRef::geode(vec![create_quad()]);
        plain_root.add_child(&lone);
        let mut selection = Selection::default();

        let outcome = selection.select_from_path(&[plain_root, lone.clone()]);
        assert_eq!(outcome, PickOutcome::Failed);
        assert!(selection.selected().is_none());
        assert!(lone.update_callback().is_none());
    }

    #[test]
    fn test_deepest_transform_wins() {
        let outer = NodeRef::identity_transform().named("outer");
        let inner = NodeRef::identity_transform().named("inner");
        let geode = NodeRef::geode(vec![create_quad()]);
        outer.add_child(&inner);
        inner.add_child(&geode);

        let mut selection = Selection::default();
        let outcome = selection.select_from_path(&[outer.clone(), inner.clone(), geode]);
        assert_eq!(outcome, PickOutcome::Selected(inner));
        assert!(outer.update_callback().is_none());
    }

    #[test]
    fn test_custom_factory_creates_fresh_callbacks() {
        let (root, a, b, geode) = scene();
        let mut selection = Selection::new(|| callback_ref(RotateCallback::new().with_step(0.5)));

        selection.select_from_path(&[root.clone(), a.clone(), geode.clone()]);
        let first = a.update_callback().unwrap();
        selection.select_from_path(&[root, b.clone(), geode]);
        let second = b.update_callback().unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
    }
}
