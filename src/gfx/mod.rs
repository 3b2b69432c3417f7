//! # Graphics Module
//!
//! The scene graph and everything that operates on it.
//!
//! ## Architecture Overview
//!
//! - **Scene graph** ([`scene`]) - shared nodes, state sets and lights
//! - **Geometry** ([`geometry`]) - vertex arrays, primitive sets and bounds
//! - **Visitors** ([`visitor`]) - depth-first traversal with a node path
//! - **Callbacks** ([`callback`]) - per-frame update behavior attached to nodes
//! - **Picking** ([`picking`]) - polytope intersection and selection
//! - **Events** ([`events`]) - GUI events, handlers and winit translation
//! - **Camera** ([`camera`]) - view/projection and the orbit manipulator
//! - **Rendering** ([`rendering`]) - the backend seam and a headless backend
//!
//! ## Usage
//!
//! ```
//! use thistle::gfx::{geometry::create_quad, scene::NodeRef, visitor::FindNamedNode};
//!
//! let root = NodeRef::group().named("root");
//! let spin = NodeRef::identity_transform().named("spin");
//! spin.add_child(&NodeRef::geode(vec![create_quad()]));
//! root.add_child(&spin);
//!
//! let mut finder = FindNamedNode::new("spin");
//! thistle::gfx::visitor::traverse(&root, &mut finder);
//! assert!(finder.node().is_some());
//! ```

pub mod callback;
pub mod camera;
pub mod events;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod scene;
pub mod visitor;

// Re-export commonly used types
pub use camera::{Camera, OrbitManipulator};
pub use rendering::{HeadlessRenderer, RenderBackend};
