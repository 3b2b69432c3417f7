//! # Scene Graph Module
//!
//! Node hierarchy, render state and lights. A scene is a directed acyclic graph
//! of [`NodeRef`] handles: groups, transforms, geodes holding drawable
//! [`Geometry`](crate::gfx::geometry::Geometry), and light sources.
//!
//! ## Key Components
//!
//! - [`NodeRef`] / [`Node`] - Shared graph vertex with children, name, data variance and update callback
//! - [`NodeKind`] - What a node is (group, transform, geode, light source)
//! - [`StateSet`] - Modes and attributes inherited down the graph
//! - [`Light`] - Light parameters held by light source nodes
//!
//! ## Usage
//!
//! ```
//! use thistle::gfx::scene::{DataVariance, NodeRef};
//! use thistle::gfx::geometry::create_quad;
//! use cgmath::{Matrix4, Vector3};
//!
//! let geode = NodeRef::geode(vec![create_quad()]);
//! let left = NodeRef::transform(Matrix4::from_translation(Vector3::new(-6.0, 0.0, 0.0)))
//!     .named("Left")
//!     .with_variance(DataVariance::Static);
//! left.add_child(&geode);
//!
//! let root = NodeRef::group().named("Root Node");
//! root.add_child(&left);
//! assert_eq!(root.num_children(), 1);
//! ```

pub mod light;
pub mod node;
pub mod state;

pub use light::Light;
pub use node::{DataVariance, Node, NodeKind, NodeRef, NodeSnapshot, WeakNodeRef};
pub use state::*;
