//! # Thistle Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use thistle::prelude::*;
//!
//! let root = NodeRef::group().named("root");
//! let mut viewer = Viewer::new(ViewerConfig::default());
//! viewer.set_scene_data(root);
//! ```

pub use crate::app::Viewer;
pub use crate::config::ViewerConfig;
pub use crate::error::{Error, Result};
pub use crate::io::{read_node_file, write_node_file};

pub use crate::gfx::callback::{callback_ref, from_fn, CallbackRef, RotateCallback, UpdateCallback};
pub use crate::gfx::camera::{Camera, OrbitManipulator};
pub use crate::gfx::events::{
    ActionContext, EventHandler, EventKind, EventQueue, GuiEvent, Key, MouseButton, PickHandler,
};
pub use crate::gfx::geometry::{Binding, BoundingBox, Geometry, PrimitiveMode, PrimitiveSet};
pub use crate::gfx::picking::{pick, Intersection, PickOutcome, PolytopeIntersector, Selection};
pub use crate::gfx::rendering::{HeadlessRenderer, RenderBackend};
pub use crate::gfx::scene::*;
pub use crate::gfx::visitor::{
    traverse, FindNamedNode, FrameStamp, NodeVisitor, Traversal, UpdateContext, UpdateVisitor,
};
