//! # Callback Example
//!
//! Two copies of a model side by side. The left transform is DYNAMIC and
//! carries a rotate callback that spins it in place every frame; the right
//! one is STATIC and never changes.
//!
//! ## Usage:
//! ```bash
//! cargo run --example callback -- cow.obj
//! ```

use anyhow::Context;
use cgmath::{Matrix4, Vector3};
use thistle::gfx::callback::{callback_ref, RotateCallback};
use thistle::gfx::rendering::HeadlessRenderer;
use thistle::gfx::scene::{DataVariance, NodeRef};
use thistle::{Viewer, ViewerConfig};

fn create_scene(model: &str) -> anyhow::Result<NodeRef> {
    let cow = thistle::read_node_file(model).context("Unable to load data file")?;
    // Never modified
    cow.borrow_mut().set_data_variance(DataVariance::Static);

    let left = NodeRef::transform(Matrix4::from_translation(Vector3::new(-6.0, 0.0, 0.0)))
        .named("Left Cow\nDYNAMIC")
        .with_variance(DataVariance::Dynamic);
    // Rotate about +Z, then move back to the left
    left.set_update_callback(Some(callback_ref(
        RotateCallback::new().with_offset(Vector3::new(-6.0, 0.0, 0.0)),
    )));
    left.add_child(&cow);

    let right = NodeRef::transform(Matrix4::from_translation(Vector3::new(6.0, 0.0, 0.0)))
        .named("Right Cow\nSTATIC")
        .with_variance(DataVariance::Static);
    right.add_child(&cow);

    let root = NodeRef::group()
        .named("Root Node")
        .with_variance(DataVariance::Static);
    root.add_child(&left);
    root.add_child(&right);

    Ok(root)
}

fn run() -> anyhow::Result<()> {
    let model = std::env::args().nth(1).unwrap_or_else(|| "cow.obj".to_string());

    let config = ViewerConfig::default().with_clear_color([1.0, 1.0, 1.0, 1.0]);
    let mut viewer = Viewer::new(config);
    viewer.set_scene_data(create_scene(&model)?);

    let mut backend = HeadlessRenderer::new().with_max_frames(628);
    viewer.run(&mut backend)?;
    Ok(())
}

fn main() {
    thistle::logging::init();
    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
