//! # Picking Example
//!
//! Click a model to make it spin; click another to move the spin over to it;
//! click empty space to stop. A release at the press position is a click and
//! picks, anything else is a drag and goes to the camera manipulator.
//!
//! Each model sits under a translation and an identity "rotation" transform.
//! The pick attaches a rotate callback to the deepest transform on the hit
//! path, the rotation, so the model spins in place.
//!
//! The headless backend replays three scripted clicks: left model, right
//! model, then empty space.
//!
//! ## Usage:
//! ```bash
//! cargo run --example picking -- cow.obj
//! ```

use anyhow::Context;
use cgmath::{Matrix4, Vector3};
use thistle::gfx::events::{GuiEvent, MouseButton, PickHandler};
use thistle::gfx::rendering::HeadlessRenderer;
use thistle::gfx::scene::{DataVariance, NodeRef};
use thistle::gfx::visitor::bounds::compute_bound;
use thistle::{Viewer, ViewerConfig};

fn create_scene(model: &str) -> anyhow::Result<(NodeRef, NodeRef, NodeRef)> {
    let cow = thistle::read_node_file(model).context("Unable to load data file")?;
    cow.borrow_mut().set_data_variance(DataVariance::Static);

    let place = |name: &str, x: f32| {
        let position = NodeRef::transform(Matrix4::from_translation(Vector3::new(x, 0.0, 0.0)))
            .named(format!("{} Cow", name))
            .with_variance(DataVariance::Static);
        // Rewritten by the rotate callback once picked
        let rotation = NodeRef::identity_transform()
            .named(format!("{} Rotation", name))
            .with_variance(DataVariance::Dynamic);
        position.add_child(&rotation);
        rotation.add_child(&cow);
        position
    };
    let left = place("Left", -6.0);
    let right = place("Right", 6.0);

    let root = NodeRef::group()
        .named("Root Node")
        .with_variance(DataVariance::Static);
    root.add_child(&left);
    root.add_child(&right);

    Ok((root, left, right))
}

/// Window position of the center of `node`'s subgraph
fn screen_center(viewer: &Viewer, node: &NodeRef) -> (f32, f32) {
    let center = compute_bound(node).center();
    let clip = viewer.camera().view_projection() * center.extend(1.0);
    let (w, h) = viewer.camera().viewport;
    (
        ((clip.x / clip.w + 1.0) * 0.5 * w as f32).round(),
        ((clip.y / clip.w + 1.0) * 0.5 * h as f32).round(),
    )
}

fn schedule_click(backend: &mut HeadlessRenderer, frame: u64, (x, y): (f32, f32)) {
    backend.schedule(frame, GuiEvent::push(x, y, MouseButton::Left));
    backend.schedule(frame, GuiEvent::release(x, y, MouseButton::Left));
}

fn run() -> anyhow::Result<()> {
    let model = std::env::args().nth(1).unwrap_or_else(|| "cow.obj".to_string());
    let (root, left, right) = create_scene(&model)?;

    let config = ViewerConfig::default().with_clear_color([1.0, 1.0, 1.0, 1.0]);
    let mut viewer = Viewer::new(config);
    viewer.set_scene_data(root);
    viewer.add_event_handler(PickHandler::new());

    // First frame homes the camera, after which screen positions are known
    let mut backend = HeadlessRenderer::new().with_max_frames(600);
    viewer.frame(&mut backend)?;

    schedule_click(&mut backend, 10, screen_center(&viewer, &left));
    schedule_click(&mut backend, 200, screen_center(&viewer, &right));
    schedule_click(&mut backend, 400, (2.0, 2.0));

    viewer.run(&mut backend)?;

    match viewer.selection().selected() {
        Some(node) => log::info!("Still spinning: '{}'", node.name()),
        None => log::info!("Nothing selected"),
    }
    Ok(())
}

fn main() {
    thistle::logging::init();
    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
