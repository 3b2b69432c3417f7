//! # Find Node Example
//!
//! Reads `State.ron` (written by the `state` example), finds the node named
//! "Flat" with a visitor and switches its shade model back to smooth before
//! viewing the scene.
//!
//! ## Usage:
//! ```bash
//! cargo run --example state
//! cargo run --example find_node
//! ```

use anyhow::Context;
use thistle::gfx::rendering::HeadlessRenderer;
use thistle::gfx::scene::{AttributeType, ShadeModel, StateAttribute};
use thistle::gfx::visitor::{traverse, FindNamedNode};
use thistle::{Viewer, ViewerConfig};

fn run() -> anyhow::Result<()> {
    let sg = thistle::read_node_file("State.ron").context("Unable to load data file")?;

    let mut fnn = FindNamedNode::new("Flat");
    let visited = traverse(&sg, &mut fnn);
    log::info!("Visited {} nodes, {} named \"Flat\"", visited, fnn.matches().len());

    if let Some(node) = fnn.node() {
        let mut node = node.borrow_mut();
        let state = node.get_or_create_state_set();
        if let Some(StateAttribute::ShadeModel(sm)) = state.attribute_mut(AttributeType::ShadeModel) {
            *sm = ShadeModel::Smooth;
        }
    }

    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.set_scene_data(sg);

    let mut backend = HeadlessRenderer::new().with_max_frames(300);
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
