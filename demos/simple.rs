//! # Simple Example
//!
//! Builds the smallest useful scene graph: one geode holding a colored quad,
//! then writes it to `Simple.ron`.
//!
//! ## Usage:
//! ```bash
//! cargo run --example simple
//! cargo run --example viewer -- Simple.ron
//! ```

use anyhow::Context;
use thistle::gfx::geometry::{Binding, Geometry, PrimitiveMode, PrimitiveSet};
use thistle::gfx::scene::NodeRef;

/// A quad in the XZ plane with one color per corner and a single normal
fn create_scene_graph() -> NodeRef {
    let mut geom = Geometry::new();

    geom.vertices = vec![
        [-1.0, 0.0, -1.0],
        [1.0, 0.0, -1.0],
        [1.0, 0.0, 1.0],
        [-1.0, 0.0, 1.0],
    ];
    geom.set_colors(
        vec![
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
        ],
        Binding::PerVertex,
    );
    geom.set_normals(vec![[0.0, -1.0, 0.0]], Binding::Overall);

    // Draw a four-vertex quad from the stored data
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 4));

    NodeRef::geode(vec![geom])
}

fn run() -> anyhow::Result<()> {
    let root = create_scene_graph();

    let out = "Simple.ron";
    thistle::write_node_file(&root, out).context("Failed in write_node_file()")?;
    log::info!("Successfully wrote \"{}\". Run \"cargo run --example viewer -- {}\" to view.", out, out);
    Ok(())
}

fn main() {
    thistle::logging::init();
    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
