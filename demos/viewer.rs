//! # Viewer Example
//!
//! Loads a model or scene file and views it.
//!
//! ## Usage:
//! ```bash
//! cargo run --example viewer -- cow.obj
//! cargo run --example viewer -- State.ron viewer.ron
//! ```
//!
//! The optional second argument is a viewer configuration file in RON.

use anyhow::Context;
use thistle::gfx::rendering::HeadlessRenderer;
use thistle::{Viewer, ViewerConfig};

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_else(|| "cow.obj".to_string());
    let config = match args.next() {
        Some(path) => ViewerConfig::load(&path).with_context(|| format!("Bad viewer config {}", path))?,
        None => ViewerConfig::default(),
    };

    let mut viewer = Viewer::new(config);
    viewer.set_scene_data(thistle::read_node_file(&model).context("Unable to load data file")?);

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
