//! # State Example
//!
//! One drawable shared by four transforms. Each transform's state set changes
//! how it is drawn: default state, flat shading, back-face culling, and
//! wireframe with wide lines. Lighting is PROTECTED off at the root. The scene
//! is written to `State.ron`, which the `find_node` example reads back.
//!
//! ## Usage:
//! ```bash
//! cargo run --example state
//! ```

use anyhow::Context;
use cgmath::{Matrix4, Vector3};
use thistle::gfx::geometry::create_quad_pair;
use thistle::gfx::scene::{
    CullFace, Mode, NodeRef, PolygonFace, PolygonFill, PolygonMode, ShadeModel, StateAttribute,
    StateValue,
};

fn translate(x: f32, y: f32, z: f32) -> NodeRef {
    NodeRef::transform(Matrix4::from_translation(Vector3::new(x, y, z)))
}

fn create_scene_graph() -> NodeRef {
    let root = NodeRef::group();
    root.borrow_mut()
        .get_or_create_state_set()
        .set_mode(Mode::Lighting, StateValue::OFF | StateValue::PROTECTED);

    let geode = NodeRef::geode(vec![create_quad_pair()]);

    // Upper-left: default state
    let mt = translate(-2.0, 0.0, 2.0);
    root.add_child(&mt);
    mt.add_child(&geode);

    // Upper-right: flat shading
    let mt = translate(2.0, 0.0, 2.0).named("Flat");
    root.add_child(&mt);
    mt.add_child(&geode);
    mt.borrow_mut()
        .get_or_create_state_set()
        .set_attribute(StateAttribute::ShadeModel(ShadeModel::Flat));

    // Lower-left: back-face culling
    let mt = translate(-2.0, 0.0, -2.0);
    root.add_child(&mt);
    mt.add_child(&geode);
    mt.borrow_mut()
        .get_or_create_state_set()
        .set_attribute_and_modes(StateAttribute::CullFace(CullFace::Back), StateValue::ON);

    // Lower-right: outlines, three pixels wide
    let mt = translate(2.0, 0.0, -2.0);
    root.add_child(&mt);
    mt.add_child(&geode);
    {
        let mut node = mt.borrow_mut();
        let state = node.get_or_create_state_set();
        state.set_attribute_and_modes(
            StateAttribute::PolygonMode(PolygonMode {
                face: PolygonFace::FrontAndBack,
                fill: PolygonFill::Line,
            }),
            StateValue::ON,
        );
        state.set_attribute(StateAttribute::LineWidth(3.0));
    }

    root
}

fn run() -> anyhow::Result<()> {
    let root = create_scene_graph();

    let out = "State.ron";
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
