//! # Lighting Example
//!
//! Two point lights marked by a shared white point, six copies of one model
//! with different materials, and a culled ground plane. The scene is written
//! to `Lighting.ron`.
//!
//! ## Usage:
//! ```bash
//! cargo run --example lighting -- lozenge.obj
//! ```
//!
//! Without a model argument a unit cube stands in for the lozenge.

use anyhow::Context;
use cgmath::{Matrix4, Vector3};
use thistle::gfx::geometry::{create_cube, create_light_point, create_plane_grid};
use thistle::gfx::scene::{
    ColorMode, CullFace, Light, Material, Mode, NodeRef, StateAttribute, StateValue,
};

fn translate(x: f32, y: f32, z: f32) -> NodeRef {
    NodeRef::transform(Matrix4::from_translation(Vector3::new(x, y, z)))
}

/// Unlit point marker; lighting is PROTECTED off so the root cannot turn it back on
fn create_light_point_geode() -> NodeRef {
    let geode = NodeRef::geode(vec![create_light_point()]);
    {
        let mut node = geode.borrow_mut();
        let state = node.get_or_create_state_set();
        state.set_mode(Mode::Lighting, StateValue::OFF | StateValue::PROTECTED);
        state.set_attribute(StateAttribute::Point(10.0));
    }
    geode
}

fn add_light(root: &NodeRef, marker: &NodeRef, position: (f32, f32, f32), light: Light) {
    let mt = translate(position.0, position.1, position.2);
    let ls = NodeRef::light_source(light.with_position([0.0, 0.0, 0.0, 1.0]));
    root.add_child(&mt);
    mt.add_child(&ls);
    ls.add_child(marker);
}

fn add_lozenge(root: &NodeRef, lozenge: &NodeRef, position: (f32, f32, f32), material: Material) {
    let mt = translate(position.0, position.1, position.2);
    mt.borrow_mut()
        .get_or_create_state_set()
        .set_attribute(StateAttribute::Material(material));
    mt.add_child(lozenge);
    root.add_child(&mt);
}

fn load_lozenge() -> anyhow::Result<NodeRef> {
    match std::env::args().nth(1) {
        Some(path) => thistle::read_node_file(&path).context("Unable to load data file"),
        None => {
            log::warn!("No model given, using a cube");
            Ok(NodeRef::geode(vec![create_cube()]).named("lozenge"))
        }
    }
}

fn create_scene_graph() -> anyhow::Result<NodeRef> {
    let root = NodeRef::group();
    {
        let mut node = root.borrow_mut();
        let state = node.get_or_create_state_set();
        state.set_mode(Mode::Lighting, StateValue::ON);
        state.set_mode(Mode::Light(0), StateValue::ON);
        state.set_mode(Mode::Light(1), StateValue::ON);
    }

    // Both lights sit at their local origin; the parent transforms move them
    let light_point = create_light_point_geode();
    add_light(
        &root,
        &light_point,
        (-3.0, 2.0, 5.0),
        Light::new(0)
            .with_diffuse([1.0, 0.5, 0.5, 1.0])
            .with_specular([1.0, 0.8, 0.8, 1.0]),
    );
    add_light(
        &root,
        &light_point,
        (3.0, -2.0, 3.0),
        Light::new(1)
            .with_diffuse([0.5, 0.5, 1.0, 1.0])
            .with_specular([0.8, 0.8, 1.0, 1.0]),
    );

    let lozenge = load_lozenge()?;
    let materials = [
        (
            (-1.0, -1.0, 1.0),
            Material::new()
                .with_diffuse([0.0, 0.0, 0.0, 1.0])
                .with_specular([1.0, 1.0, 1.0, 1.0])
                .with_shininess(128.0),
        ),
        // Primary color drives ambient and diffuse
        ((1.0, -1.0, 1.0), Material::new().with_color_mode(ColorMode::AmbientAndDiffuse)),
        (
            (-1.0, 0.0, 1.0),
            Material::new()
                .with_diffuse([0.4, 0.3, 0.0, 1.0])
                .with_specular([0.8, 0.8, 0.1, 1.0])
                .with_shininess(20.0),
        ),
        (
            (1.0, 0.0, 1.0),
            Material::new()
                .with_diffuse([0.1, 0.2, 0.5, 1.0])
                .with_specular([0.9, 0.9, 1.0, 1.0])
                .with_shininess(10.0),
        ),
        (
            (-1.0, 1.0, 1.0),
            Material::new()
                .with_diffuse([0.2, 0.9, 0.9, 1.0])
                .with_specular([1.0, 1.0, 1.0, 1.0])
                .with_shininess(96.0),
        ),
        (
            (1.0, 1.0, 1.0),
            Material::new()
                .with_diffuse([1.0, 1.0, 1.0, 1.0])
                .with_specular([0.0, 0.0, 0.0, 1.0]),
        ),
    ];
    for (position, material) in materials {
        add_lozenge(&root, &lozenge, position, material);
    }

    let plane = NodeRef::geode(vec![create_plane_grid(10, 0.5)]);
    {
        let mut node = plane.borrow_mut();
        let state = node.get_or_create_state_set();
        state.set_attribute(StateAttribute::Material(
            Material::new()
                .with_diffuse([0.6, 0.5, 0.2, 1.0])
                .with_specular([0.4, 0.4, 0.4, 1.0])
                .with_shininess(128.0),
        ));
        state.set_attribute_and_modes(StateAttribute::CullFace(CullFace::default()), StateValue::ON);
    }
    root.add_child(&plane);

    Ok(root)
}

fn run() -> anyhow::Result<()> {
    let root = create_scene_graph().context("Failed in create_scene_graph()")?;

    let out = "Lighting.ron";
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
