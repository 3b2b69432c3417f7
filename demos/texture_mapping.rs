//! # Texture Mapping Example
//!
//! A tree billboard textured from `tree0.rgba`, blended and alpha tested so
//! the transparent parts of the image are dropped, standing on a plain ground
//! quad. The scene is written to `TextureMapping.ron`.
//!
//! ## Usage:
//! ```bash
//! cargo run --example texture_mapping
//! ```

use anyhow::Context;
use thistle::gfx::geometry::{create_billboard, create_plane_grid};
use thistle::gfx::scene::{
    AlphaFunc, BlendFunc, CompareFunc, Mode, NodeRef, StateAttribute, StateValue, Texture2D,
};

fn create_scene_graph() -> NodeRef {
    let root = NodeRef::group();
    root.borrow_mut()
        .get_or_create_state_set()
        .set_mode(Mode::Lighting, StateValue::OFF);

    let tree = NodeRef::geode(vec![create_billboard(4.0, 6.0)]).named("tree");
    {
        let mut node = tree.borrow_mut();
        let state = node.get_or_create_state_set();
        state.set_texture_attribute_and_modes(0, Texture2D::new("tree0.rgba"), StateValue::ON);

        // Blend the soft edges, drop the fully transparent texels
        state.set_attribute_and_modes(StateAttribute::BlendFunc(BlendFunc::default()), StateValue::ON);
        state.set_attribute_and_modes(
            StateAttribute::AlphaFunc(AlphaFunc {
                func: CompareFunc::Greater,
                reference: 0.05,
            }),
            StateValue::ON,
        );
    }
    root.add_child(&tree);

    root.add_child(&NodeRef::geode(vec![create_plane_grid(10, 0.5)]).named("ground"));
    root
}

fn run() -> anyhow::Result<()> {
    let root = create_scene_graph();

    let out = "TextureMapping.ron";
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
