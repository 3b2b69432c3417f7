//! Reading and writing scene graphs
//!
//! [`read_node_file`] picks a loader from the file extension: `.obj` files go
//! through [`obj::load_obj`], `.ron` and `.thistle` files are native scene
//! files. Only the native format can be written.

pub mod obj;
pub mod scene_file;

use std::path::Path;

use crate::error::{Error, Result};
use crate::gfx::scene::NodeRef;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Load the scene graph stored at `path`
pub fn read_node_file(path: impl AsRef<Path>) -> Result<NodeRef> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let node = match extension(path).as_deref() {
        Some("obj") => obj::load_obj(path)?,
        Some("ron") | Some("thistle") => scene_file::read_scene(path)?,
        _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
    };
    log::info!("Read scene from {}", path.display());
    Ok(node)
}

/// Write the graph under `node` as a native scene file
///
/// Update callbacks are not written.
pub fn write_node_file(node: &NodeRef, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("ron") | Some("thistle") => {}
        _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
    }

    scene_file::write_scene(node, path)?;
    log::info!("Wrote scene to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::callback::{callback_ref, RotateCallback};
    use crate::gfx::geometry::create_quad;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("State.ron");

        let spin = NodeRef::identity_transform().named("Flat");
        spin.add_child(&NodeRef::geode(vec![create_quad()]));
        spin.set_update_callback(Some(callback_ref(RotateCallback::new())));
        let root = NodeRef::group();
        root.add_child(&spin);

        write_node_file(&root, &path).unwrap();
        let loaded = read_node_file(&path).unwrap();

        let flat = loaded.child(0).unwrap();
        assert_eq!(flat.name(), "Flat");
        assert!(flat.update_callback().is_none());
    }

    #[test]
    fn test_missing_file_not_found() {
        let err = read_node_file("no/such/cow.obj").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.fbx");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            read_node_file(&path).unwrap_err(),
            Error::UnsupportedFormat(_)
        ));
        assert!(matches!(
            write_node_file(&NodeRef::group(), &path).unwrap_err(),
            Error::UnsupportedFormat(_)
        ));
    }
}
