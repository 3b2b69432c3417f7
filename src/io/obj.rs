//! Wavefront OBJ loading through `tobj`

use cgmath::{InnerSpace, Vector3};
use std::path::Path;

use crate::error::{Error, Result};
use crate::gfx::geometry::{Binding, Geometry, PrimitiveMode, PrimitiveSet};
use crate::gfx::scene::{Material, NodeRef, StateAttribute, StateSet, StateValue, Texture2D};

/// Load an OBJ file (and its MTL, when present) into a group of geodes
///
/// Each model in the file becomes one geode holding a single triangle
/// drawable. A model's MTL material is attached to its geode's state set.
pub fn load_obj(path: &Path) -> Result<NodeRef> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| Error::ObjLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::debug!("No usable MTL for {}: {}", path.display(), e);
        Vec::new()
    });

    let root = NodeRef::group().named(
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );

    for model in &models {
        let geometry = mesh_to_geometry(&model.mesh);
        geometry.validate().map_err(|e| {
            Error::InvalidScene(format!("model '{}' in {}: {}", model.name, path.display(), e))
        })?;

        let geode = NodeRef::geode(vec![geometry]).named(model.name.clone());
        if let Some(mtl) = model.mesh.material_id.and_then(|id| materials.get(id)) {
            geode.borrow_mut().set_state_set(Some(material_state(mtl)));
        }
        root.add_child(&geode);
    }

    log::info!(
        "Loaded {} ({} model(s), {} material(s))",
        path.display(),
        models.len(),
        materials.len()
    );
    Ok(root)
}

fn mesh_to_geometry(mesh: &tobj::Mesh) -> Geometry {
    let mut geom = Geometry::new();

    geom.vertices = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    // Use normals from OBJ if available, otherwise calculate them
    let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
        mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
    } else {
        calculate_vertex_normals(&geom.vertices, &mesh.indices)
    };
    geom.set_normals(normals, Binding::PerVertex);

    if mesh.texcoords.len() / 2 == geom.vertices.len() {
        geom.tex_coords = mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect();
    }
    if mesh.vertex_color.len() == mesh.positions.len() && !mesh.vertex_color.is_empty() {
        let colors = mesh
            .vertex_color
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], 1.0])
            .collect();
        geom.set_colors(colors, Binding::PerVertex);
    }

    geom.add_primitive_set(PrimitiveSet::draw_elements(
        PrimitiveMode::Triangles,
        mesh.indices.clone(),
    ));
    geom
}

/// Area-weighted vertex normals from triangle faces
fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let pa = Vector3::from(vertices[a]);
        let pb = Vector3::from(vertices[b]);
        let pc = Vector3::from(vertices[c]);
        let face = (pb - pa).cross(pc - pa);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 0.0, 1.0]
            }
        })
        .collect()
}

fn material_state(mtl: &tobj::Material) -> StateSet {
    let rgba = |c: [f32; 3]| [c[0], c[1], c[2], mtl.dissolve.unwrap_or(1.0)];

    let mut material = Material::new();
    if let Some(ambient) = mtl.ambient {
        material.ambient = rgba(ambient);
    }
    if let Some(diffuse) = mtl.diffuse {
        material = material.with_diffuse(rgba(diffuse));
    }
    if let Some(specular) = mtl.specular {
        material = material.with_specular(rgba(specular));
    }
    if let Some(shininess) = mtl.shininess {
        material = material.with_shininess(shininess);
    }

    let mut state = StateSet::new();
    state.set_attribute(StateAttribute::Material(material));
    if let Some(texture) = &mtl.diffuse_texture {
        state.set_texture_attribute_and_modes(0, Texture2D::new(texture.clone()), StateValue::ON);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::AttributeType;
    use std::io::Write;

    const CUBE_OBJ: &str = "\
mtllib cube.mtl
o Cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
usemtl Red
f 1 2 3 4
";

    const CUBE_MTL: &str = "\
newmtl Red
Kd 1.0 0.0 0.0
Ks 0.5 0.5 0.5
Ns 64
";

    #[test]
    fn test_load_obj_with_material() {
        let dir = tempfile::tempdir().unwrap();
        let obj_path = dir.path().join("cube.obj");
        std::fs::File::create(&obj_path)
            .unwrap()
            .write_all(CUBE_OBJ.as_bytes())
            .unwrap();
        std::fs::write(dir.path().join("cube.mtl"), CUBE_MTL).unwrap();

        let root = load_obj(&obj_path).unwrap();
        assert_eq!(root.name(), "cube");
        assert_eq!(root.num_children(), 1);

        let geode = root.child(0).unwrap();
        let node = geode.borrow();
        let geom = &node.drawables()[0];
        assert_eq!(geom.vertex_count(), 4);
        // Quad face triangulated
        assert_eq!(geom.primitive_count(), 2);
        assert_eq!(geom.normals.len(), 4);

        let state = node.state_set().expect("material state");
        match state.attribute(AttributeType::Material) {
            Some(StateAttribute::Material(m)) => {
                assert_eq!(m.diffuse, [1.0, 0.0, 0.0, 1.0]);
                assert_eq!(m.shininess, 64.0);
            }
            other => panic!("unexpected attribute {:?}", other),
        }
    }

    #[test]
    fn test_computed_normals_face_outward() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = calculate_vertex_normals(&vertices, &[0, 1, 2]);
        assert_eq!(normals, vec![[0.0, 0.0, 1.0]; 3]);
    }
}
