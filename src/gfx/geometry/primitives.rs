//! # Primitive Shape Generation
//!
//! Procedural geometry used by the tutorial scenes, so no model files are needed
//! for the basic shapes.

use super::{Binding, BoundingBox, Geometry, PrimitiveMode, PrimitiveSet};
use cgmath::Vector3;

/// A 2x2 quad in the XZ plane facing -Y, with a different color at each corner
pub fn create_quad() -> Geometry {
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
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 4));

    geom
}

/// A pair of offset quads with per-vertex colors
///
/// Used to show how shade model, face culling and polygon mode change the
/// look of the same drawable.
pub fn create_quad_pair() -> Geometry {
    let mut geom = Geometry::new();

    geom.vertices = vec![
        [-1.15, -0.5, -0.85],
        [0.85, -0.5, -0.85],
        [0.85, -0.5, 1.15],
        [-1.15, -0.5, 1.15],
        [-0.85, 0.5, -1.15],
        [-0.85, 0.5, 0.85],
        [1.15, 0.5, 0.85],
        [1.15, 0.5, -1.15],
    ];
    geom.set_colors(
        vec![
            [1.0, 0.33, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 0.33, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
            [1.0, 0.0, 0.0, 1.0],
            [1.0, 0.66, 1.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [0.0, 0.66, 0.0, 1.0],
        ],
        Binding::PerVertex,
    );
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 8));

    geom
}

/// A single white point at the origin
///
/// Single-vertex geometry has a degenerate bound, so a small initial bound
/// keeps it from being culled or ignored.
pub fn create_light_point() -> Geometry {
    let mut geom = Geometry::new();

    geom.initial_bound = Some(BoundingBox::new(
        Vector3::new(-0.1, -0.1, -0.1),
        Vector3::new(0.1, 0.1, 0.1),
    ));
    geom.vertices = vec![[0.0, 0.0, 0.0]];
    geom.set_colors(vec![[1.0, 1.0, 1.0, 1.0]], Binding::Overall);
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Points, 0, 1));

    geom
}

/// A square grid in the XY plane built from quad strips
///
/// # Arguments
/// * `half_steps` - Number of grid steps on each side of the origin
/// * `spacing` - Distance between neighbouring vertices
///
/// The grid has `(2 * half_steps + 1)^2` vertices and `2 * half_steps` strips,
/// with a single +Z normal.
pub fn create_plane_grid(half_steps: i32, spacing: f32) -> Geometry {
    let mut geom = Geometry::new();
    let half_steps = half_steps.max(1);

    for y in -half_steps..=half_steps {
        for x in -half_steps..=half_steps {
            geom.vertices
                .push([x as f32 * spacing, y as f32 * spacing, 0.0]);
        }
    }
    geom.set_normals(vec![[0.0, 0.0, 1.0]], Binding::Overall);
    geom.set_colors(vec![[1.0, 1.0, 1.0, 1.0]], Binding::Overall);

    let len = (2 * half_steps + 1) as u32;
    let mut idx = 0u32;
    for _ in 0..len - 1 {
        let mut indices = Vec::with_capacity((len * 2) as usize);
        for _ in 0..len {
            indices.push(idx + len);
            indices.push(idx);
            idx += 1;
        }
        geom.add_primitive_set(PrimitiveSet::draw_elements(PrimitiveMode::QuadStrip, indices));
    }

    geom
}

/// An upright textured billboard quad, `width` wide and `height` tall,
/// standing on the XY plane and facing -Y
pub fn create_billboard(width: f32, height: f32) -> Geometry {
    let mut geom = Geometry::new();
    let half = width * 0.5;

    geom.vertices = vec![
        [-half, 0.0, 0.0],
        [half, 0.0, 0.0],
        [half, 0.0, height],
        [-half, 0.0, height],
    ];
    geom.tex_coords = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    geom.set_normals(vec![[0.0, -1.0, 0.0]], Binding::Overall);
    geom.set_colors(vec![[1.0, 1.0, 1.0, 1.0]], Binding::Overall);
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 4));

    geom
}

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes drawn as six
/// quads. Each face has its own outward normal and UV coordinates from 0 to 1.
pub fn create_cube() -> Geometry {
    let mut geom = Geometry::new();

    #[rustfmt::skip]
    let positions = vec![
        // Front face (+Z)
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face (-Z)
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face (-X)
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face (+X)
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face (+Y)
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face (-Y)
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];
    let normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    geom.vertices = positions;
    geom.tex_coords = (0..6)
        .flat_map(|_| [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
        .collect();
    geom.set_normals(normals, Binding::PerVertex);
    geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 24));

    geom
}
