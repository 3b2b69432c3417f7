//! # Geometry
//!
//! Drawable geometry held by geode nodes: vertex arrays, per-vertex or overall
//! attribute bindings, and primitive sets describing how the vertices are
//! assembled.
//!
//! ## Usage
//!
//! ```
//! use thistle::gfx::geometry::{Geometry, PrimitiveMode, PrimitiveSet};
//!
//! let mut geom = Geometry::new();
//! geom.vertices = vec![[-1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
//! geom.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 4));
//!
//! assert_eq!(geom.primitive_count(), 1);
//! ```

pub mod bounds;
pub mod primitives;
pub mod vertex;

pub use bounds::BoundingBox;
pub use primitives::*;
pub use vertex::Vertex3D;

use serde::{Deserialize, Serialize};

/// How an attribute array maps onto the vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Binding {
    /// Attribute is not used
    #[default]
    Off,
    /// One value for the whole geometry
    Overall,
    /// One value per vertex
    PerVertex,
}

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

/// A run of vertices to draw in one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveSet {
    /// Consecutive vertices `first..first + count`
    DrawArrays {
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    },
    /// Indexed vertices
    DrawElements {
        mode: PrimitiveMode,
        indices: Vec<u32>,
    },
}

impl PrimitiveSet {
    pub fn draw_arrays(mode: PrimitiveMode, first: u32, count: u32) -> Self {
        Self::DrawArrays { mode, first, count }
    }

    pub fn draw_elements(mode: PrimitiveMode, indices: Vec<u32>) -> Self {
        Self::DrawElements { mode, indices }
    }

    pub fn mode(&self) -> PrimitiveMode {
        match self {
            Self::DrawArrays { mode, .. } | Self::DrawElements { mode, .. } => *mode,
        }
    }

    /// Number of indices referenced by this set
    pub fn len(&self) -> usize {
        match self {
            Self::DrawArrays { count, .. } => *count as usize,
            Self::DrawElements { indices, .. } => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertex index of the `i`th element of the set
    ///
    /// A range running past `u32::MAX` yields `u32::MAX`, which lies outside
    /// any vertex array.
    pub fn index(&self, i: usize) -> u32 {
        match self {
            Self::DrawArrays { first, .. } => u32::try_from(i)
                .ok()
                .and_then(|i| first.checked_add(i))
                .unwrap_or(u32::MAX),
            Self::DrawElements { indices, .. } => indices[i],
        }
    }

    /// Largest vertex index referenced, if any
    pub fn max_index(&self) -> Option<u64> {
        match self {
            Self::DrawArrays { first, count, .. } => {
                (*count > 0).then(|| u64::from(*first) + u64::from(*count) - 1)
            }
            Self::DrawElements { indices, .. } => indices.iter().copied().max().map(u64::from),
        }
    }

    /// Decompose the set into individual primitives (points, lines, triangles,
    /// quads or polygons) and hand each one's vertex indices to `f`.
    ///
    /// Incomplete trailing primitives are ignored.
    pub fn for_each_primitive(&self, mut f: impl FnMut(&[u32])) {
        let n = self.len();
        let idx = |i: usize| self.index(i);

        match self.mode() {
            PrimitiveMode::Points => {
                for i in 0..n {
                    f(&[idx(i)]);
                }
            }
            PrimitiveMode::Lines => {
                for i in (0..n.saturating_sub(1)).step_by(2) {
                    f(&[idx(i), idx(i + 1)]);
                }
            }
            PrimitiveMode::LineStrip | PrimitiveMode::LineLoop => {
                for i in 0..n.saturating_sub(1) {
                    f(&[idx(i), idx(i + 1)]);
                }
                if self.mode() == PrimitiveMode::LineLoop && n > 2 {
                    f(&[idx(n - 1), idx(0)]);
                }
            }
            PrimitiveMode::Triangles => {
                for i in (0..n.saturating_sub(2)).step_by(3) {
                    f(&[idx(i), idx(i + 1), idx(i + 2)]);
                }
            }
            PrimitiveMode::TriangleStrip => {
                for i in 0..n.saturating_sub(2) {
                    // Keep winding consistent on odd triangles
                    if i % 2 == 0 {
                        f(&[idx(i), idx(i + 1), idx(i + 2)]);
                    } else {
                        f(&[idx(i + 1), idx(i), idx(i + 2)]);
                    }
                }
            }
            PrimitiveMode::TriangleFan => {
                for i in 1..n.saturating_sub(1) {
                    f(&[idx(0), idx(i), idx(i + 1)]);
                }
            }
            PrimitiveMode::Quads => {
                for i in (0..n.saturating_sub(3)).step_by(4) {
                    f(&[idx(i), idx(i + 1), idx(i + 2), idx(i + 3)]);
                }
            }
            PrimitiveMode::QuadStrip => {
                for i in (0..n.saturating_sub(3)).step_by(2) {
                    f(&[idx(i), idx(i + 1), idx(i + 3), idx(i + 2)]);
                }
            }
            PrimitiveMode::Polygon => {
                if n > 0 {
                    let all: Vec<u32> = (0..n).map(idx).collect();
                    f(&all);
                }
            }
        }
    }
}

/// Vertex data plus the primitive sets that draw it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors, interpreted through `normal_binding`
    pub normals: Vec<[f32; 3]>,
    pub normal_binding: Binding,
    /// RGBA colors, interpreted through `color_binding`
    pub colors: Vec<[f32; 4]>,
    pub color_binding: Binding,
    /// Texture coordinates for unit 0, one per vertex when present
    pub tex_coords: Vec<[f32; 2]>,
    pub primitive_sets: Vec<PrimitiveSet>,
    /// Bound used in addition to the computed one, so that tiny geometry such
    /// as a single point still has a usable extent
    pub initial_bound: Option<BoundingBox>,
}

impl Geometry {
    /// Create a new empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_normals(&mut self, normals: Vec<[f32; 3]>, binding: Binding) {
        self.normals = normals;
        self.normal_binding = binding;
    }

    pub fn set_colors(&mut self, colors: Vec<[f32; 4]>, binding: Binding) {
        self.colors = colors;
        self.color_binding = binding;
    }

    pub fn add_primitive_set(&mut self, set: PrimitiveSet) {
        self.primitive_sets.push(set);
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of assembled primitives across all sets
    pub fn primitive_count(&self) -> usize {
        let mut count = 0;
        for set in &self.primitive_sets {
            set.for_each_primitive(|_| count += 1);
        }
        count
    }

    /// Bounding box of the vertices, grown by `initial_bound` when set
    pub fn bound(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_vertices(&self.vertices);
        if let Some(initial) = &self.initial_bound {
            bbox.expand_by_box(initial);
        }
        bbox
    }

    /// Check that attribute arrays match their bindings and that every
    /// primitive set stays inside the vertex array.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vertices.len();
        check_binding("normal", self.normal_binding, self.normals.len(), n)?;
        check_binding("color", self.color_binding, self.colors.len(), n)?;
        if !self.tex_coords.is_empty() && self.tex_coords.len() != n {
            return Err(format!(
                "{} texture coordinates for {} vertices",
                self.tex_coords.len(),
                n
            ));
        }
        for (i, set) in self.primitive_sets.iter().enumerate() {
            if let Some(max) = set.max_index() {
                if max >= n as u64 {
                    return Err(format!(
                        "primitive set {} references vertex {} of {}",
                        i, max, n
                    ));
                }
            }
        }
        Ok(())
    }

    /// Expand bindings into an interleaved vertex array for upload
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: bound_value(&self.normals, self.normal_binding, i).unwrap_or([0.0, 0.0, 1.0]),
                color: bound_value(&self.colors, self.color_binding, i).unwrap_or([1.0, 1.0, 1.0, 1.0]),
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

fn check_binding(what: &str, binding: Binding, len: usize, vertex_count: usize) -> Result<(), String> {
    match binding {
        Binding::Off => Ok(()),
        Binding::Overall if len >= 1 => Ok(()),
        Binding::PerVertex if len == vertex_count => Ok(()),
        _ => Err(format!(
            "{} binding {:?} with {} values for {} vertices",
            what, binding, len, vertex_count
        )),
    }
}

fn bound_value<T: Copy>(values: &[T], binding: Binding, i: usize) -> Option<T> {
    match binding {
        Binding::Off => None,
        Binding::Overall => values.first().copied(),
        Binding::PerVertex => values.get(i).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(set: &PrimitiveSet) -> Vec<Vec<u32>> {
        let mut out = Vec::new();
        set.for_each_primitive(|p| out.push(p.to_vec()));
        out
    }

    #[test]
    fn test_quad_strip_decomposition() {
        let set = PrimitiveSet::draw_elements(PrimitiveMode::QuadStrip, vec![10, 0, 11, 1, 12, 2]);
        assert_eq!(collect(&set), vec![vec![10, 0, 1, 11], vec![11, 1, 2, 12]]);
    }

    #[test]
    fn test_triangle_strip_winding() {
        let set = PrimitiveSet::draw_arrays(PrimitiveMode::TriangleStrip, 0, 4);
        assert_eq!(collect(&set), vec![vec![0, 1, 2], vec![2, 1, 3]]);
    }

    #[test]
    fn test_incomplete_primitives_ignored() {
        let set = PrimitiveSet::draw_arrays(PrimitiveMode::Quads, 0, 6);
        assert_eq!(collect(&set).len(), 1);

        let set = PrimitiveSet::draw_arrays(PrimitiveMode::LineLoop, 0, 3);
        assert_eq!(collect(&set), vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_indices() {
        let mut geom = Geometry::new();
        geom.vertices = vec![[0.0; 3]; 3];
        geom.add_primitive_set(PrimitiveSet::draw_elements(PrimitiveMode::Triangles, vec![0, 1, 3]));
        assert!(geom.validate().is_err());

        geom.primitive_sets[0] = PrimitiveSet::draw_elements(PrimitiveMode::Triangles, vec![0, 1, 2]);
        assert!(geom.validate().is_ok());

        geom.set_colors(vec![[1.0; 4]; 2], Binding::PerVertex);
        assert!(geom.validate().is_err());
    }

    #[test]
    fn test_range_past_u32_max_is_out_of_bounds() {
        let mut geom = Geometry::new();
        geom.vertices = vec![[0.0; 3]; 2];
        let set = PrimitiveSet::draw_arrays(PrimitiveMode::Points, u32::MAX, 2);
        assert_eq!(set.max_index(), Some(u64::from(u32::MAX) + 1));
        assert_eq!(collect(&set), vec![vec![u32::MAX], vec![u32::MAX]]);

        geom.add_primitive_set(set);
        assert!(geom.validate().is_err());
    }

    #[test]
    fn test_overall_binding_expands() {
        let mut geom = Geometry::new();
        geom.vertices = vec![[0.0; 3], [1.0, 0.0, 0.0]];
        geom.set_normals(vec![[0.0, -1.0, 0.0]], Binding::Overall);

        let verts = geom.to_vertices();
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[1].normal, [0.0, -1.0, 0.0]);
        assert_eq!(verts[1].color, [1.0, 1.0, 1.0, 1.0]);
    }
}
