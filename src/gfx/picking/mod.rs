//! # Object Picking System
//!
//! Picking finds the geometry under a point of the viewport and reports the
//! node path from the scene root down to the geode that owns it.
//!
//! ## How it works
//!
//! 1. **Query volume**: A small window around the pick point, in normalized
//!    device coordinates, together with the near and far planes bounds a
//!    polytope in clip space
//! 2. **Local clipping**: The polytope planes are carried into each drawable's
//!    local space and every primitive is clipped against them
//! 3. **Hits**: A primitive with something left after clipping is a hit; the
//!    centroid of the remainder is the hit point
//! 4. **Ordering**: Hits are sorted nearest first by projected depth
//!
//! ## Usage
//!
//! ```
//! use thistle::gfx::picking::PolytopeIntersector;
//! use thistle::gfx::scene::NodeRef;
//! use cgmath::{Matrix4, SquareMatrix};
//!
//! let root = NodeRef::group();
//! let mut picker = PolytopeIntersector::new(0.0, 0.0, PolytopeIntersector::DEFAULT_TOLERANCE);
//! picker.compute(&root, Matrix4::identity());
//! assert!(picker.first().is_none());
//! ```

pub mod selection;

pub use selection::{PickOutcome, Selection};

use cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::geometry::{BoundingBox, Geometry};
use crate::gfx::scene::{NodeKind, NodeRef};
use crate::gfx::visitor::{traverse, NodePath, NodeVisitor, Traversal};

/// A single pick hit
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Nodes from the scene root to the geode that was hit
    pub node_path: NodePath,
    /// Index of the hit drawable in the geode
    pub drawable_index: usize,
    /// Index of the nearest hit primitive within the drawable
    pub primitive_index: usize,
    pub local_point: Vector3<f32>,
    pub world_point: Vector3<f32>,
    /// Normalized device depth of the hit point; smaller is nearer
    pub depth: f32,
}

impl Intersection {
    /// The geode that owns the hit drawable
    pub fn leaf(&self) -> Option<&NodeRef> {
        self.node_path.last()
    }
}

/// Polytope intersection query in projection space
#[derive(Debug)]
pub struct PolytopeIntersector {
    /// Clip-space half spaces: `dot(plane, clip) >= 0` is inside
    planes: [Vector4<f32>; 6],
    view_projection: Matrix4<f32>,
    matrix_stack: Vec<Matrix4<f32>>,
    intersections: Vec<Intersection>,
}

impl PolytopeIntersector {
    pub const DEFAULT_TOLERANCE: f32 = 0.05;

    /// Query window of `x ± tolerance`, `y ± tolerance` in normalized device coordinates
    pub fn new(x: f32, y: f32, tolerance: f32) -> Self {
        Self::with_window(x - tolerance, y - tolerance, x + tolerance, y + tolerance)
    }

    /// Query window `[x0, x1] × [y0, y1]` in normalized device coordinates
    pub fn with_window(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            planes: [
                Vector4::new(1.0, 0.0, 0.0, -x0),
                Vector4::new(-1.0, 0.0, 0.0, x1),
                Vector4::new(0.0, 1.0, 0.0, -y0),
                Vector4::new(0.0, -1.0, 0.0, y1),
                // near and far
                Vector4::new(0.0, 0.0, 1.0, 1.0),
                Vector4::new(0.0, 0.0, -1.0, 1.0),
            ],
            view_projection: Matrix4::identity(),
            matrix_stack: Vec::new(),
            intersections: Vec::new(),
        }
    }

    /// Run the query against the graph under `root`
    ///
    /// `view_projection` maps world space (the frame of `root`) to clip space.
    /// Results from a previous run are discarded.
    pub fn compute(&mut self, root: &NodeRef, view_projection: Matrix4<f32>) {
        self.view_projection = view_projection;
        self.matrix_stack = vec![Matrix4::identity()];
        self.intersections.clear();

        traverse(root, self);

        self.intersections.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        log::debug!("Pick produced {} intersection(s)", self.intersections.len());
    }

    pub fn contains_intersections(&self) -> bool {
        !self.intersections.is_empty()
    }

    /// All hits, nearest first
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Nearest hit
    pub fn first(&self) -> Option<&Intersection> {
        self.intersections.first()
    }

    pub fn into_intersections(self) -> Vec<Intersection> {
        self.intersections
    }

    fn current(&self) -> Matrix4<f32> {
        self.matrix_stack.last().copied().unwrap_or_else(Matrix4::identity)
    }

    fn intersect_geode(&mut self, drawables: &[Geometry], path: &[NodeRef]) {
        let model = self.current();
        let mvp = self.view_projection * model;
        let mvp_t = mvp.transpose();
        let local_planes = self.planes.map(|p| mvp_t * p);

        for (drawable_index, geometry) in drawables.iter().enumerate() {
            if outside_planes(&geometry.bound(), &local_planes) {
                continue;
            }

            let mut nearest: Option<(usize, Vector3<f32>, f32)> = None;
            let mut primitive_index = 0;
            for set in &geometry.primitive_sets {
                set.for_each_primitive(|indices| {
                    let polygon: Vec<Vector3<f32>> = indices
                        .iter()
                        .filter_map(|&i| geometry.vertices.get(i as usize))
                        .map(|v| Vector3::new(v[0], v[1], v[2]))
                        .collect();

                    if polygon.len() == indices.len() {
                        if let Some(centroid) = clip_primitive(&polygon, &local_planes) {
                            let clip = mvp * centroid.extend(1.0);
                            let depth = if clip.w != 0.0 { clip.z / clip.w } else { clip.z };
                            if nearest.map_or(true, |(_, _, d)| depth < d) {
                                nearest = Some((primitive_index, centroid, depth));
                            }
                        }
                    }
                    primitive_index += 1;
                });
            }

            if let Some((primitive_index, local_point, depth)) = nearest {
                let world = model * local_point.extend(1.0);
                self.intersections.push(Intersection {
                    node_path: path.to_vec(),
                    drawable_index,
                    primitive_index,
                    local_point,
                    world_point: world.truncate() / world.w,
                    depth,
                });
            }
        }
    }
}

impl NodeVisitor for PolytopeIntersector {
    fn apply(&mut self, node: &NodeRef, traversal: &mut Traversal) {
        let local = {
            let n = node.borrow();
            match n.kind() {
                NodeKind::Geode { drawables } => {
                    self.intersect_geode(drawables, traversal.path());
                    None
                }
                NodeKind::Transform { matrix } => Some(*matrix),
                NodeKind::Group | NodeKind::LightSource { .. } => None,
            }
        };

        match local {
            Some(matrix) => {
                let world = self.current() * matrix;
                self.matrix_stack.push(world);
                traversal.traverse(node, self);
                self.matrix_stack.pop();
            }
            None => traversal.traverse(node, self),
        }
    }
}

/// Nearest hit of a pick at `(x, y)` in normalized device coordinates
pub fn pick(
    root: &NodeRef,
    view_projection: Matrix4<f32>,
    x: f32,
    y: f32,
    tolerance: f32,
) -> Option<Intersection> {
    let mut picker = PolytopeIntersector::new(x, y, tolerance);
    picker.compute(root, view_projection);
    picker.into_intersections().into_iter().next()
}

fn plane_distance(plane: &Vector4<f32>, p: Vector3<f32>) -> f32 {
    plane.dot(p.extend(1.0))
}

/// True when every corner of `bound` lies outside one of the planes
fn outside_planes(bound: &BoundingBox, planes: &[Vector4<f32>; 6]) -> bool {
    if !bound.valid() {
        return false;
    }
    let corners = bound.corners();
    planes
        .iter()
        .any(|plane| corners.iter().all(|&c| plane_distance(plane, c) < 0.0))
}

/// Clip a point, segment or polygon against the planes
///
/// Returns the centroid of whatever remains inside, or `None` if nothing does.
fn clip_primitive(vertices: &[Vector3<f32>], planes: &[Vector4<f32>; 6]) -> Option<Vector3<f32>> {
    match vertices.len() {
        0 => None,
        1 => planes
            .iter()
            .all(|plane| plane_distance(plane, vertices[0]) >= 0.0)
            .then_some(vertices[0]),
        2 => clip_segment(vertices[0], vertices[1], planes).map(|(a, b)| (a + b) * 0.5),
        _ => {
            let mut polygon = vertices.to_vec();
            for plane in planes {
                polygon = clip_polygon(&polygon, plane);
                if polygon.is_empty() {
                    return None;
                }
            }
            let sum = polygon
                .iter()
                .fold(Vector3::new(0.0, 0.0, 0.0), |acc, v| acc + v);
            Some(sum / polygon.len() as f32)
        }
    }
}

fn clip_segment(
    mut a: Vector3<f32>,
    mut b: Vector3<f32>,
    planes: &[Vector4<f32>; 6],
) -> Option<(Vector3<f32>, Vector3<f32>)> {
    for plane in planes {
        let da = plane_distance(plane, a);
        let db = plane_distance(plane, b);
        match (da >= 0.0, db >= 0.0) {
            (true, true) => {}
            (false, false) => return None,
            (true, false) => b = a + (b - a) * (da / (da - db)),
            (false, true) => a = a + (b - a) * (da / (da - db)),
        }
    }
    Some((a, b))
}

/// One Sutherland-Hodgman pass against a single plane
fn clip_polygon(polygon: &[Vector3<f32>], plane: &Vector4<f32>) -> Vec<Vector3<f32>> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let previous = polygon[(i + polygon.len() - 1) % polygon.len()];
        let dc = plane_distance(plane, current);
        let dp = plane_distance(plane, previous);

        if dc >= 0.0 {
            if dp < 0.0 {
                out.push(previous + (current - previous) * (dp / (dp - dc)));
            }
            out.push(current);
        } else if dp >= 0.0 {
            out.push(previous + (current - previous) * (dp / (dp - dc)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::create_quad;
    use cgmath::{perspective, Deg, Point3};

    /// Camera on -Y looking at the origin, +Z up
    fn view_projection() -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, -20.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_z(),
        );
        perspective(Deg(45.0), 1.0, 1.0, 100.0) * view
    }

    /// One quad shared by two transforms, both facing the camera
    fn two_quads() -> (NodeRef, NodeRef, NodeRef) {
        let geode = NodeRef::geode(vec![create_quad()]).named("quad");
        let left = NodeRef::transform(Matrix4::from_translation(Vector3::new(-4.0, 0.0, 0.0))).named("Left");
        let right = NodeRef::transform(Matrix4::from_translation(Vector3::new(4.0, 0.0, 0.0))).named("Right");
        left.add_child(&geode);
        right.add_child(&geode);
        let root = NodeRef::group().named("root");
        root.add_child(&left);
        root.add_child(&right);
        (root, left, right)
    }

    fn ndc_of(world: Vector3<f32>) -> (f32, f32) {
        let clip = view_projection() * world.extend(1.0);
        (clip.x / clip.w, clip.y / clip.w)
    }

    #[test]
    fn test_pick_hits_with_full_path() {
        let (root, left, _) = two_quads();
        let (x, y) = ndc_of(Vector3::new(-4.0, 0.0, 0.0));

        let hit = pick(&root, view_projection(), x, y, 0.05).expect("should hit left quad");
        assert_eq!(hit.node_path.len(), 3);
        assert!(hit.node_path[0].ptr_eq(&root));
        assert!(hit.node_path[1].ptr_eq(&left));
        assert_eq!(hit.leaf().unwrap().name(), "quad");
        assert!((hit.world_point.x + 4.0).abs() < 0.5);
        assert!(hit.world_point.y.abs() < 1e-4);
    }

    #[test]
    fn test_pick_miss_returns_none() {
        let (root, _, _) = two_quads();
        let (x, y) = ndc_of(Vector3::new(0.0, 0.0, 0.0));

        assert!(pick(&root, view_projection(), x, y, 0.05).is_none());
        assert!(pick(&root, view_projection(), 0.9, 0.9, 0.05).is_none());
    }

    #[test]
    fn test_nearest_hit_first() {
        let quad = create_quad();
        let near = NodeRef::transform(Matrix4::from_translation(Vector3::new(0.0, -5.0, 0.0))).named("near");
        let far = NodeRef::transform(Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0))).named("far");
        near.add_child(&NodeRef::geode(vec![quad.clone()]));
        far.add_child(&NodeRef::geode(vec![quad]));
        let root = NodeRef::group();
        // Far one added first so ordering comes from depth, not traversal
        root.add_child(&far);
        root.add_child(&near);

        let mut picker = PolytopeIntersector::new(0.0, 0.0, 0.05);
        picker.compute(&root, view_projection());

        assert_eq!(picker.intersections().len(), 2);
        assert_eq!(picker.first().unwrap().node_path[1].name(), "near");
        assert!(picker.intersections()[0].depth < picker.intersections()[1].depth);
    }

    #[test]
    fn test_clip_polygon_centroid() {
        let planes = PolytopeIntersector::with_window(-0.5, -0.5, 0.5, 0.5).planes;
        let square = [
            Vector3::new(-2.0, -2.0, 0.0),
            Vector3::new(2.0, -2.0, 0.0),
            Vector3::new(2.0, 2.0, 0.0),
            Vector3::new(-2.0, 2.0, 0.0),
        ];
        let centroid = clip_primitive(&square, &planes).unwrap();
        assert!(centroid.magnitude() < 1e-6);

        let outside = [Vector3::new(1.0, 1.0, 0.0), Vector3::new(2.0, 1.0, 0.0), Vector3::new(2.0, 2.0, 0.0)];
        assert!(clip_primitive(&outside, &planes).is_none());
    }

    #[test]
    fn test_clip_segment_and_point() {
        let planes = PolytopeIntersector::with_window(-0.5, -0.5, 0.5, 0.5).planes;
        let mid = clip_primitive(&[Vector3::new(-3.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)], &planes).unwrap();
        assert!(mid.x.abs() < 1e-6);

        assert!(clip_primitive(&[Vector3::new(0.1, 0.1, 0.0)], &planes).is_some());
        assert!(clip_primitive(&[Vector3::new(0.9, 0.1, 0.0)], &planes).is_none());
    }
}
