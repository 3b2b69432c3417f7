//! Axis-aligned bounding boxes

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
///
/// A freshly created box is *invalid* (min > max) until a point is added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// Create a new bounding box from explicit corners
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// An empty (invalid) box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Create a bounding box from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let mut bbox = Self::empty();
        for v in vertices {
            bbox.expand_by_point(Vector3::new(v[0], v[1], v[2]));
        }
        bbox
    }

    /// Whether the box contains at least one point
    pub fn valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn expand_by_point(&mut self, v: Vector3<f32>) {
        self.min.x = self.min.x.min(v.x);
        self.min.y = self.min.y.min(v.y);
        self.min.z = self.min.z.min(v.z);
        self.max.x = self.max.x.max(v.x);
        self.max.y = self.max.y.max(v.y);
        self.max.z = self.max.z.max(v.z);
    }

    pub fn expand_by_box(&mut self, other: &BoundingBox) {
        if other.valid() {
            self.expand_by_point(other.min);
            self.expand_by_point(other.max);
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere enclosing the box
    pub fn radius(&self) -> f32 {
        if !self.valid() {
            return 0.0;
        }
        (self.max - self.min).magnitude() * 0.5
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Apply a transformation matrix to the box
    ///
    /// Transforms all 8 corners and computes new bounds around them.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        if !self.valid() {
            return *self;
        }

        let mut result = Self::empty();
        for corner in &self.corners() {
            let transformed = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            result.expand_by_point(transformed.truncate() / transformed.w);
        }
        result
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let bbox = BoundingBox::from_vertices(&vertices);

        assert_eq!(bbox.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(bbox.center(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_box_is_invalid() {
        let bbox = BoundingBox::empty();
        assert!(!bbox.valid());
        assert_eq!(bbox.radius(), 0.0);

        let mut other = BoundingBox::empty();
        other.expand_by_box(&bbox);
        assert!(!other.valid());
    }

    #[test]
    fn test_bbox_transform() {
        let bbox = BoundingBox::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let moved = bbox.transform(&Matrix4::from_translation(Vector3::new(6.0, 0.0, 0.0)));

        assert_eq!(moved.min, Vector3::new(5.0, -1.0, -1.0));
        assert_eq!(moved.max, Vector3::new(7.0, 1.0, 1.0));
    }
}
