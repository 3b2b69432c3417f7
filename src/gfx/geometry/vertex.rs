//! # Vertex Data Structures
//!
//! Interleaved vertex layout handed to a render backend when it uploads a
//! [`Geometry`](super::Geometry).

/// A 3D vertex with position, normal, color and texture coordinate.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, which is what GPU buffer uploads expect.
///
/// # Examples
///
/// ```
/// use thistle::gfx::geometry::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
///     color: [1.0, 1.0, 1.0, 1.0],
///     tex_coord: [0.0, 0.0],
/// };
/// assert_eq!(bytemuck::bytes_of(&vertex).len(), Vertex3D::STRIDE);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
    /// Texture coordinate for unit 0
    pub tex_coord: [f32; 2],
}

impl Vertex3D {
    /// Size of one interleaved vertex in bytes
    pub const STRIDE: usize = std::mem::size_of::<Vertex3D>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_stride() {
        // 3 + 3 + 4 + 2 floats
        assert_eq!(Vertex3D::STRIDE, 12 * 4);
    }
}
