use cgmath::{perspective, Deg, Matrix4, SquareMatrix};

/// The viewer's camera: view and projection matrices plus framebuffer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub clear_color: [f32; 4],
    /// Viewport size in pixels
    pub viewport: (u32, u32),
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            clear_color: [0.2, 0.2, 0.4, 1.0],
            viewport: (width, height),
            fovy,
            znear,
            zfar,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        let (w, h) = self.viewport;
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    /// Follow a window resize; keeps the field of view and updates the aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.update_projection();
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// Camera position in world space
    pub fn eye(&self) -> [f32; 3] {
        let inv = self.view.invert().unwrap_or_else(Matrix4::identity);
        [inv.w.x, inv.w.y, inv.w.z]
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_position: [eye[0], eye[1], eye[2], 1.0],
            view_proj: convert_matrix4_to_array(self.view_projection()),
        }
    }

    fn update_projection(&mut self) {
        self.projection = perspective(self.fovy, self.aspect(), self.znear, self.zfar);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600, Deg(30.0), 1.0, 1000.0)
    }
}

/// Per-frame camera data in the layout a shader uniform expects
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

pub fn convert_array_to_matrix4(array: [[f32; 4]; 4]) -> Matrix4<f32> {
    Matrix4::from(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector3};

    #[test]
    fn test_matrix_array_conversion() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let a = convert_matrix4_to_array(m);
        assert_eq!(a[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(convert_array_to_matrix4(a), m);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::default();
        camera.resize(1000, 500);
        assert_eq!(camera.aspect(), 2.0);
        assert_eq!(camera.projection, perspective(Deg(30.0), 2.0, 1.0, 1000.0));
    }

    #[test]
    fn test_eye_from_view() {
        let mut camera = Camera::default();
        camera.view = Matrix4::look_at_rh(Point3::new(0.0, -10.0, 0.0), Point3::new(0.0, 0.0, 0.0), Vector3::unit_z());
        let eye = camera.eye();
        assert!((eye[1] + 10.0).abs() < 1e-4);
    }
}
