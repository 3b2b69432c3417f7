//! # Camera
//!
//! [`Camera`] holds the matrices a renderer draws with. [`OrbitManipulator`]
//! is the default camera event handler and drives an [`OrbitCamera`].

pub mod camera_utils;
pub mod orbit_camera;
pub mod orbit_manipulator;

// Re-export main types
pub use camera_utils::{Camera, CameraUniform};
pub use orbit_camera::OrbitCamera;
pub use orbit_manipulator::OrbitManipulator;
