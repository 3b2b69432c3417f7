//! Light sources

use serde::{Deserialize, Serialize};

/// A positional or directional light
///
/// `position.w == 0` makes the light directional. The position is in the
/// coordinate frame of the light source node that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light number, also the index of the matching [`Mode::Light`](super::Mode::Light)
    pub number: u8,
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl Light {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: [f32; 4]) -> Self {
        self.position = position;
        self
    }

    pub fn with_diffuse(mut self, diffuse: [f32; 4]) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_specular(mut self, specular: [f32; 4]) -> Self {
        self.specular = specular;
        self
    }

    pub fn is_directional(&self) -> bool {
        self.position[3] == 0.0
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            number: 0,
            position: [0.0, 0.0, 1.0, 0.0],
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
