//! # Render State
//!
//! A [`StateSet`] holds the render modes and attributes a node applies to its
//! subtree. State is inherited top-down; a parent value flagged
//! [`StateValue::OVERRIDE`] wins over its descendants unless the descendant's
//! value is flagged [`StateValue::PROTECTED`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::BitOr;

/// On/off value of a mode or attribute plus inheritance flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateValue(u8);

impl StateValue {
    pub const OFF: StateValue = StateValue(0);
    pub const ON: StateValue = StateValue(1);
    /// Parent value overrides descendants
    pub const OVERRIDE: StateValue = StateValue(2);
    /// Value cannot be overridden by an ancestor
    pub const PROTECTED: StateValue = StateValue(4);

    pub fn is_on(self) -> bool {
        self.0 & Self::ON.0 != 0
    }

    pub fn is_override(self) -> bool {
        self.0 & Self::OVERRIDE.0 != 0
    }

    pub fn is_protected(self) -> bool {
        self.0 & Self::PROTECTED.0 != 0
    }
}

impl BitOr for StateValue {
    type Output = StateValue;

    fn bitor(self, rhs: StateValue) -> StateValue {
        StateValue(self.0 | rhs.0)
    }
}

/// Fixed-function modes that can be switched on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    Lighting,
    /// Light number `n`
    Light(u8),
    CullFace,
    Blend,
    AlphaTest,
    DepthTest,
    /// 2D texturing on texture unit `n`
    Texture2D(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullFace {
    Front,
    #[default]
    Back,
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonFace {
    Front,
    Back,
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonFill {
    Point,
    Line,
    Fill,
}

/// How polygons are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonMode {
    pub face: PolygonFace,
    pub fill: PolygonFill,
}

/// Which material colors track the primary vertex color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    Off,
    Ambient,
    Diffuse,
    Specular,
    Emission,
    AmbientAndDiffuse,
}

/// Surface material used by lighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color_mode: ColorMode,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    /// Specular exponent, clamped to 0..=128
    pub shininess: f32,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diffuse(mut self, diffuse: [f32; 4]) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_specular(mut self, specular: [f32; 4]) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.clamp(0.0, 128.0);
        self
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Off,
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emission: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendFunc {
    pub source: BlendFactor,
    pub destination: BlendFactor,
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self {
            source: BlendFactor::SrcAlpha,
            destination: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Alpha test: fragments pass when `alpha <func> reference`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaFunc {
    pub func: CompareFunc,
    pub reference: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    Clamp,
    #[default]
    Repeat,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
    LinearMipmapLinear,
}

/// A 2D texture referenced by image path
///
/// The image itself is loaded by the render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture2D {
    pub image_path: String,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

impl Texture2D {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
        }
    }
}

/// Key an attribute is stored under; one attribute per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    ShadeModel,
    CullFace,
    PolygonMode,
    LineWidth,
    Point,
    Material,
    BlendFunc,
    AlphaFunc,
    Texture2D(u8),
}

/// A render state attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateAttribute {
    ShadeModel(ShadeModel),
    CullFace(CullFace),
    PolygonMode(PolygonMode),
    LineWidth(f32),
    /// Point size in pixels
    Point(f32),
    Material(Material),
    BlendFunc(BlendFunc),
    AlphaFunc(AlphaFunc),
    /// Texture bound to a texture unit
    Texture2D { unit: u8, texture: Texture2D },
}

impl StateAttribute {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::ShadeModel(_) => AttributeType::ShadeModel,
            Self::CullFace(_) => AttributeType::CullFace,
            Self::PolygonMode(_) => AttributeType::PolygonMode,
            Self::LineWidth(_) => AttributeType::LineWidth,
            Self::Point(_) => AttributeType::Point,
            Self::Material(_) => AttributeType::Material,
            Self::BlendFunc(_) => AttributeType::BlendFunc,
            Self::AlphaFunc(_) => AttributeType::AlphaFunc,
            Self::Texture2D { unit, .. } => AttributeType::Texture2D(*unit),
        }
    }

    /// The mode an attribute switches when set with
    /// [`StateSet::set_attribute_and_modes`]
    pub fn associated_mode(&self) -> Option<Mode> {
        match self {
            Self::CullFace(_) => Some(Mode::CullFace),
            Self::BlendFunc(_) => Some(Mode::Blend),
            Self::AlphaFunc(_) => Some(Mode::AlphaTest),
            Self::Texture2D { unit, .. } => Some(Mode::Texture2D(*unit)),
            Self::ShadeModel(_)
            | Self::PolygonMode(_)
            | Self::LineWidth(_)
            | Self::Point(_)
            | Self::Material(_) => None,
        }
    }
}

/// Modes and attributes applied to a subtree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSet {
    modes: BTreeMap<Mode, StateValue>,
    attributes: BTreeMap<AttributeType, (StateAttribute, StateValue)>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty() && self.attributes.is_empty()
    }

    pub fn set_mode(&mut self, mode: Mode, value: StateValue) {
        self.modes.insert(mode, value);
    }

    pub fn mode(&self, mode: Mode) -> Option<StateValue> {
        self.modes.get(&mode).copied()
    }

    pub fn remove_mode(&mut self, mode: Mode) {
        self.modes.remove(&mode);
    }

    pub fn modes(&self) -> impl Iterator<Item = (Mode, StateValue)> + '_ {
        self.modes.iter().map(|(m, v)| (*m, *v))
    }

    /// Set an attribute without touching any mode
    pub fn set_attribute(&mut self, attribute: StateAttribute) {
        self.set_attribute_with(attribute, StateValue::ON);
    }

    pub fn set_attribute_with(&mut self, attribute: StateAttribute, value: StateValue) {
        self.attributes
            .insert(attribute.attribute_type(), (attribute, value));
    }

    /// Set an attribute and switch its associated mode (if any) to `value`
    pub fn set_attribute_and_modes(&mut self, attribute: StateAttribute, value: StateValue) {
        if let Some(mode) = attribute.associated_mode() {
            self.set_mode(mode, value);
        }
        self.set_attribute_with(attribute, value);
    }

    /// Bind a texture to `unit` and enable 2D texturing on that unit
    pub fn set_texture_attribute_and_modes(&mut self, unit: u8, texture: Texture2D, value: StateValue) {
        self.set_attribute_and_modes(StateAttribute::Texture2D { unit, texture }, value);
    }

    pub fn attribute(&self, ty: AttributeType) -> Option<&StateAttribute> {
        self.attributes.get(&ty).map(|(a, _)| a)
    }

    pub fn attribute_mut(&mut self, ty: AttributeType) -> Option<&mut StateAttribute> {
        self.attributes.get_mut(&ty).map(|(a, _)| a)
    }

    pub fn attribute_value(&self, ty: AttributeType) -> Option<StateValue> {
        self.attributes.get(&ty).map(|(_, v)| *v)
    }

    pub fn remove_attribute(&mut self, ty: AttributeType) {
        self.attributes.remove(&ty);
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&StateAttribute, StateValue)> + '_ {
        self.attributes.values().map(|(a, v)| (a, *v))
    }

    /// Combine the accumulated parent state with a child's state set
    ///
    /// The child's entries replace the parent's, except where the parent entry
    /// is OVERRIDE and the child entry is not PROTECTED.
    pub fn accumulate(&self, child: &StateSet) -> StateSet {
        let mut result = self.clone();

        for (mode, value) in &child.modes {
            let parent_wins = self
                .modes
                .get(mode)
                .is_some_and(|p| p.is_override() && !value.is_protected());
            if !parent_wins {
                result.modes.insert(*mode, *value);
            }
        }

        for (ty, (attribute, value)) in &child.attributes {
            let parent_wins = self
                .attributes
                .get(ty)
                .is_some_and(|(_, p)| p.is_override() && !value.is_protected());
            if !parent_wins {
                result.attributes.insert(*ty, (attribute.clone(), *value));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_and_modes() {
        let mut state = StateSet::new();
        state.set_attribute_and_modes(StateAttribute::CullFace(CullFace::Back), StateValue::ON);
        state.set_attribute(StateAttribute::LineWidth(3.0));

        assert_eq!(state.mode(Mode::CullFace), Some(StateValue::ON));
        assert_eq!(
            state.attribute(AttributeType::LineWidth),
            Some(&StateAttribute::LineWidth(3.0))
        );
        // Line width has no mode of its own
        assert_eq!(state.modes().count(), 1);
    }

    #[test]
    fn test_child_replaces_parent() {
        let mut parent = StateSet::new();
        parent.set_attribute(StateAttribute::ShadeModel(ShadeModel::Smooth));

        let mut child = StateSet::new();
        child.set_attribute(StateAttribute::ShadeModel(ShadeModel::Flat));

        let acc = parent.accumulate(&child);
        assert_eq!(
            acc.attribute(AttributeType::ShadeModel),
            Some(&StateAttribute::ShadeModel(ShadeModel::Flat))
        );
    }

    #[test]
    fn test_override_and_protected() {
        let mut root = StateSet::new();
        root.set_mode(Mode::Lighting, StateValue::OFF | StateValue::OVERRIDE);

        let mut child = StateSet::new();
        child.set_mode(Mode::Lighting, StateValue::ON);
        let acc = root.accumulate(&child);
        assert!(!acc.mode(Mode::Lighting).unwrap().is_on());

        let mut protected_child = StateSet::new();
        protected_child.set_mode(Mode::Lighting, StateValue::ON | StateValue::PROTECTED);
        let acc = root.accumulate(&protected_child);
        assert!(acc.mode(Mode::Lighting).unwrap().is_on());
    }

    #[test]
    fn test_texture_unit_mode() {
        let mut state = StateSet::new();
        state.set_texture_attribute_and_modes(0, Texture2D::new("tree0.rgba"), StateValue::ON);

        assert_eq!(state.mode(Mode::Texture2D(0)), Some(StateValue::ON));
        assert!(state.attribute(AttributeType::Texture2D(0)).is_some());
        assert!(state.attribute(AttributeType::Texture2D(1)).is_none());
    }

    #[test]
    fn test_material_shininess_clamped() {
        let mat = Material::new().with_shininess(500.0);
        assert_eq!(mat.shininess, 128.0);
    }
}
