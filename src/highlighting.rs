//! Style definitions shared between rendering passes.

use crate::freezable::{
    CloneMutable, Freezable, FreezeCapability, FreezeState, FrozenList, FrozenMutationError,
    check_mutable, freeze_list_and_elements,
};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationLocation {
    Underline,
    Strikethrough,
    Overline,
}

// Plain values: nothing to freeze, but they may still be stored in frozen lists.
impl FreezeCapability for Color {}
impl FreezeCapability for FontWeight {}
impl FreezeCapability for FontStyle {}
impl FreezeCapability for DecorationLocation {}

/// A line drawn across a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDecoration {
    location: DecorationLocation,
    thickness: f32,
    state: FreezeState,
}

impl TextDecoration {
    pub fn new(location: DecorationLocation) -> Self {
        Self {
            location,
            thickness: 1.0,
            state: FreezeState::default(),
        }
    }

    pub fn location(&self) -> DecorationLocation {
        self.location
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f32) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.thickness = thickness;
        Ok(())
    }
}

impl Freezable for TextDecoration {
    fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    fn freeze_core(&mut self) {
        self.state.set_frozen();
    }
}

impl CloneMutable for TextDecoration {
    fn clone_mutable(&self) -> Self {
        self.clone()
    }
}

crate::freezable_capability!(TextDecoration);

/// Visual attributes applied to a run of text. Unset attributes inherit from
/// whatever the renderer draws underneath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightingColor {
    name: Option<String>,
    foreground: Option<Color>,
    background: Option<Color>,
    font_weight: Option<FontWeight>,
    font_style: Option<FontStyle>,
    decorations: FrozenList<TextDecoration>,
    state: FreezeState,
}

impl HighlightingColor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blue underlined text, the usual look of a clickable link.
    pub fn link_default() -> Self {
        Self {
            name: Some("Link".to_string()),
            foreground: Some(Color::rgb(0x00, 0x00, 0xff)),
            decorations: freeze_list_and_elements(vec![TextDecoration::new(
                DecorationLocation::Underline,
            )]),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn font_weight(&self) -> Option<FontWeight> {
        self.font_weight
    }

    pub fn font_style(&self) -> Option<FontStyle> {
        self.font_style
    }

    pub fn decorations(&self) -> &FrozenList<TextDecoration> {
        &self.decorations
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.name = Some(name.into());
        Ok(())
    }

    pub fn set_foreground(&mut self, color: Option<Color>) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.foreground = color;
        Ok(())
    }

    pub fn set_background(&mut self, color: Option<Color>) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.background = color;
        Ok(())
    }

    pub fn set_font_weight(
        &mut self,
        weight: Option<FontWeight>,
    ) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.font_weight = weight;
        Ok(())
    }

    pub fn set_font_style(&mut self, style: Option<FontStyle>) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.font_style = style;
        Ok(())
    }

    /// Replaces the decorations. Each decoration is frozen on the way in.
    pub fn set_decorations(
        &mut self,
        decorations: Vec<TextDecoration>,
    ) -> Result<(), FrozenMutationError> {
        check_mutable(self)?;
        self.decorations = freeze_list_and_elements(decorations);
        Ok(())
    }
}

impl Freezable for HighlightingColor {
    fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    fn freeze_core(&mut self) {
        // Decorations were frozen when stored; only the flag remains.
        log::trace!("Freezing highlighting color {:?}", self.name);
        self.state.set_frozen();
    }
}

impl CloneMutable for HighlightingColor {
    fn clone_mutable(&self) -> Self {
        self.clone()
    }
}

crate::freezable_capability!(HighlightingColor);
