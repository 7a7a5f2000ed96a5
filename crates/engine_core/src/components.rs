//! Common components shared by game entities.

/// Integer hit points. Display never shows a negative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Value shown on the HUD, clamped at zero.
    pub fn display_value(&self) -> i32 {
        self.current.max(0)
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Opaque reference to an entity's visual in the rendering substrate.
///
/// The substrate owns the scene graph; entities only hold this handle and
/// never reach into graph internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u32);
