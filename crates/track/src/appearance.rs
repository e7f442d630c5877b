//! Per-track visual settings.
//!
//! [`Appearance`] is an immutable per-render snapshot: the draw entry point
//! takes one copy at the start of a pass and every sub-step reads that copy.
//! The live configuration the UI mutates lives upstream; it is never read
//! mid-computation.

use serde::{Deserialize, Serialize};

/// How a position's altitude is interpreted by the globe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltitudeMode {
    Absolute,
    RelativeToGround,
    ClampToGround,
}

/// How the whole-path altitude offset is computed (Absolute altitude mode only).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetMode {
    /// A fixed distance in meters.
    Absolute,
    /// A percentage of the current eye elevation.
    Relative,
}

/// Per-element color source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    SolidColor,
    /// Use the per-vertex gradient color buffer instead of a solid color.
    TrackValueGradient,
}

/// The two styled elements of a rendered track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Outline,
    Interior,
}

/// The four mutually exclusive highlight states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HighlightState {
    Normal,
    Hovered,
    Selected,
    HoveredSelected,
}

impl HighlightState {
    pub fn from_flags(hovered: bool, selected: bool) -> Self {
        match (hovered, selected) {
            (true, true) => Self::HoveredSelected,
            (true, false) => Self::Hovered,
            (false, true) => Self::Selected,
            (false, false) => Self::Normal,
        }
    }

    pub fn is_highlighted(self) -> bool {
        self != Self::Normal
    }
}

/// Color configuration of one element in one highlight state.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateStyle {
    pub color_mode: ColorMode,
    pub color: [f32; 3],
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl StateStyle {
    pub fn solid(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color_mode: ColorMode::SolidColor,
            color,
            opacity,
        }
    }

    pub fn gradient() -> Self {
        Self {
            color_mode: ColorMode::TrackValueGradient,
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
        }
    }
}

/// Styles of one element across all four highlight states.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub normal: StateStyle,
    pub hovered: StateStyle,
    pub selected: StateStyle,
    pub hovered_selected: StateStyle,
}

impl ElementStyle {
    pub fn uniform(style: StateStyle) -> Self {
        Self {
            normal: style,
            hovered: style,
            selected: style,
            hovered_selected: style,
        }
    }

    /// Direct table lookup; no blending between states.
    pub fn for_state(&self, state: HighlightState) -> &StateStyle {
        match state {
            HighlightState::Normal => &self.normal,
            HighlightState::Hovered => &self.hovered,
            HighlightState::Selected => &self.selected,
            HighlightState::HoveredSelected => &self.hovered_selected,
        }
    }

    fn uses_gradient(&self) -> bool {
        [
            self.normal,
            self.hovered,
            self.selected,
            self.hovered_selected,
        ]
        .iter()
        .any(|s| s.color_mode == ColorMode::TrackValueGradient)
    }
}

/// Endpoint colors of the track-value gradient ramp.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientRamp {
    pub low: [f32; 3],
    pub high: [f32; 3],
}

impl Default for GradientRamp {
    fn default() -> Self {
        Self {
            low: [0.1, 0.5, 0.1],
            high: [0.9, 0.15, 0.1],
        }
    }
}

/// Immutable per-render snapshot of all track appearance settings.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub altitude_mode: AltitudeMode,
    pub altitude_offset_enabled: bool,
    pub altitude_offset_mode: OffsetMode,
    pub absolute_offset_m: i32,
    pub relative_offset_percent: i32,
    /// Scatter the offset per recompute so stacked tracks separate visually.
    pub offset_randomized: bool,

    pub arrows_visible: bool,
    pub arrow_size: f32,
    pub arrow_spacing: f32,

    pub show_position_markers: bool,
    pub marker_size: f32,
    /// Extrude the path to the ground with vertical connector lines.
    pub extruded: bool,

    pub outline: ElementStyle,
    pub interior: ElementStyle,
    pub gradient: GradientRamp,
}

impl Appearance {
    pub fn element(&self, kind: ElementKind) -> &ElementStyle {
        match kind {
            ElementKind::Outline => &self.outline,
            ElementKind::Interior => &self.interior,
        }
    }

    /// True if any state of any element wants the per-vertex gradient buffer.
    ///
    /// The vertex buffer is computed state-independently, so it must carry
    /// color data whenever some reachable state could need it.
    pub fn uses_gradient(&self) -> bool {
        self.outline.uses_gradient() || self.interior.uses_gradient()
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            altitude_mode: AltitudeMode::ClampToGround,
            altitude_offset_enabled: false,
            altitude_offset_mode: OffsetMode::Absolute,
            absolute_offset_m: 0,
            relative_offset_percent: 0,
            offset_randomized: false,
            arrows_visible: true,
            arrow_size: 12.0,
            arrow_spacing: 10.0,
            show_position_markers: false,
            marker_size: 4.0,
            extruded: false,
            outline: ElementStyle::uniform(StateStyle::solid([0.2, 0.4, 0.9], 1.0)),
            interior: ElementStyle::uniform(StateStyle::solid([0.2, 0.4, 0.9], 0.5)),
            gradient: GradientRamp::default(),
        }
    }
}
