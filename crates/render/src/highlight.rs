//! State-dependent color resolution.
//!
//! Geometry is computed state-independently and cached; colors are resolved
//! fresh every frame from the hover/selection flags and the appearance
//! snapshot. Resolution is a pure table lookup with no blending.

use foundation::Rgba;
use track::{Appearance, ColorMode, ElementKind, HighlightState};

/// Resolve the draw color of an element for one highlight state.
///
/// `None` means "use the per-vertex gradient color buffer instead of a
/// solid color".
pub fn resolve_color(
    appearance: &Appearance,
    kind: ElementKind,
    state: HighlightState,
) -> Option<Rgba> {
    let style = appearance.element(kind).for_state(state);
    match style.color_mode {
        ColorMode::SolidColor => Some(Rgba::from_rgb(style.color, style.opacity)),
        ColorMode::TrackValueGradient => None,
    }
}

/// [`resolve_color`] with a fallback for buffers without a color channel.
///
/// A state can be configured `TrackValueGradient` while the track carries no
/// color values; the vertex buffer is then plain positions and the gradient
/// sentinel would leave the draw command with nothing to shade with. The
/// configured style color steps in.
pub fn resolve_draw_color(
    appearance: &Appearance,
    kind: ElementKind,
    state: HighlightState,
    has_color_channel: bool,
) -> Option<Rgba> {
    match resolve_color(appearance, kind, state) {
        None if !has_color_channel => {
            let style = appearance.element(kind).for_state(state);
            Some(Rgba::from_rgb(style.color, style.opacity))
        }
        resolved => resolved,
    }
}

/// Arrow fill color, resolved only from the hovered/selected outline styles.
///
/// Arrows are never drawn in the normal state, so `None` here means "skip
/// the arrow draw entirely". A gradient outline still yields its configured
/// color: an arrowhead is a single solid shape and cannot be
/// gradient-shaded.
pub fn arrow_fill_color(appearance: &Appearance, hovered: bool, selected: bool) -> Option<Rgba> {
    let state = HighlightState::from_flags(hovered, selected);
    if !state.is_highlighted() {
        return None;
    }
    let style = appearance.outline.for_state(state);
    Some(Rgba::from_rgb(style.color, style.opacity))
}

/// Arrow border color: the luminance contrast of the fill, not configured.
pub fn arrow_border_color(fill: Rgba) -> Rgba {
    fill.contrasting()
}
