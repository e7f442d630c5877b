//! The per-frame draw entry point.
//!
//! One synchronous pass per redraw: recompute geometry if the path's render
//! data expired, resolve state-dependent colors, make the GPU handle set
//! match the feature flags, upload what changed, and emit draw commands.
//! The appearance snapshot is taken once by the caller and used for every
//! sub-step; it is never re-read mid-computation.

use foundation::Rgba;
use foundation::math::ReferencePoint;
use rand::Rng;
use track::{Appearance, ElementKind, HighlightState, TrackPath};

use crate::arrows;
use crate::buffers::{BufferRole, VertexLayout};
use crate::cache::{PathRenderData, RenderCache, RenderEntry};
use crate::highlight;
use crate::host::{BufferHandle, GpuError, GpuResources, PathTessellator, TessellationError};
use crate::transform;

/// Primitive topology of one draw command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

/// One host draw call over a GPU-resident buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCommand {
    pub handle: BufferHandle,
    pub primitive: Primitive,
    pub vertex_count: usize,
    /// Vertex index step; 2 skips the interleaved ground vertices of an
    /// extruded buffer.
    pub step: usize,
    pub layout: VertexLayout,
    /// Solid draw color, or `None` to shade from the per-vertex color
    /// channel declared by `layout`.
    pub color: Option<Rgba>,
}

/// Ordered draw calls for one track in one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

/// Render one track for the current frame.
///
/// Recompute failures are logged and swallowed so a single bad pass cannot
/// crash the render loop; the track renders with stale data (or nothing on
/// a first draw) until the next successful recompute. GPU failures are
/// propagated.
pub fn draw_track(
    cache: &mut RenderCache,
    gpu: &mut impl GpuResources,
    tess: &impl PathTessellator,
    path: &TrackPath,
    appearance: &Appearance,
    hovered: bool,
    selected: bool,
    rng: &mut impl Rng,
) -> Result<Frame, GpuError> {
    let entry = cache.entry_or_default(path.id());

    if entry.data.needs_recompute() {
        entry.data.expiry_flag().take();
        if let Err(err) = recompute(&mut entry.data, tess, path, appearance, rng) {
            log::warn!("track {:?}: {err}; rendering stale data", path.id());
            // Re-arm the flag so the next draw tries again.
            entry.data.set_expired();
        }
    }

    if !entry.data.filled() || entry.data.tessellated.is_empty() {
        return Ok(Frame::default());
    }

    let fresh = entry.ensure_handles(path.id(), appearance, gpu)?;
    if fresh || entry.data.is_dirty() {
        entry.upload_all(gpu)?;
        // Cleared only after every buffer reached the GPU; a partial upload
        // failure leaves the data dirty so the next frame retries.
        entry.data.clear_dirty();
    }

    Ok(build_frame(entry, appearance, hovered, selected))
}

fn recompute(
    data: &mut PathRenderData,
    tess: &impl PathTessellator,
    path: &TrackPath,
    appearance: &Appearance,
    rng: &mut impl Rng,
) -> Result<(), TessellationError> {
    let points = tess.tessellate(path)?;
    let reference = ReferencePoint::new(tess.reference_point(path));

    // Computed once: all buffers of this pass must agree on the offset,
    // including its random jitter.
    let offset = transform::path_altitude_offset(
        appearance,
        tess.eye_elevation(),
        tess.vertical_exaggeration(),
        rng,
    );

    data.reference = reference;
    data.layout =
        transform::fill_main_buffer(tess, &points, appearance, reference, offset, &mut data.main);

    if appearance.arrows_visible {
        arrows::generate(
            tess,
            &points,
            appearance,
            reference,
            offset,
            &mut data.arrow_positions,
            &mut data.arrow_surface,
            &mut data.arrow_border,
        );
    } else {
        data.arrow_positions.clear();
        data.arrow_surface.clear();
        data.arrow_border.clear();
    }

    data.tessellated = points;
    data.mark_filled();
    Ok(())
}

fn build_frame(
    entry: &RenderEntry,
    appearance: &Appearance,
    hovered: bool,
    selected: bool,
) -> Frame {
    let state = HighlightState::from_flags(hovered, selected);
    let data = &entry.data;
    let n = data.tessellated.len();
    let layout = data.layout;
    let step = if appearance.extruded { 2 } else { 1 };
    let has_color_channel = layout.color_offset.is_some();
    let outline =
        highlight::resolve_draw_color(appearance, ElementKind::Outline, state, has_color_channel);

    let mut frame = Frame::default();
    let mut push = |handle: Option<BufferHandle>, command: DrawCommand| {
        if let Some(handle) = handle {
            frame.commands.push(DrawCommand { handle, ..command });
        }
    };
    let template = DrawCommand {
        handle: BufferHandle(0),
        primitive: Primitive::LineStrip,
        vertex_count: n,
        step: 1,
        layout,
        color: outline,
    };

    if appearance.extruded {
        // Curtain between the path and the ground, then the verticals.
        push(
            entry.handle_for(BufferRole::Main),
            DrawCommand {
                primitive: Primitive::TriangleStrip,
                vertex_count: 2 * n,
                color: highlight::resolve_draw_color(
                    appearance,
                    ElementKind::Interior,
                    state,
                    has_color_channel,
                ),
                ..template
            },
        );
        push(
            entry.handle_for(BufferRole::ExtrusionVerticals),
            DrawCommand {
                primitive: Primitive::Lines,
                vertex_count: 2 * n,
                ..template
            },
        );
    }

    push(
        entry.handle_for(BufferRole::Main),
        DrawCommand { step, ..template },
    );

    if appearance.show_position_markers {
        push(
            entry.handle_for(BufferRole::Markers),
            DrawCommand {
                primitive: Primitive::Points,
                step,
                ..template
            },
        );
    }

    // Geometry is cached regardless of state; drawing it is gated on the
    // highlight state and the resolved fill color.
    if appearance.arrows_visible && state.is_highlighted() {
        if let Some(fill) = highlight::arrow_fill_color(appearance, hovered, selected) {
            let count = arrows::arrow_count(&data.arrow_surface);
            if count > 0 {
                let arrow = DrawCommand {
                    layout: VertexLayout::position(),
                    ..template
                };
                push(
                    entry.handle_for(BufferRole::ArrowSurface),
                    DrawCommand {
                        primitive: Primitive::Triangles,
                        vertex_count: 3 * count,
                        color: Some(fill),
                        ..arrow
                    },
                );
                push(
                    entry.handle_for(BufferRole::ArrowBorder),
                    DrawCommand {
                        primitive: Primitive::Lines,
                        vertex_count: 6 * count,
                        color: Some(highlight::arrow_border_color(fill)),
                        ..arrow
                    },
                );
            }
        }
    }

    frame
}
