//! Direction-arrow overlay geometry.
//!
//! Arrows are sampled at a fixed index interval so their density is bounded
//! independently of path length, lifted above the path on "poles" whose
//! height scales with eye distance, and sized from the on-screen pixel size
//! so they stay readable at any zoom.

use foundation::math::{ReferencePoint, Vec3};
use track::{Appearance, TrackPoint};

use crate::buffers::VertexBuffer;
use crate::host::PathTessellator;

/// Every 30th tessellated position gets an arrow sample.
pub const SAMPLE_INTERVAL: usize = 30;

/// Half of the arrowhead apex angle (30 degrees).
pub const ARROW_HALF_ANGLE_RAD: f64 = std::f64::consts::FRAC_PI_6;

/// Sampled indices: first, last, and every [`SAMPLE_INTERVAL`]-th position.
///
/// Ascending, deduplicated.
pub fn sample_indices(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..len).step_by(SAMPLE_INTERVAL).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

/// Renderable arrow count for a filled arrow-surface buffer.
pub fn arrow_count(surface: &VertexBuffer) -> usize {
    surface.len() / 9
}

/// Generate pole, surface, and border geometry for a tessellated path.
///
/// All vertices are written relative to `reference`, which must be the same
/// reference point used for the main vertex buffer of this pass.
/// `altitude_offset` is the whole-path offset computed once per recompute.
///
/// With fewer than two poles nothing is generated; that is not an error.
pub fn generate(
    tess: &impl PathTessellator,
    points: &[TrackPoint],
    appearance: &Appearance,
    reference: ReferencePoint,
    altitude_offset: f64,
    positions_out: &mut VertexBuffer,
    surface_out: &mut VertexBuffer,
    border_out: &mut VertexBuffer,
) {
    positions_out.clear();
    surface_out.clear();
    border_out.clear();

    let samples = sample_indices(points.len());
    if samples.len() < 2 {
        return;
    }

    // The pole detaches the arrow from the terrain proportionally to the
    // viewing distance; spacing is a percentage-style setting.
    let pole_height =
        tess.eye_distance() / ((100.0 / f64::from(appearance.arrow_spacing)) * 1.5);
    let exaggeration = tess.vertical_exaggeration();

    positions_out.ensure_capacity(samples.len() * 3);
    surface_out.ensure_capacity((samples.len() - 1) * 9);
    border_out.ensure_capacity((samples.len() - 1) * 18);

    let mut poles: Vec<Vec3> = Vec::with_capacity(samples.len());
    for &index in &samples {
        let point = &points[index];
        let render_alt = exaggeration * point.position.alt_m + altitude_offset;
        let absolute = tess.surface_point(point.position, appearance.altitude_mode, render_alt);
        let pole = absolute + tess.surface_normal(absolute) * pole_height;
        positions_out.push(&reference.relative(pole));
        poles.push(pole);
    }

    for pair in poles.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let parallel = a - b;
        let segment_len = parallel.length();
        if segment_len <= 0.0 {
            continue;
        }

        let mut mid = a.midpoint(b);
        let arrow_len =
            f64::from(appearance.arrow_size) * tess.pixel_size_at(tess.eye_distance_to(mid));

        // Too short to show an arrow cleanly.
        if segment_len <= arrow_len {
            continue;
        }

        let arrow_base = arrow_len * ARROW_HALF_ANGLE_RAD.tan();
        let perp = tess.surface_normal(b).cross(parallel).normalized() * arrow_base;
        let parallel = parallel.normalized() * arrow_len;

        // Center on the segment midpoint when there is room; otherwise the
        // tip stays anchored at the midpoint. The skip above shares the
        // exact boundary, leaving the tip-anchored branch latent.
        if segment_len > arrow_len {
            mid = mid - parallel * 0.5;
        }

        let tip = mid;
        let base1 = mid + parallel + perp;
        let base2 = mid + parallel - perp;

        surface_out.push(&reference.relative(tip));
        surface_out.push(&reference.relative(base1));
        surface_out.push(&reference.relative(base2));

        for edge in [(tip, base1), (base1, base2), (base2, tip)] {
            border_out.push(&reference.relative(edge.0));
            border_out.push(&reference.relative(edge.1));
        }
    }
}
