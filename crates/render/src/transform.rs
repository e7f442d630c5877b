//! Position transformer: geodetic track positions to a flat vertex buffer.

use foundation::Rgba;
use foundation::math::ReferencePoint;
use rand::Rng;
use track::{AltitudeMode, Appearance, GradientRamp, OffsetMode, TrackPoint};

use crate::buffers::{VertexBuffer, VertexLayout};
use crate::host::PathTessellator;

/// Scalar altitude offset applied to the whole path for one recompute.
///
/// Zero unless the altitude mode is Absolute and the offset is enabled.
/// The randomized jitter is drawn exactly once per recompute, so every
/// buffer that must agree on a position sees the same offset; the
/// recompute is the unit of determinism, not the vertex.
pub fn path_altitude_offset(
    appearance: &Appearance,
    eye_elevation: f64,
    vertical_exaggeration: f64,
    rng: &mut impl Rng,
) -> f64 {
    if appearance.altitude_mode != AltitudeMode::Absolute || !appearance.altitude_offset_enabled {
        return 0.0;
    }

    let mut offset = match appearance.altitude_offset_mode {
        OffsetMode::Absolute => f64::from(appearance.absolute_offset_m),
        OffsetMode::Relative => {
            eye_elevation / 100.0 * f64::from(appearance.relative_offset_percent)
        }
    };

    if appearance.offset_randomized {
        offset *= rng.gen_range(0.1..1.1);
    }

    offset * vertical_exaggeration
}

/// Fill the main vertex buffer for a tessellated position list.
///
/// Layout per vertex: 3 floats (x, y, z relative to `reference`), or 7 when
/// per-vertex gradient coloring is active. Extrusion appends a
/// ground-projected vertex after each position, doubling the vertex count
/// with `[top, ground]` interleaving.
///
/// The buffer is refilled in place; backing capacity only grows.
pub fn fill_main_buffer(
    tess: &impl PathTessellator,
    points: &[TrackPoint],
    appearance: &Appearance,
    reference: ReferencePoint,
    altitude_offset: f64,
    out: &mut VertexBuffer,
) -> VertexLayout {
    let colored = appearance.uses_gradient() && points.iter().any(|p| p.color_value.is_some());
    let layout = if colored {
        VertexLayout::position_color()
    } else {
        VertexLayout::position()
    };

    let per_position = if appearance.extruded { 2 } else { 1 };
    out.clear();
    out.ensure_capacity(points.len() * layout.stride * per_position);

    if points.is_empty() {
        return layout;
    }

    let exaggeration = tess.vertical_exaggeration();
    let range = color_value_range(points);

    for point in points {
        let render_alt = exaggeration * point.position.alt_m + altitude_offset;
        let absolute = tess.surface_point(point.position, appearance.altitude_mode, render_alt);
        out.push(&reference.relative(absolute));

        let color = colored.then(|| vertex_color(&appearance.gradient, range, point.color_value));
        if let Some(color) = color {
            out.push(&color);
        }

        if appearance.extruded {
            let ground = tess.ground_point(point.position);
            out.push(&reference.relative(ground));
            if let Some(color) = color {
                out.push(&color);
            }
        }
    }

    layout
}

fn color_value_range(points: &[TrackPoint]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for value in points.iter().filter_map(|p| p.color_value) {
        lo = lo.min(value);
        hi = hi.max(value);
    }
    (lo, hi)
}

fn vertex_color(ramp: &GradientRamp, (lo, hi): (f64, f64), value: Option<f64>) -> [f32; 4] {
    // Positions without a value take the low endpoint.
    let t = match value {
        Some(v) if hi > lo => ((v - lo) / (hi - lo)) as f32,
        Some(_) => 0.5,
        None => 0.0,
    };
    Rgba::from_rgb(ramp.low, 1.0)
        .lerp(Rgba::from_rgb(ramp.high, 1.0), t)
        .to_array()
}

#[cfg(test)]
mod tests {
    use super::{fill_main_buffer, path_altitude_offset};
    use crate::buffers::VertexBuffer;
    use crate::fixtures::{FlatTessellator, track_of, track_with_values};
    use crate::host::PathTessellator;
    use foundation::math::{ReferencePoint, Vec3};
    use rand::rngs::mock::StepRng;
    use track::{AltitudeMode, Appearance, OffsetMode, StateStyle};

    fn rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn absolute_offset(appearance: &mut Appearance, meters: i32) {
        appearance.altitude_mode = AltitudeMode::Absolute;
        appearance.altitude_offset_enabled = true;
        appearance.altitude_offset_mode = OffsetMode::Absolute;
        appearance.absolute_offset_m = meters;
    }

    #[test]
    fn zero_positions_yield_an_empty_buffer() {
        let tess = FlatTessellator::default();
        let appearance = Appearance::default();
        let mut out = VertexBuffer::new();
        let layout = fill_main_buffer(
            &tess,
            &[],
            &appearance,
            ReferencePoint::new(Vec3::ZERO),
            0.0,
            &mut out,
        );
        assert!(out.is_empty());
        assert_eq!(layout.stride, 3);
    }

    #[test]
    fn buffer_length_is_point_count_times_stride() {
        let tess = FlatTessellator::default();
        let appearance = Appearance::default();
        let points = track_of(5);
        let mut out = VertexBuffer::new();
        let layout = fill_main_buffer(
            &tess,
            &points,
            &appearance,
            ReferencePoint::new(Vec3::ZERO),
            0.0,
            &mut out,
        );
        assert_eq!(layout.stride, 3);
        assert_eq!(out.len(), 5 * 3);
    }

    #[test]
    fn gradient_coloring_interleaves_four_color_floats() {
        let tess = FlatTessellator::default();
        let mut appearance = Appearance::default();
        appearance.interior.normal = StateStyle::gradient();
        let points = track_with_values(5);
        let mut out = VertexBuffer::new();
        let layout = fill_main_buffer(
            &tess,
            &points,
            &appearance,
            ReferencePoint::new(Vec3::ZERO),
            0.0,
            &mut out,
        );
        assert_eq!(layout.stride, 7);
        assert_eq!(layout.color_offset, Some(3));
        assert_eq!(out.len(), 5 * 7);

        // First point carries the low ramp endpoint, last the high one.
        let v = out.as_slice();
        let g = appearance.gradient;
        assert_eq!(v[3..7], [g.low[0], g.low[1], g.low[2], 1.0]);
        assert_eq!(v[4 * 7 + 3..4 * 7 + 7], [g.high[0], g.high[1], g.high[2], 1.0]);
    }

    #[test]
    fn gradient_mode_without_values_falls_back_to_plain_positions() {
        let tess = FlatTessellator::default();
        let mut appearance = Appearance::default();
        appearance.outline.normal = StateStyle::gradient();
        let points = track_of(4);
        let mut out = VertexBuffer::new();
        let layout = fill_main_buffer(
            &tess,
            &points,
            &appearance,
            ReferencePoint::new(Vec3::ZERO),
            0.0,
            &mut out,
        );
        assert_eq!(layout.stride, 3);
        assert_eq!(out.len(), 4 * 3);
    }

    #[test]
    fn extrusion_doubles_the_vertex_count_with_interleaved_ground_points() {
        let tess = FlatTessellator::default();
        let mut appearance = Appearance::default();
        appearance.altitude_mode = AltitudeMode::Absolute;
        appearance.extruded = true;
        let points = track_of(3);
        let mut out = VertexBuffer::new();
        let layout = fill_main_buffer(
            &tess,
            &points,
            &appearance,
            ReferencePoint::new(Vec3::ZERO),
            0.0,
            &mut out,
        );
        assert_eq!(out.len(), 2 * 3 * layout.stride);

        // Odd vertices are on the ground.
        let v = out.as_slice();
        assert_eq!(v[5], 0.0);
        assert_ne!(v[2], 0.0);
    }

    #[test]
    fn vertices_are_relative_to_the_reference_point() {
        let tess = FlatTessellator::default();
        let mut appearance = Appearance::default();
        appearance.altitude_mode = AltitudeMode::Absolute;
        let points = track_of(4);
        let reference = ReferencePoint::new(Vec3::new(47_000.0, 11_000.0, 300.0));
        let mut out = VertexBuffer::new();
        fill_main_buffer(&tess, &points, &appearance, reference, 0.0, &mut out);

        for (i, point) in points.iter().enumerate() {
            let absolute = tess.surface_point(
                point.position,
                AltitudeMode::Absolute,
                point.position.alt_m,
            );
            let v = out.as_slice();
            let stored = [v[i * 3], v[i * 3 + 1], v[i * 3 + 2]];
            assert!(reference.absolute(stored).distance_to(absolute) < 0.01);
        }
    }

    #[test]
    fn refill_reuses_backing_capacity() {
        let tess = FlatTessellator::default();
        let appearance = Appearance::default();
        let reference = ReferencePoint::new(Vec3::ZERO);
        let mut out = VertexBuffer::new();

        fill_main_buffer(&tess, &track_of(100), &appearance, reference, 0.0, &mut out);
        let cap = out.capacity();

        fill_main_buffer(&tess, &track_of(10), &appearance, reference, 0.0, &mut out);
        assert_eq!(out.len(), 10 * 3);
        assert_eq!(out.capacity(), cap);
    }

    #[test]
    fn offset_is_zero_unless_absolute_mode_with_offset_enabled() {
        let mut appearance = Appearance::default();
        assert_eq!(path_altitude_offset(&appearance, 0.0, 1.0, &mut rng()), 0.0);

        absolute_offset(&mut appearance, 200);
        appearance.altitude_mode = AltitudeMode::RelativeToGround;
        assert_eq!(path_altitude_offset(&appearance, 0.0, 1.0, &mut rng()), 0.0);

        appearance.altitude_mode = AltitudeMode::Absolute;
        appearance.altitude_offset_enabled = false;
        assert_eq!(path_altitude_offset(&appearance, 0.0, 1.0, &mut rng()), 0.0);
    }

    #[test]
    fn absolute_offset_scales_with_vertical_exaggeration() {
        let mut appearance = Appearance::default();
        absolute_offset(&mut appearance, 100);
        assert_eq!(
            path_altitude_offset(&appearance, 0.0, 1.5, &mut rng()),
            150.0
        );
    }

    #[test]
    fn relative_offset_uses_eye_elevation_percentage() {
        let mut appearance = Appearance::default();
        absolute_offset(&mut appearance, 0);
        appearance.altitude_offset_mode = OffsetMode::Relative;
        appearance.relative_offset_percent = 20;
        // 5000 / 100 * 20 = 1000
        assert_eq!(
            path_altitude_offset(&appearance, 5_000.0, 1.0, &mut rng()),
            1_000.0
        );
    }

    #[test]
    fn randomized_offset_stays_within_the_jitter_window() {
        let mut appearance = Appearance::default();
        absolute_offset(&mut appearance, 100);
        appearance.offset_randomized = true;

        let mut rng = StepRng::new(0, 0x1234_5678_9abc_def0);
        for _ in 0..32 {
            let offset = path_altitude_offset(&appearance, 0.0, 1.0, &mut rng);
            assert!((10.0..110.0).contains(&offset), "offset {offset}");
        }
    }
}
