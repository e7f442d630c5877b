use foundation::math::Geodetic;

/// Stable identity of a track for the lifetime of the track.
///
/// Render caches key their per-track state by this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u64);

/// One recorded position, optionally carrying a scalar value (pace, pulse,
/// gradient, ...) used for per-vertex gradient coloring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackPoint {
    pub position: Geodetic,
    pub color_value: Option<f64>,
}

impl TrackPoint {
    pub fn new(position: Geodetic) -> Self {
        Self {
            position,
            color_value: None,
        }
    }

    pub fn with_value(position: Geodetic, value: f64) -> Self {
        Self {
            position,
            color_value: Some(value),
        }
    }
}

/// An ordered GPS track. Read-only to the render subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPath {
    id: TrackId,
    points: Vec<TrackPoint>,
}

impl TrackPath {
    pub fn new(id: TrackId, points: Vec<TrackPoint>) -> Self {
        Self { id, points }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if any point carries a scalar color value.
    pub fn has_color_values(&self) -> bool {
        self.points.iter().any(|p| p.color_value.is_some())
    }

    /// Min and max of the present color values, if any.
    pub fn color_value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for value in self.points.iter().filter_map(|p| p.color_value) {
            range = Some(match range {
                None => (value, value),
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
            });
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::{TrackId, TrackPath, TrackPoint};
    use foundation::math::Geodetic;

    fn p(lat: f64, lon: f64) -> Geodetic {
        Geodetic::from_degrees(lat, lon, 500.0)
    }

    #[test]
    fn empty_path() {
        let path = TrackPath::new(TrackId(1), Vec::new());
        assert!(path.is_empty());
        assert!(!path.has_color_values());
        assert_eq!(path.color_value_range(), None);
    }

    #[test]
    fn color_value_range_skips_missing_values() {
        let path = TrackPath::new(
            TrackId(2),
            vec![
                TrackPoint::with_value(p(47.0, 11.0), 3.5),
                TrackPoint::new(p(47.1, 11.0)),
                TrackPoint::with_value(p(47.2, 11.0), -1.0),
            ],
        );
        assert!(path.has_color_values());
        assert_eq!(path.color_value_range(), Some((-1.0, 3.5)));
    }
}
