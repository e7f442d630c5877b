//! Shared test doubles: a flat-world tessellator and a recording GPU.

use std::collections::BTreeMap;

use foundation::math::{Geodetic, Vec3};
use track::{AltitudeMode, TrackId, TrackPath, TrackPoint};

use crate::host::{BufferHandle, GpuError, GpuResources, PathTessellator, TessellationError};

/// Flat test world: one thousandth of a degree of longitude/latitude maps to
/// 1 m along x/y, altitude maps straight to z, ground is z = 0. The up
/// direction is +z everywhere and pixel size is a fixed constant, so arrow
/// lengths are exactly `arrow_size * pixel_size`.
pub(crate) struct FlatTessellator {
    pub eye_distance: f64,
    pub eye_elevation: f64,
    pub pixel_size: f64,
    pub exaggeration: f64,
    pub reference: Vec3,
    pub fail: bool,
}

impl Default for FlatTessellator {
    fn default() -> Self {
        Self {
            eye_distance: 10_000.0,
            eye_elevation: 5_000.0,
            pixel_size: 1.0,
            exaggeration: 1.0,
            reference: Vec3::ZERO,
            fail: false,
        }
    }
}

impl PathTessellator for FlatTessellator {
    fn tessellate(&self, path: &TrackPath) -> Result<Vec<TrackPoint>, TessellationError> {
        if self.fail {
            return Err(TessellationError::new("host tessellation unavailable"));
        }
        Ok(path.points().to_vec())
    }

    fn reference_point(&self, _path: &TrackPath) -> Vec3 {
        self.reference
    }

    fn eye_distance(&self) -> f64 {
        self.eye_distance
    }

    fn eye_distance_to(&self, _point: Vec3) -> f64 {
        self.eye_distance
    }

    fn eye_elevation(&self) -> f64 {
        self.eye_elevation
    }

    fn pixel_size_at(&self, _distance: f64) -> f64 {
        self.pixel_size
    }

    fn vertical_exaggeration(&self) -> f64 {
        self.exaggeration
    }

    fn surface_point(&self, position: Geodetic, mode: AltitudeMode, altitude_m: f64) -> Vec3 {
        let z = match mode {
            AltitudeMode::ClampToGround => 0.0,
            AltitudeMode::Absolute | AltitudeMode::RelativeToGround => altitude_m,
        };
        Vec3::new(
            position.lon_rad.to_degrees() * 1000.0,
            position.lat_rad.to_degrees() * 1000.0,
            z,
        )
    }

    fn ground_point(&self, position: Geodetic) -> Vec3 {
        Vec3::new(
            position.lon_rad.to_degrees() * 1000.0,
            position.lat_rad.to_degrees() * 1000.0,
            0.0,
        )
    }

    fn surface_normal(&self, _point: Vec3) -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }
}

/// GPU double that hands out sequential handles and records all calls.
#[derive(Debug, Default)]
pub(crate) struct RecordingGpu {
    next: u64,
    pub allocations: Vec<(TrackId, usize, usize)>,
    pub uploads: BTreeMap<u64, Vec<f32>>,
    pub upload_count: usize,
    pub discarded: Vec<TrackId>,
    pub fail_allocations: bool,
    pub fail_uploads: bool,
}

impl GpuResources for RecordingGpu {
    fn allocate(
        &mut self,
        key: TrackId,
        count: usize,
        bytes_hint: usize,
    ) -> Result<Vec<BufferHandle>, GpuError> {
        if self.fail_allocations {
            return Err(GpuError::AllocationFailed {
                key,
                bytes: bytes_hint,
            });
        }
        self.allocations.push((key, count, bytes_hint));
        let start = self.next;
        self.next += count as u64;
        Ok((start..self.next).map(BufferHandle).collect())
    }

    fn upload(&mut self, handle: BufferHandle, data: &[f32]) -> Result<(), GpuError> {
        if self.fail_uploads {
            return Err(GpuError::UploadFailed { handle });
        }
        self.upload_count += 1;
        self.uploads.insert(handle.0, data.to_vec());
        Ok(())
    }

    fn discard(&mut self, key: TrackId) {
        self.discarded.push(key);
    }
}

/// A straight northward track: point `i` sits `i` meters up the y axis at
/// 500 m altitude.
pub(crate) fn track_of(count: usize) -> Vec<TrackPoint> {
    (0..count)
        .map(|i| TrackPoint::new(Geodetic::from_degrees(0.001 * i as f64, 0.0, 500.0)))
        .collect()
}

/// Same track with a linearly increasing color value per point.
pub(crate) fn track_with_values(count: usize) -> Vec<TrackPoint> {
    (0..count)
        .map(|i| {
            TrackPoint::with_value(
                Geodetic::from_degrees(0.001 * i as f64, 0.0, 500.0),
                i as f64,
            )
        })
        .collect()
}

pub(crate) fn track_path(id: u64, count: usize) -> TrackPath {
    TrackPath::new(TrackId(id), track_of(count))
}
