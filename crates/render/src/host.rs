//! Host renderer capabilities.
//!
//! The geometry, color, and cache logic is host-independent: everything it
//! needs from the surrounding 3D-globe renderer comes through these two
//! traits, so the subsystem is unit-testable without a real renderer.

use foundation::math::{Geodetic, Vec3};
use track::{AltitudeMode, TrackId, TrackPath, TrackPoint};

/// Opaque handle to a GPU-resident vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Host tessellation failed for one path.
///
/// Treated as transient: the draw entry point logs it and keeps rendering
/// the previous (possibly empty) data until the next successful recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TessellationError {
    pub reason: String,
}

impl TessellationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TessellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path tessellation failed: {}", self.reason)
    }
}

impl std::error::Error for TessellationError {}

/// Unrecoverable failure of the host graphics resource cache.
///
/// Propagated, never masked: it indicates a renderer condition (driver loss,
/// GPU memory exhaustion) outside this subsystem's control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    AllocationFailed { key: TrackId, bytes: usize },
    UploadFailed { handle: BufferHandle },
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::AllocationFailed { key, bytes } => {
                write!(f, "buffer allocation failed: key={key:?} bytes={bytes}")
            }
            GpuError::UploadFailed { handle } => {
                write!(f, "buffer upload failed: handle={handle:?}")
            }
        }
    }
}

impl std::error::Error for GpuError {}

/// Path tessellation and view geometry provided by the host renderer.
pub trait PathTessellator {
    /// The possibly-resampled positions actually rendered.
    ///
    /// Resampled points carry interpolated color values so gradient
    /// coloring survives tessellation.
    fn tessellate(&self, path: &TrackPath) -> Result<Vec<TrackPoint>, TessellationError>;

    /// Reference point for the current pass of `path`.
    ///
    /// Every buffer produced in one pass stores vertices relative to this
    /// point; mixing reference points across buffers is an invariant
    /// violation.
    fn reference_point(&self, path: &TrackPath) -> Vec3;

    /// Camera distance to the rendered area.
    fn eye_distance(&self) -> f64;

    /// Camera distance to a specific world point.
    fn eye_distance_to(&self, point: Vec3) -> f64;

    /// Camera elevation above the ellipsoid, for relative altitude offsets.
    fn eye_elevation(&self) -> f64;

    /// World-space size of one pixel at the given camera distance.
    fn pixel_size_at(&self, distance: f64) -> f64;

    /// Current vertical exaggeration factor.
    fn vertical_exaggeration(&self) -> f64;

    /// Altitude-mode aware projection to an absolute world point.
    ///
    /// `altitude_m` is the already-exaggerated, already-offset render
    /// altitude; `ClampToGround` ignores it.
    fn surface_point(&self, position: Geodetic, mode: AltitudeMode, altitude_m: f64) -> Vec3;

    /// Point on the terrain directly beneath `position` (extrusion base).
    fn ground_point(&self, position: Geodetic) -> Vec3;

    /// Outward surface normal at an absolute world point.
    fn surface_normal(&self, point: Vec3) -> Vec3;
}

/// The external graphics resource cache owning GPU memory.
///
/// This subsystem fills buffers and hands them over; the resource cache is
/// the sole authority for GPU residency and eviction.
pub trait GpuResources {
    /// Allocate `count` buffer handles for a track, registering them under
    /// its key with a total byte size hint for eviction accounting.
    fn allocate(
        &mut self,
        key: TrackId,
        count: usize,
        bytes_hint: usize,
    ) -> Result<Vec<BufferHandle>, GpuError>;

    /// Upload a buffer's current contents to the GPU resource.
    fn upload(&mut self, handle: BufferHandle, data: &[f32]) -> Result<(), GpuError>;

    /// Drop all handles registered under a track's key.
    fn discard(&mut self, key: TrackId);
}
