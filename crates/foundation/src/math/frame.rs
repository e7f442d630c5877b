//! Reference-point relative storage.
//!
//! Positions on a globe have Earth-scale magnitudes (~6.4e6 m) that do not
//! survive a cast to `f32`. Vertex data is therefore stored relative to a
//! high-precision reference point chosen once per pass; all buffers produced
//! for the same pass of the same path must share one reference point.

use super::Vec3;

/// A fixed origin subtracted from absolute points before `f32` storage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReferencePoint {
    pub origin: Vec3,
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl ReferencePoint {
    pub fn new(origin: Vec3) -> Self {
        Self { origin }
    }

    /// Offset of a world-space point from the origin, as `f32` components.
    #[inline]
    pub fn relative(self, world: Vec3) -> [f32; 3] {
        let d = world - self.origin;
        [d.x as f32, d.y as f32, d.z as f32]
    }

    /// Inverse of [`relative`](Self::relative), up to `f32` rounding.
    pub fn absolute(self, stored: [f32; 3]) -> Vec3 {
        self.origin + Vec3::new(stored[0] as f64, stored[1] as f64, stored[2] as f64)
    }
}
