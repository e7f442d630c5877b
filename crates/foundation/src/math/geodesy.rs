use super::Vec3;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Geodetic coordinates in radians and meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }

    /// Track sources report latitude and longitude in degrees.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians(), alt_m)
    }

    /// Same horizontal position at a different altitude.
    pub fn with_altitude(self, alt_m: f64) -> Self {
        Self::new(self.lat_rad, self.lon_rad, alt_m)
    }
}

/// Geodetic position to an Earth-centered, Earth-fixed point (meters).
pub fn geodetic_to_ecef(geo: Geodetic) -> Vec3 {
    let sin_lat = geo.lat_rad.sin();
    let cos_lat = geo.lat_rad.cos();
    let sin_lon = geo.lon_rad.sin();
    let cos_lon = geo.lon_rad.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Vec3::new(
        (n + geo.alt_m) * cos_lat * cos_lon,
        (n + geo.alt_m) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + geo.alt_m) * sin_lat,
    )
}

/// Outward ellipsoid normal at an ECEF point.
///
/// Gradient of `x^2/A^2 + y^2/A^2 + z^2/B^2`, normalized.
pub fn ellipsoid_normal(p: Vec3) -> Vec3 {
    let a2 = WGS84_A * WGS84_A;
    let b2 = WGS84_B * WGS84_B;
    Vec3::new(p.x / a2, p.y / a2, p.z / b2).normalized()
}
