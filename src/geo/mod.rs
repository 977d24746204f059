// Coordinate projection module
//
// Maps geographic positions onto a 3D sphere using the display convention
// of the globe: longitude offset by 180 degrees and the X axis mirrored so
// the result matches a left-handed view with the camera on +Z.

use crate::error::{EngineError, Result};
use std::f64::consts::PI;

/// Radius of the globe surface itself
pub const GLOBE_RADIUS: f64 = 2.0;

/// Radius at which cloud region rings are placed (just above the surface)
pub const REGION_RADIUS: f64 = 2.05;

/// Radius at which exchange markers and latency edges are placed
pub const DISPLAY_RADIUS: f64 = 2.1;

/// A point in 3D Cartesian space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance from the origin
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Rotate around the vertical (Y) axis by `angle` radians
    ///
    /// Used by the globe view to spin the sphere; the Y component is
    /// unchanged, so latitude bands stay horizontal.
    pub fn rotate_y(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }
}

/// A validated geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    latitude: f64,
    longitude: f64,
}

impl GeoPosition {
    /// Create a position, rejecting non-finite or out-of-range coordinates
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180]. Inputs
    /// are never clamped or wrapped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(EngineError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(EngineError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Project this position onto a sphere of the given radius
    pub fn project(&self, radius: f64) -> Point3D {
        project_to_sphere(self.latitude, self.longitude, radius)
    }
}

/// Project latitude/longitude (degrees) onto a sphere of `radius`
///
/// ```text
/// phi   = (90 - lat) * pi / 180
/// theta = (lng + 180) * pi / 180
/// x = -(r * sin(phi) * cos(theta))
/// y =   r * cos(phi)
/// z =   r * sin(phi) * sin(theta)
/// ```
///
/// Pure and infallible. Out-of-range inputs still land on the sphere
/// (trigonometric periodicity); use [`GeoPosition::new`] to validate.
pub fn project_to_sphere(lat: f64, lng: f64, radius: f64) -> Point3D {
    let phi = (90.0 - lat) * (PI / 180.0);
    let theta = (lng + 180.0) * (PI / 180.0);

    Point3D {
        x: -(radius * phi.sin() * theta.cos()),
        y: radius * phi.cos(),
        z: radius * phi.sin() * theta.sin(),
    }
}
