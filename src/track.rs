use std::path::PathBuf;

// a polyline needs at least two vertices.
pub const MIN_RENDERABLE_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

#[derive(Debug, PartialEq)]
pub struct Track {
    pub source: PathBuf,
    // `None` when the track was discovered without a manifest.
    pub label: Option<String>,
    pub points: Vec<GeoPoint>,
}

impl Track {
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= MIN_RENDERABLE_POINTS
    }
}

/// Drops every point with a NaN (or infinite) coordinate, keeping the relative
/// order of the rest.
pub fn validate_points(points: Vec<GeoPoint>) -> Vec<GeoPoint> {
    points.into_iter().filter(GeoPoint::is_valid).collect()
}
