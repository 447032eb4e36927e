use crate::track::GeoPoint;
use anyhow::Result;

// Window size at scale 1: ±0.06° latitude, and ±0.1° longitude per unit of
// canvas aspect ratio (so ±0.2° on the default 2:1 canvas).
pub const BASE_LATITUDE_RADIUS: f64 = 0.06;
pub const BASE_LONGITUDE_RADIUS_PER_ASPECT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width_px: u32,
    pub height_px: u32,
}

impl CanvasSpec {
    pub fn new(width_px: u32, height_px: u32) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            bail!("canvas dimensions must be positive, got {width_px}x{height_px}");
        }
        Ok(Self {
            width_px,
            height_px,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_px as f64 / self.height_px as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl GeoBounds {
    pub fn new(
        min_longitude: f64,
        max_longitude: f64,
        min_latitude: f64,
        max_latitude: f64,
    ) -> Result<Self> {
        check_range("longitude", min_longitude, max_longitude)?;
        check_range("latitude", min_latitude, max_latitude)?;
        Ok(Self {
            min_longitude,
            max_longitude,
            min_latitude,
            max_latitude,
        })
    }

    /// The window visible around `center` for the given scale multiplier and
    /// canvas shape.
    pub fn around(center: GeoPoint, scale: f64, canvas: CanvasSpec) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            bail!("scale must be a positive number, got {scale}");
        }
        let lat_radius = BASE_LATITUDE_RADIUS * scale;
        let lng_radius = BASE_LONGITUDE_RADIUS_PER_ASPECT * scale * canvas.aspect_ratio();
        Self::new(
            center.longitude - lng_radius,
            center.longitude + lng_radius,
            center.latitude - lat_radius,
            center.latitude + lat_radius,
        )
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_longitude + self.max_longitude) / 2.0,
            (self.min_latitude + self.max_latitude) / 2.0,
        )
    }
}

fn check_range(axis: &str, min: f64, max: f64) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) {
        bail!("{axis} range must be finite, got [{min}, {max}]");
    }
    if max <= min {
        bail!("degenerate {axis} range [{min}, {max}]");
    }
    Ok(())
}

/// Linear mapping of one geographic axis onto `[0, size]` pixels.
///
/// The scale factor is computed once at construction so projecting a value is
/// a subtraction and a multiplication. Values outside `[min, max]` are not
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisProjector {
    min: f64,
    scale: f64,
    size: f64,
    inverted: bool,
}

impl AxisProjector {
    pub fn new(min: f64, max: f64, size_px: u32, inverted: bool) -> Result<Self> {
        check_range("axis", min, max)?;
        if size_px == 0 {
            bail!("axis size must be positive");
        }
        let size = size_px as f64;
        Ok(Self {
            min,
            scale: size / (max - min),
            size,
            inverted,
        })
    }

    pub fn project(&self, value: f64) -> f64 {
        let offset = (value - self.min) * self.scale;
        if self.inverted {
            self.size - offset
        } else {
            offset
        }
    }
}

/// Both axes of the canvas. Latitude is inverted since raster rows grow
/// downwards while north is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: AxisProjector,
    pub y: AxisProjector,
}

impl Projection {
    pub fn new(bounds: &GeoBounds, canvas: CanvasSpec) -> Result<Self> {
        Ok(Self {
            x: AxisProjector::new(
                bounds.min_longitude,
                bounds.max_longitude,
                canvas.width_px,
                false,
            )?,
            y: AxisProjector::new(
                bounds.min_latitude,
                bounds.max_latitude,
                canvas.height_px,
                true,
            )?,
        })
    }

    pub fn project(&self, point: &GeoPoint) -> (f64, f64) {
        (self.x.project(point.longitude), self.y.project(point.latitude))
    }
}
