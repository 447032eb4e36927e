use crate::canvas::DEFAULT_BG_COLOR;
use crate::projection::{CanvasSpec, GeoBounds};
use crate::track::GeoPoint;
use anyhow::Result;
use image::Rgba;
use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 500;
pub const DEFAULT_SCALE: f64 = 1.0;

/// Fully resolved rendering settings (the center is already geocoded).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub center: GeoPoint,
    pub scale: f64,
    pub background: Rgba<u8>,
}

impl RenderConfig {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            center,
            scale: DEFAULT_SCALE,
            background: DEFAULT_BG_COLOR,
        }
    }

    /// Checks the settings and derives the canvas and visible window from
    /// them.
    pub fn validate(&self) -> Result<(CanvasSpec, GeoBounds)> {
        if !self.center.is_valid() {
            bail!("center must be a finite coordinate, got {:?}", self.center);
        }
        let canvas = CanvasSpec::new(self.width, self.height)?;
        let bounds = GeoBounds::around(self.center, self.scale, canvas)?;
        Ok((canvas, bounds))
    }
}

/// Where the tracks come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// `activities.csv` inside the directory lists the files and their
    /// categories.
    Manifest(PathBuf),
    /// Every supported file directly inside the directory, uncategorized.
    Glob(PathBuf),
    /// The manifest if the directory has one, the glob otherwise.
    Auto(PathBuf),
}
