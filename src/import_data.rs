use crate::track::GeoPoint;
use anyhow::{Context, Result};
use fitparser::profile::MesgNum;
use fitparser::Value as FitValue;
use flate2::read::GzDecoder;
use gpx::read;
use std::{fs::File, io::BufReader, io::Read, path::Path};
use strum_macros::{AsRefStr, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
pub enum TrackFormat {
    #[strum(serialize = "gpx")]
    Gpx,
    #[strum(serialize = "fit.gz")]
    FitGz,
}

impl TrackFormat {
    pub fn suffix(&self) -> &'static str {
        match self {
            TrackFormat::Gpx => ".gpx",
            TrackFormat::FitGz => ".fit.gz",
        }
    }

    pub fn from_path(file_path: &Path) -> Option<Self> {
        let filename = file_path.file_name()?.to_str()?.to_ascii_lowercase();
        if filename.ends_with(TrackFormat::Gpx.suffix()) {
            Some(TrackFormat::Gpx)
        } else if filename.ends_with(TrackFormat::FitGz.suffix()) {
            Some(TrackFormat::FitGz)
        } else {
            None
        }
    }
}

/// Reads the raw (unvalidated) points of a track file, picking the parser by
/// extension. Files of an unknown type yield no points.
pub fn load_track_points(file_path: &Path) -> Result<Vec<GeoPoint>> {
    match TrackFormat::from_path(file_path) {
        Some(TrackFormat::Gpx) => load_gpx(file_path),
        Some(TrackFormat::FitGz) => load_fit_gz(file_path),
        None => {
            debug!("unsupported track file: {}", file_path.display());
            Ok(Vec::new())
        }
    }
}

pub fn load_gpx(file_path: &Path) -> Result<Vec<GeoPoint>> {
    let file = File::open(file_path)
        .with_context(|| format!("failed to open {}", file_path.display()))?;
    let gpx_data = read(BufReader::new(file))
        .with_context(|| format!("failed to parse gpx {}", file_path.display()))?;
    // segments are flattened in file order
    let points = gpx_data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(|point| GeoPoint::new(point.point().x(), point.point().y()))
        .collect();
    Ok(points)
}

pub fn load_fit_gz(file_path: &Path) -> Result<Vec<GeoPoint>> {
    let file = File::open(file_path)
        .with_context(|| format!("failed to open {}", file_path.display()))?;
    let mut data = Vec::new();
    GzDecoder::new(BufReader::new(file))
        .read_to_end(&mut data)
        .with_context(|| format!("failed to decompress {}", file_path.display()))?;
    parse_fit_activity(&data)
        .with_context(|| format!("failed to parse fit {}", file_path.display()))
}

/// Extracts the record positions of a (decompressed) FIT activity file.
///
/// A record without a usable position becomes a NaN point, the validator is
/// responsible for dropping those.
pub fn parse_fit_activity(data: &[u8]) -> Result<Vec<GeoPoint>> {
    let messages = fitparser::de::from_bytes(data).map_err(|e| anyhow!("{e}"))?;

    let is_activity = messages
        .iter()
        .filter(|message| message.kind() == MesgNum::FileId)
        .flat_map(|message| message.fields().iter())
        .any(|field| field.name() == "type" && is_activity_file_type(field.value()));
    if !is_activity {
        bail!("no activity found");
    }

    let points = messages
        .iter()
        .filter(|message| message.kind() == MesgNum::Record)
        .map(|record| {
            let mut point = GeoPoint::new(f64::NAN, f64::NAN);
            for field in record.fields() {
                match field.name() {
                    "position_long" => {
                        if let Some(v) = fit_value_to_f64(field.value()) {
                            point.longitude = semicircles_to_degrees(v);
                        }
                    }
                    "position_lat" => {
                        if let Some(v) = fit_value_to_f64(field.value()) {
                            point.latitude = semicircles_to_degrees(v);
                        }
                    }
                    _ => {}
                }
            }
            point
        })
        .collect();
    Ok(points)
}

// `file_id.type` is an enum, 4 is `activity` in the FIT profile.
fn is_activity_file_type(value: &FitValue) -> bool {
    match value {
        FitValue::String(name) => name == "activity",
        FitValue::Enum(v) => *v == 4,
        _ => false,
    }
}

pub fn semicircles_to_degrees(semicircles: f64) -> f64 {
    semicircles * (180.0 / 2f64.powi(31))
}

fn fit_value_to_f64(value: &FitValue) -> Option<f64> {
    match value {
        FitValue::SInt32(v) => Some(*v as f64),
        FitValue::UInt32(v) => Some(*v as f64),
        FitValue::SInt64(v) => Some(*v as f64),
        FitValue::Float32(v) => Some(*v as f64),
        FitValue::Float64(v) => Some(*v),
        _ => None,
    }
}
