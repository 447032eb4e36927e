#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn gpx_document(points: &[(f64, f64)]) -> String {
    let mut gpx = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trackmap tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>test</name>
    <trkseg>
"#,
    );
    for (lng, lat) in points {
        gpx.push_str(&format!("      <trkpt lat=\"{lat}\" lon=\"{lng}\"></trkpt>\n"));
    }
    gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    gpx
}

/// Writes a single segment GPX track, points are `(lng, lat)`.
pub fn write_gpx(file_path: &Path, points: &[(f64, f64)]) {
    fs::write(file_path, gpx_document(points)).unwrap();
}

pub const FIT_FILE_TYPE_ACTIVITY: u8 = 4;
pub const FIT_FILE_TYPE_COURSE: u8 = 6;

const FIT_CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

fn fit_crc(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        let tmp = FIT_CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ FIT_CRC_TABLE[(byte & 0xF) as usize];
        let tmp = FIT_CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ FIT_CRC_TABLE[((byte >> 4) & 0xF) as usize];
    }
    crc
}

pub fn degrees_to_semicircles(degrees: f64) -> i32 {
    (degrees * (2f64.powi(31) / 180.0)).round() as i32
}

/// A minimal FIT file: a `file_id` message followed by one `record` message
/// per position. `None` positions are written as invalid values.
pub fn encode_fit(file_type: u8, positions: &[Option<(f64, f64)>]) -> Vec<u8> {
    let mut messages = Vec::new();
    // definition, local 0 = file_id (global 0) with `type` (field 0, enum)
    messages.extend_from_slice(&[0x40, 0, 0]);
    messages.extend_from_slice(&0u16.to_le_bytes());
    messages.extend_from_slice(&[1, 0, 1, 0x00]);
    messages.extend_from_slice(&[0x00, file_type]);

    // definition, local 1 = record (global 20) with `position_lat` (field 0)
    // and `position_long` (field 1), both sint32
    messages.extend_from_slice(&[0x41, 0, 0]);
    messages.extend_from_slice(&20u16.to_le_bytes());
    messages.extend_from_slice(&[2, 0, 4, 0x85, 1, 4, 0x85]);
    for position in positions {
        let (lat, lng) = match position {
            Some((lng, lat)) => (degrees_to_semicircles(*lat), degrees_to_semicircles(*lng)),
            None => (i32::MAX, i32::MAX),
        };
        messages.push(0x01);
        messages.extend_from_slice(&lat.to_le_bytes());
        messages.extend_from_slice(&lng.to_le_bytes());
    }

    let mut data = vec![14, 0x10];
    data.extend_from_slice(&2132u16.to_le_bytes());
    data.extend_from_slice(&(messages.len() as u32).to_le_bytes());
    data.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&data);
    data.extend_from_slice(&header_crc.to_le_bytes());
    data.extend(messages);
    let crc = fit_crc(&data);
    data.extend_from_slice(&crc.to_le_bytes());
    data
}

pub fn write_gz(file_path: &Path, data: &[u8]) {
    let mut encoder = GzEncoder::new(File::create(file_path).unwrap(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap();
}

/// Writes a gzip-compressed FIT activity, positions are `(lng, lat)`.
pub fn write_fit_gz(file_path: &Path, positions: &[Option<(f64, f64)>]) {
    write_gz(file_path, &encode_fit(FIT_FILE_TYPE_ACTIVITY, positions));
}

pub fn write_manifest(dir: &Path, rows: &[(&str, &str)]) {
    let mut content = String::from("Activity ID,Activity Name,Activity Type,Filename\n");
    for (i, (filename, category)) in rows.iter().enumerate() {
        content.push_str(&format!("{i},Activity {i},{category},{filename}\n"));
    }
    fs::write(dir.join("activities.csv"), content).unwrap();
}
