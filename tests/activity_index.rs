pub mod test_utils;

use std::fs;
use tempdir::TempDir;
use test_utils::{write_fit_gz, write_gpx, write_manifest};
use trackmap_core::activity_index::{load_track, ActivityIndex, TrackEntry};

#[test]
fn discover_lists_supported_files() {
    test_utils::init_logger();
    let temp_dir = TempDir::new("activity_index-discover").unwrap();
    let dir = temp_dir.path();
    write_gpx(&dir.join("b.gpx"), &[(0.0, 0.0), (1.0, 1.0)]);
    write_gpx(&dir.join("a.gpx"), &[(0.0, 0.0), (1.0, 1.0)]);
    write_fit_gz(&dir.join("c.fit.gz"), &[Some((0.0, 0.0)), Some((1.0, 1.0))]);
    fs::write(dir.join("notes.txt"), "hello").unwrap();
    fs::create_dir(dir.join("nested.gpx")).unwrap();

    let index = ActivityIndex::discover(dir).unwrap();
    let names: Vec<_> = index
        .entries
        .iter()
        .map(|entry| entry.path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["a.gpx", "b.gpx", "c.fit.gz"]);
    assert!(index.entries.iter().all(|entry| entry.label.is_none()));
    assert!(index.columns.is_none());
}

#[test]
fn discover_missing_dir() {
    let temp_dir = TempDir::new("activity_index-discover_missing_dir").unwrap();
    assert!(ActivityIndex::discover(&temp_dir.path().join("nope")).is_err());
}

#[test]
fn read_manifest() {
    test_utils::init_logger();
    let temp_dir = TempDir::new("activity_index-read_manifest").unwrap();
    let dir = temp_dir.path();
    assert!(!ActivityIndex::has_manifest(dir));
    assert!(ActivityIndex::read_manifest(dir).is_err());

    write_manifest(
        dir,
        &[
            ("activities/1.gpx", "Ride"),
            ("", "Walk"),
            ("activities/2.fit.gz", "Run"),
        ],
    );
    assert!(ActivityIndex::has_manifest(dir));
    let index = ActivityIndex::read_manifest(dir).unwrap();
    assert_eq!(
        index.entries,
        vec![
            TrackEntry {
                path: dir.join("activities/1.gpx"),
                label: Some("Ride".to_owned()),
            },
            TrackEntry {
                path: dir.join("activities/2.fit.gz"),
                label: Some("Run".to_owned()),
            },
        ]
    );
    assert_eq!(index.rows_without_file, 1);
    assert_eq!(index.malformed_rows, 0);
}

#[test]
fn load_discovered_tracks() {
    test_utils::init_logger();
    let temp_dir = TempDir::new("activity_index-load_discovered_tracks").unwrap();
    let dir = temp_dir.path();
    write_gpx(&dir.join("good.gpx"), &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    write_gpx(&dir.join("short.gpx"), &[(0.0, 0.0)]);
    fs::copy("./tests/data/broken.gpx", dir.join("broken.gpx")).unwrap();
    write_fit_gz(&dir.join("sparse.fit.gz"), &[Some((0.0, 0.0)), None, None]);

    let index = ActivityIndex::discover(dir).unwrap();
    assert_eq!(index.entries.len(), 4);
    let results: Vec<_> = index.entries.iter().map(load_track).collect();
    // broken.gpx, good.gpx, short.gpx, sparse.fit.gz
    assert!(results[0].is_err());
    let good = results[1].as_ref().unwrap().as_ref().unwrap();
    assert_eq!(good.source, dir.join("good.gpx"));
    assert_eq!(good.points.len(), 3);
    assert!(good.label.is_none());
    assert!(results[2].as_ref().unwrap().is_none());
    assert!(results[3].as_ref().unwrap().is_none());
}

#[test]
fn load_track_results() {
    let temp_dir = TempDir::new("activity_index-load_track_results").unwrap();
    let dir = temp_dir.path();
    write_gpx(&dir.join("short.gpx"), &[(0.0, 0.0)]);

    let entry = |name: &str| TrackEntry {
        path: dir.join(name),
        label: Some("Hike".to_owned()),
    };
    assert!(load_track(&entry("missing.gpx")).is_err());
    assert!(load_track(&entry("short.gpx")).unwrap().is_none());

    write_gpx(&dir.join("ok.gpx"), &[(0.0, 0.0), (1.0, 1.0)]);
    let track = load_track(&entry("ok.gpx")).unwrap().unwrap();
    assert_eq!(track.label.as_deref(), Some("Hike"));
    assert!(track.is_renderable());
}
