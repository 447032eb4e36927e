use crate::import_data::{load_track_points, TrackFormat};
use crate::track::{validate_points, Track, MIN_RENDERABLE_POINTS};
use anyhow::{Context, Result};
use csv::StringRecord;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub const MANIFEST_FILENAME: &str = "activities.csv";
pub const FILENAME_HEADER: &str = "Filename";
pub const CATEGORY_HEADER: &str = "Activity Type";

/// A track file to load, with its category when it came from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub path: PathBuf,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestColumns {
    pub filename: usize,
    pub category: usize,
    // at least one of the expected headers was not found and column 0 is
    // used in its place
    pub missing_headers: bool,
}

impl ManifestColumns {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|header| header == name);
        let filename = find(FILENAME_HEADER);
        let category = find(CATEGORY_HEADER);
        Self {
            filename: filename.unwrap_or(0),
            category: category.unwrap_or(0),
            missing_headers: filename.is_none() || category.is_none(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ActivityIndex {
    pub entries: Vec<TrackEntry>,
    pub columns: Option<ManifestColumns>,
    pub malformed_rows: usize,
    pub rows_without_file: usize,
}

impl ActivityIndex {
    pub fn manifest_path(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILENAME)
    }

    pub fn has_manifest(dir: &Path) -> bool {
        Self::manifest_path(dir).is_file()
    }

    /// Lists the tracks of `dir/activities.csv`. Paths in the manifest are
    /// relative to `dir`.
    pub fn read_manifest(dir: &Path) -> Result<Self> {
        let manifest_path = Self::manifest_path(dir);
        let file = fs::File::open(&manifest_path)
            .with_context(|| format!("failed to open {}", manifest_path.display()))?;
        let index = Self::read_manifest_from(dir, file)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        info!(
            "Found {} activities in {}",
            index.entries.len(),
            manifest_path.display()
        );
        Ok(index)
    }

    pub fn read_manifest_from<R: Read>(dir: &Path, manifest: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(manifest);

        let columns = ManifestColumns::from_headers(reader.headers()?);
        if columns.missing_headers {
            warn!(
                "manifest is missing the {FILENAME_HEADER:?} or {CATEGORY_HEADER:?} header, \
                falling back to column 0"
            );
        }

        let mut index = ActivityIndex {
            columns: Some(columns),
            ..Default::default()
        };
        for (i, row) in reader.records().enumerate() {
            // +2: one for the header, one because lines start at 1
            let line = i + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("[activity_index] skipping manifest line {line}: {e}");
                    index.malformed_rows += 1;
                    continue;
                }
            };
            let (Some(filename), Some(category)) =
                (row.get(columns.filename), row.get(columns.category))
            else {
                warn!("[activity_index] skipping manifest line {line}: too few columns");
                index.malformed_rows += 1;
                continue;
            };
            let filename = filename.trim();
            if filename.is_empty() {
                // activities recorded without a GPS file
                debug!("[activity_index] no file on manifest line {line}");
                index.rows_without_file += 1;
                continue;
            }
            index.entries.push(TrackEntry {
                path: dir.join(filename),
                label: Some(category.to_owned()),
            });
        }
        Ok(index)
    }

    /// Lists every supported track file directly inside `dir`. GPX files come
    /// first, then FIT files, each group sorted by name.
    pub fn discover(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?
        {
            let path = entry
                .with_context(|| format!("failed to list {}", dir.display()))?
                .path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut index = ActivityIndex::default();
        for format in TrackFormat::iter() {
            let before = index.entries.len();
            index.entries.extend(
                files
                    .iter()
                    .filter(|path| TrackFormat::from_path(path) == Some(format))
                    .map(|path| TrackEntry {
                        path: path.clone(),
                        label: None,
                    }),
            );
            info!(
                "Found {} {} files",
                index.entries.len() - before,
                format.suffix()
            );
        }
        Ok(index)
    }
}

/// Parses and validates one entry. `Ok(None)` means the file was read but has
/// fewer than two valid points.
pub fn load_track(entry: &TrackEntry) -> Result<Option<Track>> {
    let raw_points = load_track_points(&entry.path)?;
    let raw_count = raw_points.len();
    let points = validate_points(raw_points);
    if points.len() < MIN_RENDERABLE_POINTS {
        debug!(
            "[activity_index] {} has {} valid points out of {}, skipped",
            entry.path.display(),
            points.len(),
            raw_count
        );
        return Ok(None);
    }
    Ok(Some(Track {
        source: entry.path.clone(),
        label: entry.label.clone(),
        points,
    }))
}
