use crate::activity_index::{load_track, ActivityIndex};
use crate::canvas::Canvas;
use crate::classifier::ActivityClassifier;
use crate::config::{RenderConfig, TrackSource};
use crate::projection::Projection;
use crate::track::Track;
use anyhow::Result;
use std::collections::BTreeMap;

/// What happened to the tracks of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub listed: usize,
    pub rendered: usize,
    // unreadable or corrupt files
    pub failed: usize,
    pub too_few_points: usize,
    pub malformed_rows: usize,
    // manifest rows of activities recorded without a GPS file
    pub rows_without_file: usize,
    pub unmatched: BTreeMap<String, usize>,
}

impl RenderReport {
    pub fn unmatched_total(&self) -> usize {
        self.unmatched.values().sum()
    }

    pub fn log_summary(&self) {
        info!(
            "Rendered {} of {} tracks ({} unmatched)",
            self.rendered,
            self.listed,
            self.unmatched_total()
        );
        for (label, count) in &self.unmatched {
            info!("  no color for {label:?}: {count} tracks");
        }
        if self.failed > 0 || self.malformed_rows > 0 {
            warn!(
                "Skipped {} unreadable files and {} malformed manifest rows",
                self.failed, self.malformed_rows
            );
        }
        if self.rows_without_file > 0 {
            info!(
                "Skipped {} manifest rows without a track file",
                self.rows_without_file
            );
        }
        if self.too_few_points > 0 {
            info!(
                "Skipped {} tracks with fewer than two valid points",
                self.too_few_points
            );
        }
    }
}

pub fn list_tracks(source: &TrackSource) -> Result<ActivityIndex> {
    match source {
        TrackSource::Manifest(dir) => ActivityIndex::read_manifest(dir),
        TrackSource::Glob(dir) => ActivityIndex::discover(dir),
        TrackSource::Auto(dir) => {
            if ActivityIndex::has_manifest(dir) {
                ActivityIndex::read_manifest(dir)
            } else {
                debug!("no manifest in {}, listing files", dir.display());
                ActivityIndex::discover(dir)
            }
        }
    }
}

/// Draws `track` if its category has a color. Returns whether it was drawn.
pub fn render_track(
    canvas: &mut Canvas,
    projection: &Projection,
    track: &Track,
    classifier: &mut ActivityClassifier,
) -> bool {
    if !track.is_renderable() {
        return false;
    }
    match classifier.classify(track.label.as_deref()) {
        Some(color) => {
            canvas.draw_polyline(&track.points, projection, color);
            true
        }
        None => false,
    }
}

/// Runs the whole pipeline: list the tracks of `source`, load them one by
/// one and draw the ones with a known category.
///
/// Only configuration problems (and an unreadable input directory or
/// manifest) are errors, a bad track file is skipped and counted in the
/// report.
pub fn render_heatmap(
    config: &RenderConfig,
    source: &TrackSource,
    classifier: &mut ActivityClassifier,
) -> Result<(Canvas, RenderReport)> {
    let (canvas_spec, bounds) = config.validate()?;
    let projection = Projection::new(&bounds, canvas_spec)?;
    let mut canvas = Canvas::new(canvas_spec, config.background);

    let index = list_tracks(source)?;
    let unmatched_before = classifier.unmatched().clone();
    let mut report = RenderReport {
        listed: index.entries.len(),
        malformed_rows: index.malformed_rows,
        rows_without_file: index.rows_without_file,
        ..Default::default()
    };

    info!(
        "Generating {}x{} image...",
        canvas_spec.width_px, canvas_spec.height_px
    );
    for (i, entry) in index.entries.iter().enumerate() {
        if i % 10 == 0 {
            debug!("[pipeline] {}/{} tracks", i, report.listed);
        }
        let track = match load_track(entry) {
            Ok(Some(track)) => track,
            Ok(None) => {
                report.too_few_points += 1;
                continue;
            }
            Err(e) => {
                warn!("skipping {}: {:#}", entry.path.display(), e);
                report.failed += 1;
                continue;
            }
        };
        if render_track(&mut canvas, &projection, &track, classifier) {
            report.rendered += 1;
        }
    }

    // only what this run added, the classifier may have been used before
    for (label, count) in classifier.unmatched() {
        let previous = unmatched_before.get(label).copied().unwrap_or(0);
        if *count > previous {
            report.unmatched.insert(label.clone(), count - previous);
        }
    }
    report.log_summary();
    Ok((canvas, report))
}
