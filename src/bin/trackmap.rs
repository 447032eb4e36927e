use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use log::{debug, info};
use trackmap_core::classifier::{ActivityClassifier, ColorRules};
use trackmap_core::config::{
    RenderConfig, TrackSource, DEFAULT_HEIGHT, DEFAULT_SCALE, DEFAULT_WIDTH,
};
use trackmap_core::geocoder::{CoordinateGeocoder, Geocoder};
use trackmap_core::{logs, pipeline};

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw GPS tracks onto a single image", long_about = None)]
struct Cli {
    /// Width of output image
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Height of output image
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Coordinates to center the map around, as "lat,lng" (place names are
    /// not looked up)
    #[arg(short, long)]
    center: String,

    /// Directory where the activity files are
    #[arg(short = 'i', long = "in-dir", value_hint = ValueHint::DirPath)]
    activities: PathBuf,

    /// Output filename
    #[arg(short, long = "out-file", value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Size of the visible area, 2.0 shows twice as much in each direction
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,

    /// JSON object mapping activity types to "#rrggbb[aa]" colors
    #[arg(long, value_hint = ValueHint::FilePath)]
    colors: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SourceOpt::Auto)]
    mode: SourceOpt,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SourceOpt {
    /// Use activities.csv when present
    Auto,
    Manifest,
    Glob,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logs::init(cli.verbose)?;

    info!("Looking up {:?}...", cli.center);
    let center = CoordinateGeocoder.geocode(&cli.center)?;
    info!("found at {} {}", center.latitude, center.longitude);

    let rules = match &cli.colors {
        Some(path) => ColorRules::from_json_file(path)?,
        None => ColorRules::default(),
    };
    debug!("colors for {:?}", rules.labels().collect::<Vec<_>>());
    let mut classifier = ActivityClassifier::new(rules);

    let config = RenderConfig {
        width: cli.width,
        height: cli.height,
        center,
        scale: cli.scale,
        ..RenderConfig::new(center)
    };
    let source = match cli.mode {
        SourceOpt::Auto => TrackSource::Auto(cli.activities),
        SourceOpt::Manifest => TrackSource::Manifest(cli.activities),
        SourceOpt::Glob => TrackSource::Glob(cli.activities),
    };

    let (canvas, _report) = pipeline::render_heatmap(&config, &source, &mut classifier)?;

    info!("Exporting image as {}...", cli.out.display());
    canvas.save_png(&cli.out)?;
    info!("done.");
    Ok(())
}
