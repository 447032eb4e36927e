use anyhow::Result;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

// verbosity only changes what is logged, never what is drawn
pub fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Logs to stderr. Must be called at most once per process.
pub fn init(verbose: bool) -> Result<()> {
    let level = level_filter(verbose);
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let logger = TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto);
    log::set_boxed_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
