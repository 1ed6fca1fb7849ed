//! Some utilities

use std::path::{Path, PathBuf};

use ftlog::{
    LevelFilter, LoggerGuard,
    appender::{FileAppender, Period},
};

/// Configures the logger.
///
/// # Errors
///
/// - If a logs directory could not be located/created.
/// - If the logger could not be initialized.
pub fn configure_logger(file_name: &str) -> Result<(LoggerGuard, PathBuf), String> {
    let root_dir = PathBuf::from(".").canonicalize().map_err(|e| e.to_string())?;
    let logs_dir = root_dir.join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(file_name);

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let err_path = err_log_path(&log_path)?;

    let guard = ftlog::Builder::new()
        // global max log level
        .max_log_level(LevelFilter::Info)
        // define root appender, pass None would write to stderr
        .root(writer)
        // write `Warn` and `Error` logs in ftlog::appender to `err_path` instead of `log_path`.
        // Everything else, including warnings from the simulation, stays in `log_path`.
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Warn)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}

/// The file beside `log_path` that receives the logger's own warnings.
///
/// # Errors
///
/// - If `log_path` has no usable file name.
fn err_log_path(log_path: &Path) -> Result<PathBuf, String> {
    let err_stem = log_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| format!("Invalid log file name {}", log_path.display()))?;
    Ok(log_path.with_file_name(format!("{err_stem}-err")))
}

/// Opens a CSV writer at `out_path`, creating its parent directory if needed.
///
/// # Errors
///
/// - If the parent directory could not be created.
/// - If the file could not be created.
pub fn trace_writer<P: AsRef<Path>>(out_path: P) -> Result<csv::Writer<std::fs::File>, String> {
    let out_path = out_path.as_ref();
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| format!("Failed to create parent directory: {e}"))?;
    }
    csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(out_path)
        .map_err(|e| format!("Failed to create {}: {e}", out_path.display()))
}
