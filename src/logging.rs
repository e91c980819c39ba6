//! Log setup. The terminal belongs to the UI, so events go to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILE: &str = "quiz-funnel.log";

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
pub fn init<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
