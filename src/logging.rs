use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Routes `tracing` output to `path`. The terminal belongs to the UI, so
/// without a log file nothing is installed and events are dropped.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .map_err(|err| io::Error::other(format!("build log filter: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| io::Error::other(format!("initialize tracing subscriber: {err}")))?;

    Ok(())
}
