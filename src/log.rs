// src/log.rs
//
// Tracing setup: human-readable events on stderr plus a plain-text copy in
// `.store/debug.log`. `RUST_LOG` overrides the default `info` filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::consts::LOG_FILE;
use crate::error::{Error, Result};
use crate::file::ensure_directory;

/// Install the global subscriber. Keep the guard alive until exit or the
/// file layer drops buffered lines.
pub fn init(store_dir: &Path) -> Result<WorkerGuard> {
    ensure_directory(store_dir)?;
    let file_appender = tracing_appender::rolling::never(store_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize tracing: {e}")))?;

    Ok(guard)
}
