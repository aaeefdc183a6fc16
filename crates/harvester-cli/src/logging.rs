//! Logging setup (AMBIENT STACK): a single append-only log file via
//! `tracing_appender`, plus an `EnvFilter` honoring `RUST_LOG`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes a non-blocking, append-only file subscriber rooted at
/// `data_path/harvester.log`. The returned guard must be kept alive for
/// the duration of `main` or buffered lines are lost on exit.
pub fn init(data_path: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(data_path)?;
    let file_appender = tracing_appender::rolling::never(data_path, "harvester.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder().with_default_directive(tracing::Level::INFO.into()).from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(env_filter).with_ansi(false).with_writer(writer).init();

    Ok(guard)
}
