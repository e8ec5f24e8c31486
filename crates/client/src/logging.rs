//! Tracing setup for the client binary.
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs to stderr and to `<log_dir>/<session>/client.log`.
///
/// `RUST_LOG` refines the filter; the default level is `info`. Keep the
/// returned guard alive for as long as file output is wanted.
pub fn setup_logging(session: &str, log_dir: Option<&Path>) -> Result<WorkerGuard> {
    let session_log_dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_directory)
        .join(session);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    tracing::info!("Logging initialized: session={}", session);
    tracing::info!("Log file: {}/client.log", session_log_dir.display());

    Ok(guard)
}

/// Platform log directory, falling back to `./logs`.
fn default_log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "merge-kingdom")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
