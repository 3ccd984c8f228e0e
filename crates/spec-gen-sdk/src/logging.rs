use std::fs::{self, File};
use std::sync::Mutex;

use sdkgen_config::LogPaths;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{CliError, Result};

/// Installs the run's subscriber: human-readable output on stderr and the
/// same events, without colours, in the full log file.
///
/// `RUST_LOG` overrides the default `info` level. Logging stops and the file
/// is closed when the returned guard is dropped.
pub fn init(paths: &LogPaths) -> Result<DefaultGuard> {
    fs::create_dir_all(&paths.folder).map_err(|source| CliError::LogFolder {
        path: paths.folder.clone(),
        source,
    })?;
    let file = File::create(&paths.full).map_err(|source| CliError::LogFile {
        path: paths.full.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        );
    Ok(tracing::subscriber::set_default(subscriber))
}
