//! Logging initialisation.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use recall_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .or_raise(|| ErrorKind::Logging(format!("invalid level directive {:?}", config.level)))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    // A boxed error cannot become a child in the tree; keep its message.
    installed.map_err(|err| exn::Exn::from(ErrorKind::Logging(err.to_string())))
}
