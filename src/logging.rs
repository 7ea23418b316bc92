//! Logging setup for the terminal front end.
//!
//! The terminal is in raw mode while the game runs, so logs only go to a file.

use std::env;
use std::fs::File;
use std::panic;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use backtrace::Backtrace;
use tracing::{error, info, trace};
use tracing_subscriber::{
    fmt::{self, time::uptime},
    prelude::*,
    EnvFilter, Registry,
};

/// Our crate is debug, everything else is warn.
const DEFAULT_FILTER: &str = "warn,pacman_sim=debug,pacman=debug";

/// Install a `tracing` subscriber writing to `path`. `RUST_LOG` directives are
/// appended to the default filter.
pub fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("unable to create log file {}", path.display()))?;
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let file_log = fmt::layer()
        .event_format(format)
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(file_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to install log subscriber")?;
    info!("starting pacman");

    // panics happen with the terminal in raw mode, keep them in the log
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed panic hook");
    Ok(())
}
