//! Structured logging.
//!
//! Events go to stdout and, when configured, to a plain-text log file
//! that records source file and line for each event.

use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Handle on the log file, kept by the server context until shutdown.
#[derive(Debug, Clone, Default)]
pub struct LogHandle {
    file: Option<Arc<File>>,
}

impl LogHandle {
    /// A handle with no backing file.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Flush buffered log lines to disk.
    pub fn flush(&self) {
        if let Some(file) = &self.file {
            if let Err(e) = file.sync_all() {
                eprintln!("failed to flush log file: {e}");
            }
        }
    }
}

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("harvest_api={0},tower_http={0}", config.log_level)
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> io::Result<LogHandle> {
    let file = if config.log_file.is_empty() {
        None
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        Some(Arc::new(file))
    };

    let file_layer = file.clone().map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(config))),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(LogHandle { file })
}
