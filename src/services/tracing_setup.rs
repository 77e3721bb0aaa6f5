//! Tracing subscriber setup
//!
//! This module provides the tracing configuration used by the binary. Tests
//! install their own stdout subscriber.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber with file logging.
///
/// `RUST_LOG` directives are honoured on top of a DEBUG default.
pub fn init_global(log_file_path: &Path) -> io::Result<()> {
    let log_file = File::create(log_file_path)?;
    build_subscriber(log_file).try_init().map_err(io::Error::other)
}

/// Build a subscriber writing formatted events to `log_file`.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(tracing::Level::DEBUG.into())
        // ureq and rustls are chatty at debug level
        .add_directive("ureq=info".parse().unwrap())
        .add_directive("rustls=info".parse().unwrap());

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
