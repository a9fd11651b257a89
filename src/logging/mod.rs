//! Tracing integration.
//!
//! Provides [`TextLayer`], which renders `tracing` events through a
//! [`TextHandler`](crate::handler::TextHandler), and [`setup_tracing`] to install it as the
//! global subscriber writing to stdout.
//!
//! # Usage
//!
//! ```rust,ignore
//! fn main() -> anyhow::Result<()> {
//!     rawlog::logging::init()?;
//!
//!     let span = tracing::info_span!("request", id = 7);
//!     let _guard = span.enter();
//!     tracing::info!(status = 200, "served");
//!     // 2024-03-01T12:30:05.042+01:00 INFO served (request=(id=7, status=200))
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RUST_LOG` | Per-target filter (e.g., `info`, `myapp=debug`) | `LOG_LEVEL` |
//! | `LOG_LEVEL` | Minimum level emitted by the handler | `info` |
//! | `LOG_SOURCE` | Include `<file>:<line>` of the call site | `false` |

use crate::handler::{HandlerOptions, TextHandler};
use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

mod layer;

pub use layer::TextLayer;

/// Initializes tracing with options read from the environment.
///
/// See [`HandlerOptions::from_env`].
pub fn init() -> anyhow::Result<()> {
    setup_tracing(HandlerOptions::from_env())
}

/// Installs a [`TextLayer`] writing to stdout as the global subscriber.
///
/// `RUST_LOG` narrows output per target. Without it, the filter falls back to the
/// handler's level.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn setup_tracing(options: HandlerOptions) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level.to_string()));

    let layer = TextLayer::new(TextHandler::new(std::io::stdout(), options)).with_filter(filter);

    Registry::default()
        .with(layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    tracing::info!("Tracing initialized successfully [reporting to console only]");

    Ok(())
}
