//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber: compact lines without the
//! module prefix, filtered by `RUST_LOG` when set and by the configured default
//! level otherwise.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: start and shutdown per table.
//! - **Row operations**: Create, Update, Delete and `ApplyTraffic`, keyed by `Ad_ID`.
//! - **Client calls**: one span per client method (`#[instrument]`), so the
//!   `realTime` fan-out shows as nested `apply_traffic` spans.
//! - **HTTP**: one span per request from `tower_http::trace::TraceLayer`.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Request spans and row mutations
//! RUST_LOG=info adintel serve
//!
//! # Full ingest payloads and model inputs
//! RUST_LOG=debug adintel serve
//!
//! # Only the HTTP layer
//! RUST_LOG=tower_http=debug adintel serve
//! ```
//!
//! With `RUST_LOG=debug`, `POST /predict` logs the unscaled feature vector and
//! the raw head outputs once:
//!
//! ```text
//! DEBUG predict: Model evaluated raw_features=[2.0, 1200.0, ...] out=RawOutputs { ... }
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `default_level` applies when `RUST_LOG` is unset.
///
/// Calling it twice is harmless; the second call leaves the first subscriber in place.
pub fn setup_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
