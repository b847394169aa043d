//! Tracing Setup
//!
//! Console logging via `tracing-subscriber` with `RUST_LOG` filtering.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: service crate at `info`)

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Honors `RUST_LOG`; the service's own crate defaults to `info` and the
/// HTTP internals are kept at `warn`.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(
            "nse_snapshot_proxy=info"
                .parse()
                .expect("static directive 'nse_snapshot_proxy=info' is valid"),
        )
        .add_directive(
            "hyper=warn"
                .parse()
                .expect("static directive 'hyper=warn' is valid"),
        )
        .add_directive(
            "h2=warn"
                .parse()
                .expect("static directive 'h2=warn' is valid"),
        );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
