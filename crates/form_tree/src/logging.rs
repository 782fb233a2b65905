//! Console logging for hosts and tests that want to see tree mutations.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the embedding application. This helper wires up the same console
//! layer the rest of the workspace uses.

use tracing_subscriber::{
    Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a console subscriber showing events at `level` and above.
///
/// Events go to stdout. This crate's own unit tests route them through the
/// test writer so the harness captures them.
///
/// Returns `false` when a global subscriber was already installed, which
/// makes repeated calls from several tests harmless.
pub fn init_console(level: LevelFilter) -> bool {
    let console_layer = fmt::Layer::default().with_target(false);
    #[cfg(test)]
    let console_layer = console_layer.with_test_writer();
    let console_layer = console_layer.with_filter(level);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
}

/// Level used when the caller has no preference: verbose in debug builds.
pub fn default_level() -> LevelFilter {
    #[cfg(debug_assertions)]
    let level = LevelFilter::DEBUG;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    level
}
