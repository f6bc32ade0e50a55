//! Logging facilities for Horizon Wheel.
//!
//! Horizon Wheel uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Filter by subsystem with the constants in [`targets`], e.g.
//! `RUST_LOG=horizon_wheel::picker=debug`.

/// Span names used throughout Horizon Wheel for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "horizon_wheel::signal";
    /// Settle processing span.
    pub const SETTLE: &str = "horizon_wheel::settle";
    /// Cross-lane cascade span.
    pub const CASCADE: &str = "horizon_wheel::cascade";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_wheel_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_wheel_core::signal";
    /// Snap computation target.
    pub const SNAP: &str = "horizon_wheel::snap";
    /// Single wheel state machine target.
    pub const WHEEL: &str = "horizon_wheel::wheel";
    /// Dependent picker target.
    pub const PICKER: &str = "horizon_wheel::picker";
    /// Host surface target.
    pub const SURFACE: &str = "horizon_wheel::surface";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_wheel::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing a cascade or a settle end to end.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_wheel::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level event on the core target.
#[macro_export]
macro_rules! wheel_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_wheel_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::CASCADE);
            crate::wheel_trace!(lane = 1, "inside span");
        });
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::SNAP, targets::WHEEL, targets::PICKER, targets::SURFACE] {
            assert!(target.starts_with("horizon_wheel::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }
}
