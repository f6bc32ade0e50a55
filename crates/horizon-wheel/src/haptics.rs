//! Haptic ticks while a wheel scrolls.

use std::sync::Arc;

/// A platform haptic actuator.
///
/// `tick` is fire-and-forget; it must not block and has no result.
pub trait HapticSink: Send + Sync {
    /// Play one short tick.
    fn tick(&self);
}

impl<F> HapticSink for F
where
    F: Fn() + Send + Sync,
{
    fn tick(&self) {
        self()
    }
}

/// Gate between a wheel and its haptic sink.
///
/// Ticks once each time the centred index changes, and never twice in a row
/// for the same index.
#[derive(Clone)]
pub struct HapticFeedback {
    sink: Option<Arc<dyn HapticSink>>,
    enabled: bool,
    last_index: Option<usize>,
}

impl HapticFeedback {
    /// Create an enabled gate with no sink.
    pub fn new() -> Self {
        Self {
            sink: None,
            enabled: true,
            last_index: None,
        }
    }

    /// Set the sink ticks are sent to.
    pub fn set_sink(&mut self, sink: Option<Arc<dyn HapticSink>>) {
        self.sink = sink;
    }

    /// Whether a sink is installed.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether ticks are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable ticks.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Report the index currently under the centre line.
    ///
    /// Returns `true` if a tick was sent.
    pub fn center_changed(&mut self, index: usize) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(sink) = &self.sink else {
            return false;
        };
        if self.last_index == Some(index) {
            return false;
        }
        self.last_index = Some(index);
        sink.tick();
        true
    }

    /// Forget the last ticked index (the lane's items were replaced).
    pub fn reset(&mut self) {
        self.last_index = None;
    }

    /// Record `index` as already under the centre line without ticking.
    ///
    /// Called when a drag begins so the item the user grabbed stays silent.
    pub fn anchor(&mut self, index: Option<usize>) {
        self.last_index = index;
    }
}

impl Default for HapticFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HapticFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticFeedback")
            .field("has_sink", &self.has_sink())
            .field("enabled", &self.enabled)
            .field("last_index", &self.last_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (HapticFeedback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let mut haptics = HapticFeedback::new();
        haptics.set_sink(Some(Arc::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })));
        (haptics, count)
    }

    #[test]
    fn test_ticks_on_distinct_index() {
        let (mut haptics, count) = counting();
        assert!(haptics.center_changed(0));
        assert!(!haptics.center_changed(0));
        assert!(haptics.center_changed(1));
        assert!(haptics.center_changed(0));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_disabled_gate() {
        let (mut haptics, count) = counting();
        haptics.set_enabled(false);
        assert!(!haptics.center_changed(3));
        haptics.set_enabled(true);
        assert!(haptics.center_changed(3));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_sink() {
        let mut haptics = HapticFeedback::new();
        assert!(!haptics.center_changed(1));
        assert!(HapticFeedback::default().is_enabled());
    }

    #[test]
    fn test_anchor_suppresses_first_tick() {
        let (mut haptics, count) = counting();
        haptics.anchor(Some(4));
        assert!(!haptics.center_changed(4));
        assert!(haptics.center_changed(5));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_allows_repeat() {
        let (mut haptics, count) = counting();
        haptics.center_changed(2);
        haptics.reset();
        haptics.center_changed(2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
