//! A single wheel lane.
//!
//! [`Wheel`] owns one lane of items and its selection, and runs the scroll
//! state machine:
//!
//! ```text
//!            user touches                release / fling
//!   Idle ─────────────────▶ Dragging ─────────────────▶ Settling
//!    ▲                                                     │
//!    └──────── host idle, offset centred on an item ◀──────┘
//! ```
//!
//! The wheel never scrolls by itself. It commands its host surface through a
//! [`SurfaceHandle`] and learns what happened from [`SurfaceEvent`]s the host
//! forwards. Settled selections are announced both through the public signals
//! and as returned [`WheelEvent`]s, so an owner such as a dependent picker can
//! react without re-entering the wheel from inside a callback.
//!
//! # Example
//!
//! ```
//! use horizon_wheel::{Wheel, WheelEvent, WheelItem};
//!
//! let mut wheel = Wheel::new().with_items(WheelItem::indexed(["a", "b", "c"]));
//! assert_eq!(wheel.selected_index(), Some(0));
//!
//! // No surface attached: the selection settles immediately.
//! let events = wheel.set_selected_index(7, true, None);
//! assert_eq!(wheel.selected_index(), Some(2));
//! assert!(events.contains(&WheelEvent::SelectionChanged(2)));
//! ```

use std::sync::Arc;

use horizon_wheel_core::logging::{span_names, targets};
use horizon_wheel_core::Signal;

use crate::config::WheelConfig;
use crate::haptics::{HapticFeedback, HapticSink};
use crate::item::WheelItem;
use crate::snap::{SnapEngine, SnapTarget, WheelGeometry};
use crate::surface::{ScrollState, SurfaceEvent, SurfaceHandle};

/// Callback run once when a requested selection has settled.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Something a wheel reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelEvent {
    /// The scroll state changed.
    ScrollStateChanged(ScrollState),
    /// A settle ended on a different index than before.
    SelectionChanged(usize),
    /// A settle finished on this index, whether or not it changed.
    Settled(usize),
}

/// A settle the wheel is waiting for.
struct PendingSettle {
    target: SnapTarget,
    completion: Option<Completion>,
}

/// One scrollable lane of items with snap-to-item selection.
///
/// # Signals
///
/// - `selection_changed(usize)`: Emitted once per distinct settled index
/// - `scroll_state_changed(ScrollState)`: Emitted on every state transition
pub struct Wheel {
    /// Items shown in the lane.
    items: Vec<WheelItem>,

    /// Whether the lane wraps around.
    circular: bool,

    /// Lane geometry.
    geometry: WheelGeometry,

    /// Last settled index; `None` only while the lane is empty.
    selected: Option<usize>,

    /// Current scroll state.
    state: ScrollState,

    /// Last known scroll offset of the surface.
    offset: f32,

    /// The settle being waited for, if any.
    pending: Option<PendingSettle>,

    /// The host scroll view.
    surface: SurfaceHandle,

    /// Haptic tick gate.
    haptics: HapticFeedback,

    /// Fling deceleration in pixels per second squared.
    fling_deceleration: f32,

    /// Slowest velocity treated as a fling.
    min_fling_velocity: f32,

    /// Signal emitted when the settled index changes.
    pub selection_changed: Signal<usize>,

    /// Signal emitted when the scroll state changes.
    pub scroll_state_changed: Signal<ScrollState>,
}

impl Wheel {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty, bounded wheel with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&WheelConfig::default())
    }

    /// Create an empty wheel from a configuration.
    pub fn from_config(config: &WheelConfig) -> Self {
        let mut haptics = HapticFeedback::new();
        haptics.set_enabled(config.haptic_feedback);
        Self {
            items: Vec::new(),
            circular: config.circular,
            geometry: config.geometry(),
            selected: None,
            state: ScrollState::Idle,
            offset: 0.0,
            pending: None,
            surface: SurfaceHandle::detached(),
            haptics,
            fling_deceleration: config.fling_deceleration,
            min_fling_velocity: config.min_fling_velocity,
            selection_changed: Signal::new(),
            scroll_state_changed: Signal::new(),
        }
    }

    /// Set the items using builder pattern.
    pub fn with_items(mut self, items: Vec<WheelItem>) -> Self {
        self.set_items(items);
        self
    }

    /// Set whether the lane wraps using builder pattern.
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.set_circular(circular);
        self
    }

    /// Set the geometry using builder pattern.
    pub fn with_geometry(mut self, geometry: WheelGeometry) -> Self {
        self.set_geometry(geometry);
        self
    }

    /// Attach a surface using builder pattern.
    pub fn with_surface(mut self, surface: SurfaceHandle) -> Self {
        self.attach_surface(surface);
        self
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// The items in the lane.
    pub fn items(&self) -> &[WheelItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the lane has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    pub fn item(&self, index: usize) -> Option<&WheelItem> {
        self.items.get(index)
    }

    /// Replace the items.
    ///
    /// The selection is kept if it is still valid and otherwise reset to 0
    /// (`None` for an empty lane). No animation runs and no selection event
    /// is emitted. A settle in flight is abandoned; its completion is dropped.
    pub fn set_items(&mut self, items: Vec<WheelItem>) {
        self.items = items;
        if let Some(pending) = self.pending.take() {
            tracing::debug!(
                target: targets::WHEEL,
                index = pending.target.index,
                "items replaced during settle, dropping pending target"
            );
        }

        self.selected = match self.selected {
            Some(index) if index < self.items.len() => Some(index),
            _ if self.items.is_empty() => None,
            _ => Some(0),
        };
        self.haptics.reset();

        let count = self.items.len();
        let circular = self.circular;
        self.surface.with(|s| s.content_changed(count, circular));
        tracing::trace!(target: targets::WHEEL, count, selected = ?self.selected, "items replaced");
    }

    /// Whether the lane wraps around.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Set whether the lane wraps around.
    pub fn set_circular(&mut self, circular: bool) {
        if self.circular == circular {
            return;
        }
        self.circular = circular;
        let count = self.items.len();
        self.surface.with(|s| s.content_changed(count, circular));
        self.refresh_current_position();
    }

    /// The lane geometry.
    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    /// Change the geometry, keeping the same item centred.
    pub fn set_geometry(&mut self, geometry: WheelGeometry) {
        let position = self.geometry.position_at(self.offset);
        self.geometry = geometry;
        self.offset = geometry.offset_of(position);
        self.refresh_current_position();
    }

    /// A snap engine for the lane's current state.
    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine::new(self.geometry, self.items.len(), self.circular)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The last settled index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The settled item.
    pub fn selected_item(&self) -> Option<&WheelItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// The index the lane is heading to, or the settled index if nothing is in flight.
    pub fn target_index(&self) -> Option<usize> {
        match &self.pending {
            Some(pending) => Some(pending.target.index),
            None => self.selected,
        }
    }

    /// Whether a settle is in flight.
    pub fn has_pending_settle(&self) -> bool {
        self.pending.is_some()
    }

    /// Current scroll state.
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Whether the lane is at rest.
    pub fn is_idle(&self) -> bool {
        self.state == ScrollState::Idle
    }

    /// Last known scroll offset.
    pub fn scroll_offset(&self) -> f32 {
        self.offset
    }

    /// Select `index`, animating if requested.
    ///
    /// Out-of-range indices are clamped on bounded lanes and wrapped on
    /// circular ones. `on_complete` runs exactly once when the selection has
    /// settled: immediately when already settled there, when not animated, or
    /// when no surface is attached; otherwise when the surface reports idle.
    /// A later request or a user drag supersedes this one and its completion
    /// is dropped without running.
    pub fn set_selected_index(
        &mut self,
        index: i64,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Vec<WheelEvent> {
        let Some(target) = self.snap_engine().target_for_index(index, self.offset) else {
            if let Some(complete) = on_complete {
                complete();
            }
            return Vec::new();
        };

        if self.pending.is_none()
            && self.is_idle()
            && self.selected == Some(target.index)
            && (self.offset - target.offset).abs() < 0.5
        {
            if let Some(complete) = on_complete {
                complete();
            }
            return Vec::new();
        }

        self.supersede_pending("new selection requested");
        self.pending = Some(PendingSettle {
            target,
            completion: on_complete,
        });

        let mut events = Vec::new();
        self.transition(ScrollState::Settling, &mut events);

        if animated && self.surface.is_attached() {
            tracing::debug!(target: targets::WHEEL, index = target.index, offset = target.offset, "animating to index");
            self.surface.with(|s| s.scroll_to(target.offset, true));
        } else {
            self.offset = target.offset;
            self.surface.with(|s| s.scroll_to(target.offset, false));
            events.extend(self.finish_settle());
        }
        events
    }

    /// Re-centre the viewport on the settled index without animation.
    ///
    /// Does nothing while the lane is moving. Returns `true` if the offset changed.
    pub fn refresh_current_position(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        let Some(target) = self.snap_engine().target_for_index(index as i64, self.offset) else {
            return false;
        };
        if (target.offset - self.offset).abs() < f32::EPSILON {
            return false;
        }
        tracing::trace!(target: targets::WHEEL, index, from = self.offset, to = target.offset, "refreshing position");
        self.offset = target.offset;
        self.surface.with(|s| s.scroll_to(target.offset, false));
        true
    }

    // =========================================================================
    // Surface
    // =========================================================================

    /// Attach the host surface.
    pub fn attach_surface(&mut self, surface: SurfaceHandle) {
        self.surface = surface;
        let count = self.items.len();
        let circular = self.circular;
        let offset = self.offset;
        self.surface.with(|s| {
            s.content_changed(count, circular);
            s.scroll_to(offset, false);
        });
    }

    /// Detach the host surface.
    pub fn detach_surface(&mut self) {
        self.surface = SurfaceHandle::detached();
    }

    /// Whether a live surface is attached.
    pub fn has_surface(&self) -> bool {
        self.surface.is_attached()
    }

    /// Process a notification from the host surface.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) -> Vec<WheelEvent> {
        match event {
            SurfaceEvent::StateChanged(state) => self.on_scroll_state_changed(state),
            SurfaceEvent::Scrolled { dy } => {
                self.on_scrolled(dy);
                Vec::new()
            }
            SurfaceEvent::Fling { velocity } => self.on_fling(velocity),
        }
    }

    /// The content moved by `dy` pixels.
    ///
    /// Tracks the offset and sends a haptic tick when the centred item changes.
    /// Never changes the selection.
    pub fn on_scrolled(&mut self, dy: f32) {
        let reported = self.surface.with(|s| s.scroll_offset());
        self.offset = reported.unwrap_or(self.offset + dy);

        if let Some(index) = self.centered_index() {
            if self.haptics.center_changed(index) {
                tracing::trace!(target: targets::WHEEL, index, "haptic tick");
            }
        }
    }

    /// The user released the content with `velocity` pixels per second.
    ///
    /// Velocities below the configured minimum snap to the nearest item, like
    /// a release without momentum.
    pub fn on_fling(&mut self, velocity: f32) -> Vec<WheelEvent> {
        let engine = self.snap_engine();
        let target = if velocity.abs() < self.min_fling_velocity {
            tracing::trace!(target: targets::WHEEL, velocity, "fling too slow, snapping in place");
            engine.settle(self.offset)
        } else {
            engine.fling_target(self.offset, velocity, self.fling_deceleration)
        };
        let Some(target) = target else {
            self.supersede_pending("fling on empty lane");
            return self.finish_settle();
        };

        self.supersede_pending("fling");
        self.pending = Some(PendingSettle {
            target,
            completion: None,
        });

        let mut events = Vec::new();
        self.transition(ScrollState::Settling, &mut events);
        if self.surface.is_attached() {
            self.surface.with(|s| s.scroll_to(target.offset, true));
        } else {
            self.offset = target.offset;
            events.extend(self.finish_settle());
        }
        events
    }

    /// The surface changed scroll state.
    pub fn on_scroll_state_changed(&mut self, state: ScrollState) -> Vec<WheelEvent> {
        let mut events = Vec::new();
        match state {
            ScrollState::Dragging => {
                if self.state != ScrollState::Dragging {
                    let grabbed = self.snap_engine().settle(self.offset).map(|t| t.index);
                    self.haptics.anchor(grabbed);
                }
                self.supersede_pending("user drag");
                self.transition(ScrollState::Dragging, &mut events);
            }
            ScrollState::Settling => self.transition(ScrollState::Settling, &mut events),
            ScrollState::Idle => events.extend(self.on_surface_idle()),
        }
        events
    }

    // =========================================================================
    // Haptics
    // =========================================================================

    /// Set the haptic sink.
    pub fn set_haptic_sink(&mut self, sink: Option<Arc<dyn HapticSink>>) {
        self.haptics.set_sink(sink);
    }

    /// Enable or disable haptic ticks.
    pub fn set_haptic_feedback_enabled(&mut self, enabled: bool) {
        self.haptics.set_enabled(enabled);
    }

    /// Whether haptic ticks are enabled.
    pub fn haptic_feedback_enabled(&self) -> bool {
        self.haptics.is_enabled()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn centered_index(&self) -> Option<usize> {
        let engine = self.snap_engine();
        let visible = self.surface.with(|s| s.visible_items()).unwrap_or_default();
        if visible.is_empty() {
            return engine.settle(self.offset).map(|t| t.index);
        }
        SnapEngine::centered_item(&visible, self.geometry.viewport_height())
            .and_then(|position| engine.index_at_position(position))
    }

    fn on_surface_idle(&mut self) -> Vec<WheelEvent> {
        if let Some(offset) = self.surface.with(|s| s.scroll_offset()) {
            self.offset = offset;
        }

        let engine = self.snap_engine();
        let target = match &self.pending {
            Some(pending) => Some(pending.target),
            None => engine.settle(self.offset),
        };
        let Some(target) = target else {
            return self.finish_settle();
        };

        if (target.offset - self.offset).abs() >= 0.5 && self.surface.is_attached() {
            tracing::trace!(target: targets::WHEEL, index = target.index, offset = target.offset, "snapping to item");
            if self.pending.is_none() {
                self.pending = Some(PendingSettle {
                    target,
                    completion: None,
                });
            }
            let mut events = Vec::new();
            self.transition(ScrollState::Settling, &mut events);
            self.surface.with(|s| s.scroll_to(target.offset, true));
            return events;
        }

        self.offset = target.offset;
        self.finish_settle()
    }

    /// Commit the settle at the current offset.
    fn finish_settle(&mut self) -> Vec<WheelEvent> {
        let _span = tracing::trace_span!(target: targets::WHEEL, span_names::SETTLE).entered();
        let mut events = Vec::new();

        let completion = self.pending.take().and_then(|p| p.completion);
        let settled = self.snap_engine().settle(self.offset);
        if let Some(target) = settled {
            self.offset = target.offset;
        }
        let previous = self.selected;
        self.selected = settled.map(|t| t.index);

        self.transition(ScrollState::Idle, &mut events);

        if let Some(complete) = completion {
            complete();
        }

        if let Some(index) = self.selected {
            if previous != Some(index) {
                tracing::debug!(target: targets::WHEEL, index, ?previous, "selection changed");
                self.selection_changed.emit(index);
                events.push(WheelEvent::SelectionChanged(index));
            }
            events.push(WheelEvent::Settled(index));
        }
        events
    }

    fn supersede_pending(&mut self, reason: &'static str) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(
                target: targets::WHEEL,
                index = pending.target.index,
                had_completion = pending.completion.is_some(),
                reason,
                "superseding pending settle"
            );
        }
    }

    fn transition(&mut self, state: ScrollState, events: &mut Vec<WheelEvent>) {
        if self.state == state {
            return;
        }
        tracing::trace!(target: targets::WHEEL, from = ?self.state, to = ?state, "scroll state");
        self.state = state;
        self.scroll_state_changed.emit(state);
        events.push(WheelEvent::ScrollStateChanged(state));
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Wheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wheel")
            .field("len", &self.items.len())
            .field("circular", &self.circular)
            .field("selected", &self.selected)
            .field("target", &self.target_index())
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("surface", &self.surface)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::VirtualScrollSurface;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn wheel(count: usize) -> Wheel {
        Wheel::new().with_items(WheelItem::indexed((0..count).map(|i| format!("item {i}"))))
    }

    fn attached(count: usize) -> (Wheel, Arc<Mutex<VirtualScrollSurface>>) {
        let surface = VirtualScrollSurface::from_config(&WheelConfig::default()).shared();
        let wheel = wheel(count).with_surface(SurfaceHandle::new(&surface));
        (wheel, surface)
    }

    /// Advance the surface until it stops, feeding every event to the wheel.
    fn pump(wheel: &mut Wheel, surface: &Arc<Mutex<VirtualScrollSurface>>) -> Vec<WheelEvent> {
        let mut out = Vec::new();
        for _ in 0..200 {
            let events = surface.lock().advance(FRAME);
            if events.is_empty() && !surface.lock().is_animating() {
                break;
            }
            for event in events {
                out.extend(wheel.handle_surface_event(event));
            }
        }
        out
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Completion) {
        let count = Arc::new(AtomicUsize::new(0));
        let make = {
            let count = count.clone();
            move || -> Completion {
                let count = count.clone();
                Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                })
            }
        };
        (count, make)
    }

    #[test]
    fn test_initial_state() {
        let w = wheel(3);
        assert_eq!(w.selected_index(), Some(0));
        assert!(w.is_idle());

        let empty = Wheel::new();
        assert_eq!(empty.selected_index(), None);
        assert_eq!(empty.target_index(), None);
    }

    #[test]
    fn test_bounded_clamps_selection() {
        let mut w = wheel(5);
        w.set_selected_index(-3, false, None);
        assert_eq!(w.selected_index(), Some(0));
        w.set_selected_index(42, false, None);
        assert_eq!(w.selected_index(), Some(4));
        assert_eq!(w.scroll_offset(), 160.0);
    }

    #[test]
    fn test_circular_wraps_selection() {
        let mut w = wheel(5).with_circular(true);
        w.set_selected_index(7, false, None);
        assert_eq!(w.selected_index(), Some(2));
        w.set_selected_index(-1, false, None);
        assert_eq!(w.selected_index(), Some(4));
    }

    #[test]
    fn test_instant_selection_events() {
        let mut w = wheel(5);
        let changed = Arc::new(Mutex::new(Vec::new()));
        let changed_clone = changed.clone();
        w.selection_changed.connect(move |&i| changed_clone.lock().push(i));

        let events = w.set_selected_index(3, false, None);
        assert_eq!(
            events,
            vec![
                WheelEvent::ScrollStateChanged(ScrollState::Settling),
                WheelEvent::ScrollStateChanged(ScrollState::Idle),
                WheelEvent::SelectionChanged(3),
                WheelEvent::Settled(3),
            ]
        );
        assert_eq!(*changed.lock(), vec![3]);
    }

    #[test]
    fn test_same_index_completes_synchronously() {
        let mut w = wheel(5);
        w.set_selected_index(2, false, None);

        let (count, completion) = counter();
        let events = w.set_selected_index(2, true, Some(completion()));
        assert!(events.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_lane_is_noop() {
        let mut w = Wheel::new();
        let (count, completion) = counter();
        assert!(w.set_selected_index(3, true, Some(completion())).is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(w.selected_index(), None);
    }

    #[test]
    fn test_set_items_keeps_or_resets() {
        let mut w = wheel(5);
        w.set_selected_index(3, false, None);

        w.set_items(WheelItem::indexed(["a", "b", "c", "d"]));
        assert_eq!(w.selected_index(), Some(3));

        w.set_items(WheelItem::indexed(["a"]));
        assert_eq!(w.selected_index(), Some(0));

        w.set_items(Vec::new());
        assert_eq!(w.selected_index(), None);
    }

    #[test]
    fn test_animated_selection_waits_for_surface() {
        let (mut w, surface) = attached(10);
        let (count, completion) = counter();

        let events = w.set_selected_index(4, true, Some(completion()));
        assert_eq!(events, vec![WheelEvent::ScrollStateChanged(ScrollState::Settling)]);
        assert_eq!(w.selected_index(), Some(0));
        assert_eq!(w.target_index(), Some(4));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let events = pump(&mut w, &surface);
        assert!(events.contains(&WheelEvent::SelectionChanged(4)));
        assert_eq!(w.selected_index(), Some(4));
        assert!(w.is_idle());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rapid_requests_only_last_observed() {
        let (mut w, surface) = attached(10);
        let (first, make_first) = counter();
        let (last, make_last) = counter();

        w.set_selected_index(3, true, Some(make_first()));
        surface.lock().advance(FRAME);
        w.set_selected_index(6, true, Some(make_last()));

        let events = pump(&mut w, &surface);
        let settled: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, WheelEvent::Settled(_)))
            .collect();
        assert_eq!(settled, vec![&WheelEvent::Settled(6)]);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(last.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drag_supersedes_pending() {
        let (mut w, surface) = attached(10);
        let (count, completion) = counter();
        w.set_selected_index(5, true, Some(completion()));

        let events = surface.lock().drag_by(10.0);
        for event in events {
            w.handle_surface_event(event);
        }
        assert_eq!(w.state(), ScrollState::Dragging);
        assert!(!w.has_pending_settle());

        let events = surface.lock().release();
        for event in events {
            w.handle_surface_event(event);
        }
        pump(&mut w, &surface);
        assert_eq!(w.selected_index(), Some(0));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_release_snaps_to_nearest() {
        let (mut w, surface) = attached(10);
        let events = surface.lock().drag_by(75.0);
        for event in events {
            w.handle_surface_event(event);
        }
        let events = surface.lock().release();
        let mut out = Vec::new();
        for event in events {
            out.extend(w.handle_surface_event(event));
        }
        assert_eq!(w.state(), ScrollState::Settling);
        out.extend(pump(&mut w, &surface));

        assert_eq!(w.selected_index(), Some(2));
        assert_eq!(surface.lock().offset(), 80.0);
        assert_eq!(
            out.iter().filter(|e| matches!(e, WheelEvent::SelectionChanged(_))).count(),
            1
        );
    }

    #[test]
    fn test_fling_projects_and_settles() {
        let (mut w, surface) = attached(100);
        let mut events = surface.lock().drag_by(1.0);
        events.extend(surface.lock().fling(800.0));
        for event in events {
            w.handle_surface_event(event);
        }
        pump(&mut w, &surface);
        // 1 + 800^2 / 3000 = 214.3 → item 5
        assert_eq!(w.selected_index(), Some(5));
    }

    #[test]
    fn test_slow_fling_snaps_to_nearest() {
        let (mut w, surface) = attached(5);
        let mut events = surface.lock().drag_by(55.0);
        events.extend(surface.lock().fling(5.0));
        for event in events {
            w.handle_surface_event(event);
        }
        assert_eq!(w.state(), ScrollState::Settling);

        let out = pump(&mut w, &surface);
        assert_eq!(w.state(), ScrollState::Idle);
        assert_eq!(w.selected_index(), Some(1));
        assert_eq!(surface.lock().offset(), 40.0);
        assert!(out.contains(&WheelEvent::Settled(1)));
    }

    #[test]
    fn test_slow_fling_without_surface_settles_at_once() {
        let mut w = wheel(5);
        w.on_scroll_state_changed(ScrollState::Dragging);
        w.on_scrolled(90.0);
        w.on_scroll_state_changed(ScrollState::Settling);

        let events = w.on_fling(1.0);
        assert!(w.is_idle());
        assert_eq!(w.selected_index(), Some(2));
        assert!(events.contains(&WheelEvent::Settled(2)));
    }

    #[test]
    fn test_haptic_ticks_once_per_index() {
        let (mut w, surface) = attached(10);
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticks_clone = ticks.clone();
        w.set_haptic_sink(Some(Arc::new(move || {
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        })));

        for dy in [5.0, 5.0, 15.0, 20.0, 40.0] {
            let events = surface.lock().drag_by(dy);
            for event in events {
                w.handle_surface_event(event);
            }
        }
        // The grabbed item stays silent; the centre then moves onto 1 and 2.
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        w.set_haptic_feedback_enabled(false);
        let events = surface.lock().drag_by(40.0);
        for event in events {
            w.handle_surface_event(event);
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropped_surface_completes_immediately() {
        let (mut w, surface) = attached(10);
        drop(surface);
        assert!(!w.has_surface());

        let (count, completion) = counter();
        w.set_selected_index(7, true, Some(completion()));
        assert_eq!(w.selected_index(), Some(7));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refresh_current_position() {
        let (mut w, surface) = attached(10);
        w.set_selected_index(8, false, None);
        w.set_items(WheelItem::indexed(["a", "b", "c"]));
        assert_eq!(w.selected_index(), Some(0));

        assert!(w.refresh_current_position());
        assert_eq!(surface.lock().offset(), 0.0);
        assert!(!w.refresh_current_position());
    }
}
