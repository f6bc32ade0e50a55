//! Host scroll surfaces.
//!
//! A wheel does not scroll pixels itself. It drives a host scroll view (the
//! *surface*) through the [`ScrollSurface`] trait and is told what the user did
//! through [`SurfaceEvent`]s, which the host forwards to
//! [`Wheel::handle_surface_event`](crate::Wheel::handle_surface_event).
//!
//! Wheels hold surfaces through a non-owning [`SurfaceHandle`]. If the surface
//! is dropped, scroll commands become no-ops and animated selections settle
//! immediately.
//!
//! [`VirtualScrollSurface`] is a headless surface that animates programmatic
//! scrolls frame by frame and simulates drags and flings. It backs custom
//! renderers and tests.

use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_wheel_core::logging::targets;
use parking_lot::Mutex;

use crate::config::WheelConfig;
use crate::easing::{Easing, lerp_eased};
use crate::snap::{SnapEngine, VisibleItem, WheelGeometry};

/// Scroll state of a surface and of the wheel driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollState {
    /// Not moving.
    #[default]
    Idle,
    /// The user is dragging the content.
    Dragging,
    /// Moving on its own (fling or programmatic scroll) towards a resting offset.
    Settling,
}

/// Notifications a host sends to the wheel it displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The surface changed scroll state.
    StateChanged(ScrollState),
    /// The content moved by `dy` pixels during a frame.
    Scrolled {
        /// Vertical delta in pixels; positive moves towards higher indices.
        dy: f32,
    },
    /// The user released the content with a velocity (pixels per second).
    Fling {
        /// Release velocity; positive moves towards higher indices.
        velocity: f32,
    },
}

/// Commands a wheel needs from its host scroll view.
pub trait ScrollSurface {
    /// Move the content to `offset`, animating if requested.
    ///
    /// An animated scroll must eventually be followed by a
    /// [`ScrollState::Idle`] notification.
    fn scroll_to(&mut self, offset: f32, animated: bool);

    /// Current content offset.
    fn scroll_offset(&self) -> f32;

    /// Geometry of the rendered items, used for centre detection.
    ///
    /// Hosts that cannot report geometry return an empty list and the wheel
    /// falls back to offset arithmetic.
    fn visible_items(&self) -> Vec<VisibleItem> {
        Vec::new()
    }

    /// The wheel's item list was replaced.
    fn content_changed(&mut self, _count: usize, _circular: bool) {}
}

type SharedSurface = Arc<Mutex<dyn ScrollSurface + Send>>;

/// Non-owning reference from a wheel to its surface.
///
/// A handle never keeps the surface alive. Once the surface is dropped every
/// operation through the handle is a no-op.
#[derive(Clone, Default)]
pub struct SurfaceHandle {
    inner: Option<Weak<Mutex<dyn ScrollSurface + Send>>>,
}

impl SurfaceHandle {
    /// Create a handle to a shared surface.
    pub fn new<S>(surface: &Arc<Mutex<S>>) -> Self
    where
        S: ScrollSurface + Send + 'static,
    {
        let shared: SharedSurface = surface.clone();
        Self {
            inner: Some(Arc::downgrade(&shared)),
        }
    }

    /// A handle that refers to nothing.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the surface is still alive.
    pub fn is_attached(&self) -> bool {
        self.inner.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Run `f` against the surface if it is still alive.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn ScrollSurface) -> R) -> Option<R> {
        let surface = self.inner.as_ref()?.upgrade()?;
        let mut guard = surface.lock();
        Some(f(&mut *guard))
    }
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// An in-flight programmatic scroll.
#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    elapsed: Duration,
}

/// A headless scroll surface driven by explicit frame ticks.
///
/// Programmatic animated scrolls progress on [`advance`](Self::advance) and
/// report [`ScrollState::Idle`] when they finish. User interaction is
/// simulated with [`begin_drag`](Self::begin_drag), [`drag_by`](Self::drag_by),
/// [`release`](Self::release) and [`fling`](Self::fling). Every method that
/// produces notifications returns them; the caller forwards them to the wheel
/// after releasing the surface lock.
#[derive(Debug, Clone)]
pub struct VirtualScrollSurface {
    geometry: WheelGeometry,
    offset: f32,
    count: usize,
    circular: bool,
    dragging: bool,
    animation: Option<ScrollAnimation>,
    duration: Duration,
    easing: Easing,
    commands: Vec<(f32, bool)>,
}

impl VirtualScrollSurface {
    /// Create a surface with the given geometry and a 250ms settle animation.
    pub fn new(geometry: WheelGeometry) -> Self {
        Self {
            geometry,
            offset: 0.0,
            count: 0,
            circular: false,
            dragging: false,
            animation: None,
            duration: Duration::from_millis(250),
            easing: Easing::default(),
            commands: Vec::new(),
        }
    }

    /// Create a surface matching a wheel configuration.
    pub fn from_config(config: &WheelConfig) -> Self {
        Self::new(config.geometry())
            .with_duration(config.settle_duration())
            .with_easing(config.easing)
    }

    /// Set the animation duration using builder pattern.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the animation easing using builder pattern.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Wrap the surface for sharing with a wheel.
    pub fn shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    /// Current offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Whether a programmatic scroll is running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether a simulated drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Every `scroll_to` received so far, as `(offset, animated)`.
    pub fn commands(&self) -> &[(f32, bool)] {
        &self.commands
    }

    /// Advance animations by one frame of length `dt`.
    pub fn advance(&mut self, dt: Duration) -> Vec<SurfaceEvent> {
        let Some(mut animation) = self.animation.take() else {
            return Vec::new();
        };

        animation.elapsed += dt;
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (animation.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        let next = if progress >= 1.0 {
            animation.to
        } else {
            lerp_eased(self.easing, animation.from, animation.to, progress)
        };

        let mut events = Vec::new();
        let dy = next - self.offset;
        self.offset = next;
        if dy != 0.0 {
            events.push(SurfaceEvent::Scrolled { dy });
        }

        if progress >= 1.0 {
            tracing::trace!(target: targets::SURFACE, offset = self.offset, "animation finished");
            events.push(SurfaceEvent::StateChanged(ScrollState::Idle));
        } else {
            self.animation = Some(animation);
        }
        events
    }

    /// Advance until no animation is running, one frame of `dt` at a time.
    ///
    /// Gives up after `max_frames` frames.
    pub fn run_to_idle(&mut self, dt: Duration, max_frames: usize) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();
        for _ in 0..max_frames {
            if self.animation.is_none() {
                break;
            }
            events.extend(self.advance(dt));
        }
        events
    }

    /// The user touched the content.
    ///
    /// Any programmatic scroll stops where it is.
    pub fn begin_drag(&mut self) -> Vec<SurfaceEvent> {
        self.animation = None;
        if self.dragging {
            return Vec::new();
        }
        self.dragging = true;
        vec![SurfaceEvent::StateChanged(ScrollState::Dragging)]
    }

    /// The user moved the content by `dy` pixels.
    pub fn drag_by(&mut self, dy: f32) -> Vec<SurfaceEvent> {
        let mut events = self.begin_drag();
        self.offset += dy;
        events.push(SurfaceEvent::Scrolled { dy });
        events
    }

    /// The user let go without momentum.
    pub fn release(&mut self) -> Vec<SurfaceEvent> {
        if !self.dragging {
            return Vec::new();
        }
        self.dragging = false;
        vec![SurfaceEvent::StateChanged(ScrollState::Idle)]
    }

    /// The user let go with `velocity` pixels per second.
    pub fn fling(&mut self, velocity: f32) -> Vec<SurfaceEvent> {
        if !self.dragging {
            return Vec::new();
        }
        self.dragging = false;
        vec![
            SurfaceEvent::StateChanged(ScrollState::Settling),
            SurfaceEvent::Fling { velocity },
        ]
    }
}

impl ScrollSurface for VirtualScrollSurface {
    fn scroll_to(&mut self, offset: f32, animated: bool) {
        self.commands.push((offset, animated));
        if animated {
            self.animation = Some(ScrollAnimation {
                from: self.offset,
                to: offset,
                elapsed: Duration::ZERO,
            });
        } else {
            self.animation = None;
            self.offset = offset;
        }
    }

    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn visible_items(&self) -> Vec<VisibleItem> {
        SnapEngine::new(self.geometry, self.count, self.circular).visible_items(self.offset)
    }

    fn content_changed(&mut self, count: usize, circular: bool) {
        self.count = count;
        self.circular = circular;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> VirtualScrollSurface {
        VirtualScrollSurface::new(WheelGeometry::with_visible_items(40.0, 5))
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear)
    }

    #[test]
    fn test_instant_scroll() {
        let mut s = surface();
        s.scroll_to(120.0, false);
        assert_eq!(s.offset(), 120.0);
        assert!(!s.is_animating());
        assert!(s.advance(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn test_animated_scroll_reports_idle() {
        let mut s = surface();
        s.scroll_to(100.0, true);

        let events = s.advance(Duration::from_millis(50));
        assert_eq!(events, vec![SurfaceEvent::Scrolled { dy: 50.0 }]);

        let events = s.advance(Duration::from_millis(50));
        assert_eq!(
            events,
            vec![
                SurfaceEvent::Scrolled { dy: 50.0 },
                SurfaceEvent::StateChanged(ScrollState::Idle),
            ]
        );
        assert_eq!(s.offset(), 100.0);
    }

    #[test]
    fn test_zero_distance_animation_still_goes_idle() {
        let mut s = surface();
        s.scroll_to(0.0, true);
        let events = s.run_to_idle(Duration::from_millis(16), 100);
        assert_eq!(events, vec![SurfaceEvent::StateChanged(ScrollState::Idle)]);
    }

    #[test]
    fn test_drag_interrupts_animation() {
        let mut s = surface();
        s.scroll_to(100.0, true);
        s.advance(Duration::from_millis(50));

        let events = s.drag_by(-10.0);
        assert_eq!(
            events,
            vec![
                SurfaceEvent::StateChanged(ScrollState::Dragging),
                SurfaceEvent::Scrolled { dy: -10.0 },
            ]
        );
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 40.0);

        assert_eq!(s.release(), vec![SurfaceEvent::StateChanged(ScrollState::Idle)]);
        assert!(s.release().is_empty());
    }

    #[test]
    fn test_fling_events() {
        let mut s = surface();
        s.drag_by(5.0);
        let events = s.fling(900.0);
        assert_eq!(events[0], SurfaceEvent::StateChanged(ScrollState::Settling));
        assert_eq!(events[1], SurfaceEvent::Fling { velocity: 900.0 });
    }

    #[test]
    fn test_handle_does_not_own() {
        let shared = surface().shared();
        let handle = SurfaceHandle::new(&shared);
        assert!(handle.is_attached());
        assert_eq!(handle.with(|s| s.scroll_offset()), Some(0.0));

        drop(shared);
        assert!(!handle.is_attached());
        assert_eq!(handle.with(|s| s.scroll_offset()), None);
        assert!(!SurfaceHandle::detached().is_attached());
    }

    #[test]
    fn test_visible_items_follow_content() {
        let mut s = surface();
        assert!(s.visible_items().is_empty());
        s.content_changed(10, false);
        s.scroll_to(80.0, false);
        let items = s.visible_items();
        assert_eq!(SnapEngine::centered_item(&items, 200.0), Some(2));
    }
}
