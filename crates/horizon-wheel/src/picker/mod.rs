//! Pickers made of two or three dependent wheels.
//!
//! A [`DependentPicker`] keeps its lanes consistent: whenever a lane settles on
//! a new index, every lane after it is regenerated from the
//! [`DependencySource`] and reset to its first item. Once every lane is at
//! rest the combined [`SelectionTuple`] is checked against the picker's
//! [`Bounds`] and, if it fits, announced through `value_changed`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_wheel::{DependentPicker, RegionTable, SelectionTuple};
//!
//! let table = RegionTable::new(["A", "B"])
//!     .with_cities(vec![vec!["A1", "A2"], vec!["B1"]])
//!     .with_areas(vec![vec![vec!["A1a"], vec!["A2a"]], vec![vec!["B1a", "B1b"]]]);
//! let mut picker = DependentPicker::region(table);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = seen.clone();
//! picker.value_changed.connect(move |value| seen_clone.lock().push(value.clone()));
//!
//! // Without an attached surface every selection settles immediately.
//! picker.set_first(1, true, None);
//! assert_eq!(picker.lane(1).unwrap().selected_item().unwrap().label(), "B1");
//! assert_eq!(*seen.lock(), vec![SelectionTuple::new([1, 0, 0])]);
//! ```

mod bounds;
mod source;

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::NaiveDate;
use horizon_wheel_core::logging::{span_names, targets};
use horizon_wheel_core::{PerfSpan, Signal, TaskQueue};
use serde::{Deserialize, Serialize};

pub use bounds::{Bounds, SelectionTuple, TupleEncoding};
pub use source::{DateSource, DependencySource, RegionTable};

use crate::config::PickerConfig;
use crate::error::Result;
use crate::haptics::HapticSink;
use crate::surface::{ScrollState, SurfaceEvent, SurfaceHandle};
use crate::wheel::{Completion, Wheel, WheelEvent};

/// Which lanes of a picker are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerMode {
    /// All three lanes.
    #[default]
    ThreeLane,
    /// The first two lanes.
    TwoLane,
    /// Only the first lane.
    OneLane,
}

impl PickerMode {
    /// Province, city and area.
    pub const PROVINCE_CITY_AREA: Self = Self::ThreeLane;
    /// Province and city.
    pub const PROVINCE_CITY: Self = Self::TwoLane;
    /// Province only.
    pub const PROVINCE: Self = Self::OneLane;

    /// Number of lanes shown in this mode.
    pub fn lane_count(self) -> usize {
        match self {
            Self::ThreeLane => 3,
            Self::TwoLane => 2,
            Self::OneLane => 1,
        }
    }
}

/// Work deferred to the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerTask {
    /// Re-centre a lane whose items were replaced, once it has settled.
    RefreshPosition(usize),
}

/// A `set_selection` still walking down the lanes.
#[derive(Debug)]
struct SelectionWalk {
    /// Next lane to set.
    lane: usize,
    /// Indices for `lane` and the lanes after it.
    remaining: VecDeque<i64>,
    animated: bool,
}

/// Two or three wheels whose items depend on each other.
///
/// # Signals
///
/// - `value_changed(SelectionTuple)`: Emitted when every lane has settled and
///   the selection lies within the bounds
pub struct DependentPicker {
    /// The lanes, in dependency order.
    lanes: Vec<Wheel>,

    /// Where lane items come from.
    source: Box<dyn DependencySource>,

    /// Which lanes are shown.
    mode: PickerMode,

    /// Accepted selection range.
    bounds: Bounds,

    /// Encoding used to compare selections with the bounds.
    encoding: TupleEncoding,

    /// Index hidden lanes are forced to.
    hidden_lane_index: usize,

    /// Upstream indices each lane's items were generated from.
    generated_from: Vec<Option<Vec<usize>>>,

    /// Post-settle work.
    deferred: TaskQueue<PickerTask>,

    /// Unfinished `set_selection`.
    walk: Option<SelectionWalk>,

    /// A settle finished since the last validation.
    needs_validation: bool,

    /// Nesting depth of batched updates; validation waits for zero.
    batch_depth: usize,

    /// Signal emitted with each accepted selection.
    pub value_changed: Signal<SelectionTuple>,
}

impl DependentPicker {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a picker over `source` with the default configuration.
    pub fn new(source: impl DependencySource + 'static) -> Self {
        Self::build(Box::new(source), &PickerConfig::default())
    }

    /// Create a picker over `source` with a validated configuration.
    pub fn with_config(
        source: impl DependencySource + 'static,
        config: &PickerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(Box::new(source), config))
    }

    /// A province, city and area picker.
    pub fn region(table: RegionTable) -> Self {
        Self::new(table)
    }

    /// A year, month and day picker limited to `minimum..=maximum`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use horizon_wheel::{DateSource, DependentPicker};
    ///
    /// let source = DateSource::new(2020..=2030);
    /// let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    /// let indices = source.indices_of(today).unwrap();
    ///
    /// let mut picker = DependentPicker::date(source, None, None);
    /// picker.set_selection(&indices.map(|i| i as i64), false);
    /// assert_eq!(picker.current_value().unwrap().to_date(), Some(today));
    /// ```
    pub fn date(source: DateSource, minimum: Option<NaiveDate>, maximum: Option<NaiveDate>) -> Self {
        let mut picker = Self::new(source);
        picker.set_bounds(Bounds::between_dates(minimum, maximum));
        picker
    }

    fn build(source: Box<dyn DependencySource>, config: &PickerConfig) -> Self {
        let lane_count = source.lane_count().clamp(2, 3);
        if lane_count != source.lane_count() {
            tracing::warn!(
                target: targets::PICKER,
                requested = source.lane_count(),
                lane_count,
                "unsupported lane count"
            );
        }

        let bounds = Bounds::new(
            config.minimum.clone().map(SelectionTuple::from),
            config.maximum.clone().map(SelectionTuple::from),
        );

        let mut picker = Self {
            lanes: (0..lane_count).map(|_| Wheel::from_config(&config.wheel)).collect(),
            source,
            mode: config.mode,
            bounds,
            encoding: TupleEncoding::new(config.encoding_widths.clone()),
            hidden_lane_index: config.hidden_lane_index,
            generated_from: vec![None; lane_count],
            deferred: TaskQueue::new(),
            walk: None,
            needs_validation: false,
            batch_depth: 0,
            value_changed: Signal::new(),
        };
        picker.populate_root();
        picker
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the data source.
    ///
    /// Lane 0 is refilled; the other lanes are emptied until lane 0 next
    /// settles or a selection is set.
    pub fn set_data(&mut self, source: impl DependencySource + 'static) {
        self.source = Box::new(source);
        self.populate_root();
    }

    /// The data source.
    pub fn source(&self) -> &dyn DependencySource {
        self.source.as_ref()
    }

    fn populate_root(&mut self) {
        if self.source.lane_count() != self.lanes.len() {
            tracing::warn!(
                target: targets::PICKER,
                source_lanes = self.source.lane_count(),
                lanes = self.lanes.len(),
                "source lane count does not match picker"
            );
        }
        self.deferred.cancel_where(|_| true);
        self.abandon_walk("data replaced");
        self.generated_from.iter_mut().for_each(|key| *key = None);

        let root = self.source.root_items();
        tracing::debug!(target: targets::PICKER, count = root.len(), "populating root lane");
        if let Some((first, rest)) = self.lanes.split_first_mut() {
            first.set_items(root);
            for lane in rest {
                lane.set_items(Vec::new());
            }
        }
    }

    // =========================================================================
    // Lanes
    // =========================================================================

    /// Number of lanes (2 or 3).
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of lanes the current mode shows.
    pub fn active_lane_count(&self) -> usize {
        self.mode.lane_count().min(self.lanes.len())
    }

    /// The lane at `index`.
    pub fn lane(&self, index: usize) -> Option<&Wheel> {
        self.lanes.get(index)
    }

    /// Settled index of every lane.
    pub fn selected_indices(&self) -> Vec<Option<usize>> {
        self.lanes.iter().map(Wheel::selected_index).collect()
    }

    /// The selection of the active lanes, if every one of them has an item selected.
    pub fn current_value(&self) -> Option<SelectionTuple> {
        self.lanes[..self.active_lane_count()]
            .iter()
            .enumerate()
            .map(|(lane, wheel)| wheel.selected_index().map(|i| self.source.value(lane, i)))
            .collect::<Option<Vec<_>>>()
            .map(SelectionTuple::from)
    }

    /// Attach the host surface of `lane`.
    pub fn attach_surface(&mut self, lane: usize, surface: SurfaceHandle) {
        if let Some(wheel) = self.lanes.get_mut(lane) {
            wheel.attach_surface(surface);
        }
    }

    /// Set the haptic sink of every lane.
    pub fn set_haptic_sink(&mut self, sink: Option<Arc<dyn HapticSink>>) {
        for lane in &mut self.lanes {
            lane.set_haptic_sink(sink.clone());
        }
    }

    /// Enable or disable haptic ticks on every lane.
    pub fn set_haptic_feedback_enabled(&mut self, enabled: bool) {
        for lane in &mut self.lanes {
            lane.set_haptic_feedback_enabled(enabled);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select `value` in lane 0.
    pub fn set_first(&mut self, value: i64, animated: bool, on_complete: Option<Completion>) {
        self.set_lane(0, value, animated, on_complete);
    }

    /// Select `value` in lane 1.
    pub fn set_second(&mut self, value: i64, animated: bool, on_complete: Option<Completion>) {
        self.set_lane(1, value, animated, on_complete);
    }

    /// Select `value` in lane 2.
    pub fn set_third(&mut self, value: i64, animated: bool, on_complete: Option<Completion>) {
        self.set_lane(2, value, animated, on_complete);
    }

    /// Select `value` in `lane`.
    ///
    /// Later lanes follow once the lane settles. `on_complete` behaves as in
    /// [`Wheel::set_selected_index`]; for a lane that does not exist it runs
    /// immediately.
    pub fn set_lane(
        &mut self,
        lane: usize,
        value: i64,
        animated: bool,
        on_complete: Option<Completion>,
    ) {
        self.abandon_walk("lane set directly");
        let Some(wheel) = self.lanes.get_mut(lane) else {
            if let Some(complete) = on_complete {
                complete();
            }
            return;
        };
        let events = wheel.set_selected_index(value, animated, on_complete);
        self.process_events(lane, events);
        self.validate_if_idle();
    }

    /// Select one index per active lane, in order.
    ///
    /// A lane is set only once the lane before it has settled and its
    /// dependents were regenerated, so later indices refer to the right lists.
    /// With `animated` and attached surfaces the walk continues from
    /// [`handle_surface_event`](Self::handle_surface_event). Extra indices are
    /// ignored. The result is validated once, after the last lane.
    pub fn set_selection(&mut self, indices: &[i64], animated: bool) {
        self.abandon_walk("new selection requested");
        let active = self.active_lane_count();
        self.walk = Some(SelectionWalk {
            lane: 0,
            remaining: indices.iter().copied().take(active).collect(),
            animated,
        });
        self.needs_validation = true;
        self.continue_walk();
        self.validate_if_idle();
    }

    /// Whether a `set_selection` is still waiting for a lane to settle.
    pub fn is_selecting(&self) -> bool {
        self.walk.is_some()
    }

    // =========================================================================
    // Mode and bounds
    // =========================================================================

    /// Current lane visibility.
    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    /// Change which lanes are shown.
    ///
    /// Lanes that become hidden jump to the hidden-lane index without
    /// regenerating anything. Lanes that become visible are regenerated from
    /// the lanes before them.
    pub fn set_mode(&mut self, mode: PickerMode) {
        if self.mode == mode {
            return;
        }
        self.abandon_walk("mode changed");
        let before = self.active_lane_count();
        self.mode = mode;
        let after = self.active_lane_count();
        tracing::debug!(target: targets::PICKER, ?mode, before, after, "mode changed");

        let sentinel = self.hidden_lane_index as i64;
        for wheel in &mut self.lanes[after..before.max(after)] {
            wheel.selection_changed.set_blocked(true);
            let _ = wheel.set_selected_index(sentinel, false, None);
            wheel.selection_changed.set_blocked(false);
        }

        if after > before {
            for key in &mut self.generated_from[before..after] {
                *key = None;
            }
            self.cascade_from(before - 1);
        }

        self.needs_validation = true;
        self.validate_if_idle();
    }

    /// Index hidden lanes are forced to.
    pub fn hidden_lane_index(&self) -> usize {
        self.hidden_lane_index
    }

    /// Set the index hidden lanes are forced to by later mode changes.
    pub fn set_hidden_lane_index(&mut self, index: usize) {
        self.hidden_lane_index = index;
    }

    /// Accepted selection range.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Set the accepted selection range.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Set the lower limit.
    pub fn set_minimum(&mut self, minimum: Option<SelectionTuple>) {
        self.bounds.set_minimum(minimum);
    }

    /// Set the upper limit.
    pub fn set_maximum(&mut self, maximum: Option<SelectionTuple>) {
        self.bounds.set_maximum(maximum);
    }

    /// Encoding used to compare selections with the bounds.
    pub fn encoding(&self) -> &TupleEncoding {
        &self.encoding
    }

    /// Set the encoding used to compare selections with the bounds.
    pub fn set_encoding(&mut self, encoding: TupleEncoding) {
        self.encoding = encoding;
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Process a notification from the surface of `lane`.
    pub fn handle_surface_event(&mut self, lane: usize, event: SurfaceEvent) {
        let Some(wheel) = self.lanes.get_mut(lane) else {
            tracing::warn!(target: targets::PICKER, lane, "event for unknown lane");
            return;
        };
        let events = wheel.handle_surface_event(event);
        self.process_events(lane, events);
        self.continue_walk();
        self.validate_if_idle();
    }

    /// Run deferred work. Hosts call this once per frame.
    ///
    /// Returns the number of tasks that ran; tasks waiting for a lane to
    /// settle stay queued.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        for task in self.deferred.take_all() {
            match task {
                PickerTask::RefreshPosition(lane) => match self.lanes.get_mut(lane) {
                    Some(wheel) if !wheel.is_idle() => {
                        self.deferred.post_unique(task);
                    }
                    Some(wheel) => {
                        wheel.refresh_current_position();
                        ran += 1;
                    }
                    None => {}
                },
            }
        }
        ran
    }

    /// Whether deferred work is queued.
    pub fn has_deferred(&self) -> bool {
        self.deferred.has_pending()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn process_events(&mut self, lane: usize, events: Vec<WheelEvent>) {
        if lane >= self.active_lane_count() {
            return;
        }
        for event in events {
            match event {
                WheelEvent::Settled(index) => {
                    tracing::trace!(target: targets::PICKER, lane, index, "lane settled");
                    self.needs_validation = true;
                    self.cascade_from(lane);
                }
                WheelEvent::ScrollStateChanged(ScrollState::Dragging) => {
                    self.abandon_walk("user drag");
                }
                _ => {}
            }
        }
    }

    /// Set the next lanes of an unfinished `set_selection` for as long as the
    /// lane before each one is at rest.
    fn continue_walk(&mut self) {
        self.batch_depth += 1;
        while let Some(walk) = self.walk.as_mut() {
            let lane = walk.lane;
            if lane > 0 && !self.lanes[lane - 1].is_idle() {
                break;
            }
            let Some(value) = walk.remaining.pop_front() else {
                self.walk = None;
                break;
            };
            walk.lane += 1;
            let animated = walk.animated;

            if lane > 0 {
                self.cascade_from(lane - 1);
            }
            tracing::trace!(target: targets::PICKER, lane, value, animated, "selection walk");
            let events = self.lanes[lane].set_selected_index(value, animated, None);
            self.process_events(lane, events);
        }
        self.batch_depth -= 1;
    }

    fn abandon_walk(&mut self, reason: &'static str) {
        if let Some(walk) = self.walk.take() {
            tracing::debug!(
                target: targets::PICKER,
                lane = walk.lane,
                remaining = walk.remaining.len(),
                reason,
                "abandoning selection walk"
            );
        }
    }

    /// Regenerate the lanes after `lane` from the lanes up to it.
    fn cascade_from(&mut self, lane: usize) {
        let next = lane + 1;
        if next >= self.active_lane_count() {
            return;
        }

        let Some(upstream) = self.lanes[..next]
            .iter()
            .map(Wheel::target_index)
            .collect::<Option<Vec<_>>>()
        else {
            tracing::debug!(target: targets::PICKER, lane = next, "upstream lane empty, cascade stops");
            return;
        };
        if self.generated_from[next].as_ref() == Some(&upstream) {
            return;
        }

        let _span = PerfSpan::new(span_names::CASCADE);
        let Some(items) = self.source.dependent_items(next, &upstream) else {
            tracing::debug!(
                target: targets::PICKER,
                lane = next,
                ?upstream,
                "no dependency data, cascade stops"
            );
            return;
        };

        tracing::debug!(target: targets::PICKER, lane = next, ?upstream, count = items.len(), "regenerating lane");
        self.lanes[next].set_items(items);
        self.generated_from[next] = Some(upstream);

        let events = self.lanes[next].set_selected_index(0, true, None);
        self.deferred.post_unique(PickerTask::RefreshPosition(next));
        self.process_events(next, events);
        self.cascade_from(next);
    }

    fn validate_if_idle(&mut self) {
        if self.batch_depth > 0 || self.walk.is_some() || !self.needs_validation {
            return;
        }
        if !self.lanes.iter().all(Wheel::is_idle) {
            return;
        }
        self.needs_validation = false;

        let Some(value) = self.current_value() else {
            tracing::trace!(target: targets::PICKER, "selection incomplete, not notifying");
            return;
        };
        if !self.bounds.contains(&value, &self.encoding) {
            tracing::trace!(target: targets::PICKER, %value, "selection out of bounds, not notifying");
            return;
        }
        tracing::debug!(target: targets::PICKER, %value, "value changed");
        self.value_changed.emit(value);
    }
}

impl std::fmt::Debug for DependentPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependentPicker")
            .field("lanes", &self.lanes)
            .field("mode", &self.mode)
            .field("bounds", &self.bounds)
            .field("hidden_lane_index", &self.hidden_lane_index)
            .field("deferred", &self.deferred.pending_count())
            .finish()
    }
}
