//! Horizon Wheel - snapping wheel selectors and dependent pickers.
//!
//! This crate provides:
//!
//! - [`Wheel`]: a single scrollable lane that snaps so exactly one item sits
//!   on the centre line, with animated or instant programmatic selection
//! - [`DependentPicker`]: two or three wheels whose lists depend on each
//!   other (province → city → area, year → month → day), with optional bounds
//! - [`item_transform`]: the pure per-item transform that makes a flat list
//!   look like a rotating cylinder
//!
//! Wheels are headless. A host scroll view implements [`ScrollSurface`] and
//! forwards its [`SurfaceEvent`]s; [`VirtualScrollSurface`] is a ready-made
//! frame-driven surface for custom renderers and tests.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_wheel::{
//!     DependentPicker, RegionTable, SurfaceHandle, VirtualScrollSurface, WheelConfig,
//! };
//!
//! let table = RegionTable::new(["A", "B"])
//!     .with_cities(vec![vec!["A1", "A2"], vec!["B1"]]);
//! let mut picker = DependentPicker::region(table);
//!
//! let surface = VirtualScrollSurface::from_config(&WheelConfig::default()).shared();
//! picker.attach_surface(0, SurfaceHandle::new(&surface));
//!
//! picker.set_first(1, true, None);
//! loop {
//!     let events = surface.lock().advance(Duration::from_millis(16));
//!     if events.is_empty() {
//!         break;
//!     }
//!     for event in events {
//!         picker.handle_surface_event(0, event);
//!     }
//!     picker.run_deferred();
//! }
//! assert_eq!(picker.selected_indices()[..2], [Some(1), Some(0)]);
//! ```

pub mod config;
pub mod easing;
pub mod error;
pub mod haptics;
pub mod item;
pub mod picker;
pub mod snap;
pub mod surface;
pub mod transform;
pub mod wheel;

pub use config::{PickerConfig, WheelConfig};
pub use easing::{Easing, ease, lerp_eased};
pub use error::{Error, Result};
pub use haptics::{HapticFeedback, HapticSink};
pub use item::WheelItem;
pub use picker::{
    Bounds, DateSource, DependencySource, DependentPicker, PickerMode, RegionTable,
    SelectionTuple, TupleEncoding,
};
pub use snap::{SnapEngine, SnapTarget, VisibleItem, WheelGeometry};
pub use surface::{ScrollState, ScrollSurface, SurfaceEvent, SurfaceHandle, VirtualScrollSurface};
pub use transform::{ItemTransform, PlacedItem, cylinder_radius, item_transform, visible_transforms};
pub use wheel::{Completion, Wheel, WheelEvent};
