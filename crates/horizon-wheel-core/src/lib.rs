//! Core systems for Horizon Wheel.
//!
//! This crate provides the framework primitives the wheel controls are built on:
//!
//! - **Signal/Slot System**: Type-safe notification of selection and state changes
//! - **Task Queue**: Deferred next-tick work such as post-settle refreshes
//! - **Logging**: `tracing` targets and span helpers shared by every crate
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_wheel_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Task Queue Example
//!
//! ```
//! use horizon_wheel_core::TaskQueue;
//!
//! #[derive(Debug, PartialEq)]
//! enum Work {
//!     Refresh(usize),
//! }
//!
//! let mut queue = TaskQueue::new();
//! queue.post(Work::Refresh(1));
//! for task in queue.take_all() {
//!     assert_eq!(task, Work::Refresh(1));
//! }
//! ```

pub mod logging;
pub mod signal;
mod task;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use task::TaskQueue;
