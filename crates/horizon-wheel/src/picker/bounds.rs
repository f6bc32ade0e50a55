//! Selection tuples and the range they must fall in.
//!
//! Tuples are compared through a fixed-width, zero-padded decimal encoding:
//! with widths `[4, 2, 2]` the tuple `(2020, 1, 5)` encodes as `"20200105"`.
//! Two tuples of the same length compare like their encodings.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use horizon_wheel_core::logging::targets;

/// Component values of a picker's active lanes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectionTuple(Vec<i64>);

impl SelectionTuple {
    /// Create a tuple from its components.
    pub fn new(components: impl Into<Vec<i64>>) -> Self {
        Self(components.into())
    }

    /// Tuple for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(vec![
            i64::from(date.year()),
            i64::from(date.month()),
            i64::from(date.day()),
        ])
    }

    /// The components.
    pub fn components(&self) -> &[i64] {
        &self.0
    }

    /// Component at `lane`.
    pub fn get(&self, lane: usize) -> Option<i64> {
        self.0.get(lane).copied()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `len` components.
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().copied().take(len).collect())
    }

    /// Interpret a three-component tuple as a calendar date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self.0.as_slice() {
            [y, m, d] => NaiveDate::from_ymd_opt(
                i32::try_from(*y).ok()?,
                u32::try_from(*m).ok()?,
                u32::try_from(*d).ok()?,
            ),
            _ => None,
        }
    }
}

impl From<Vec<i64>> for SelectionTuple {
    fn from(components: Vec<i64>) -> Self {
        Self(components)
    }
}

impl fmt::Display for SelectionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}

/// Fixed-width decimal encoding of tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleEncoding {
    widths: Vec<usize>,
}

impl TupleEncoding {
    /// Create an encoding; components past the last width reuse it.
    ///
    /// An empty width list falls back to the default `[4, 2, 2]`.
    pub fn new(widths: impl Into<Vec<usize>>) -> Self {
        let widths = widths.into();
        if widths.is_empty() {
            return Self::default();
        }
        Self { widths }
    }

    /// The configured widths.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    fn width(&self, lane: usize) -> usize {
        self.widths
            .get(lane)
            .or(self.widths.last())
            .copied()
            .unwrap_or(2)
    }

    /// Encode `tuple`.
    pub fn encode(&self, tuple: &SelectionTuple) -> String {
        let mut out = String::new();
        for (lane, value) in tuple.components().iter().enumerate() {
            let width = self.width(lane);
            let text = format!("{value:0width$}");
            if text.len() > width {
                tracing::warn!(
                    target: targets::PICKER,
                    lane,
                    value,
                    width,
                    "component wider than its encoding, comparisons may be wrong"
                );
            }
            out.push_str(&text);
        }
        out
    }
}

impl Default for TupleEncoding {
    fn default() -> Self {
        Self {
            widths: vec![4, 2, 2],
        }
    }
}

/// Optional inclusive limits on the selection tuple.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bounds {
    minimum: Option<SelectionTuple>,
    maximum: Option<SelectionTuple>,
}

impl Bounds {
    /// No limits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limits from optional minimum and maximum tuples.
    pub fn new(minimum: Option<SelectionTuple>, maximum: Option<SelectionTuple>) -> Self {
        Self { minimum, maximum }
    }

    /// Limits between two calendar dates.
    pub fn between_dates(minimum: Option<NaiveDate>, maximum: Option<NaiveDate>) -> Self {
        Self {
            minimum: minimum.map(SelectionTuple::from_date),
            maximum: maximum.map(SelectionTuple::from_date),
        }
    }

    /// The lower limit.
    pub fn minimum(&self) -> Option<&SelectionTuple> {
        self.minimum.as_ref()
    }

    /// The upper limit.
    pub fn maximum(&self) -> Option<&SelectionTuple> {
        self.maximum.as_ref()
    }

    /// Set the lower limit.
    pub fn set_minimum(&mut self, minimum: Option<SelectionTuple>) {
        self.minimum = minimum;
    }

    /// Set the upper limit.
    pub fn set_maximum(&mut self, maximum: Option<SelectionTuple>) {
        self.maximum = maximum;
    }

    /// Whether neither limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }

    /// Whether `tuple` lies within the limits.
    ///
    /// Limits longer than the tuple are cut to its length, so a three-lane
    /// limit also constrains a picker showing fewer lanes.
    pub fn contains(&self, tuple: &SelectionTuple, encoding: &TupleEncoding) -> bool {
        let value = encoding.encode(tuple);
        let limit = |bound: &SelectionTuple| encoding.encode(&bound.truncated(tuple.len()));

        if let Some(min) = &self.minimum {
            if value < limit(min) {
                return false;
            }
        }
        if let Some(max) = &self.maximum {
            if value > limit(max) {
                return false;
            }
        }
        true
    }
}
