//! Snap computation for wheel lanes.
//!
//! A lane is laid out as a vertical strip of fixed-height items. Scroll offset
//! `p * item_height` places virtual position `p` exactly at the viewport
//! centre. Bounded lanes only have positions `0..count`; circular lanes repeat
//! their items forever in both directions, so any integer position is valid
//! and maps to item `p mod count`.
//!
//! [`SnapEngine`] turns a free scroll offset (or a fling velocity) into the
//! offset that centres exactly one item, and normalizes programmatic targets.
//! It is a cheap value built on demand from the lane's current state; it does
//! not scroll anything itself.

use horizon_wheel_core::logging::targets;

/// Vertical metrics of a wheel viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    item_height: f32,
    viewport_height: f32,
}

impl WheelGeometry {
    /// Create geometry from an item height and a viewport height.
    ///
    /// Non-positive or non-finite values are replaced by 1.0 so that snap
    /// arithmetic never divides by zero.
    pub fn new(item_height: f32, viewport_height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        Self {
            item_height: sanitize(item_height),
            viewport_height: sanitize(viewport_height),
        }
    }

    /// Geometry for a viewport showing `visible_items` rows.
    pub fn with_visible_items(item_height: f32, visible_items: usize) -> Self {
        Self::new(item_height, item_height * visible_items.max(1) as f32)
    }

    /// Height of a single item.
    #[inline]
    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Height of the viewport.
    #[inline]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Half the viewport height, i.e. the distance from the top to the centre line.
    #[inline]
    pub fn half_viewport(&self) -> f32 {
        self.viewport_height / 2.0
    }

    /// Scroll offset that centres virtual position `position`.
    #[inline]
    pub fn offset_of(&self, position: i64) -> f32 {
        position as f32 * self.item_height
    }

    /// Nearest virtual position to `offset`.
    #[inline]
    pub fn position_at(&self, offset: f32) -> i64 {
        (offset / self.item_height).round() as i64
    }

    /// Signed distance of `position`'s centre from the viewport centre.
    ///
    /// Negative above the centre line, positive below.
    #[inline]
    pub fn distance_from_center(&self, position: i64, offset: f32) -> f32 {
        self.offset_of(position) - offset
    }
}

/// Geometry of a rendered item, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleItem {
    /// Virtual position of the item (may exceed the item count on circular lanes).
    pub position: i64,
    /// Top edge in viewport coordinates.
    pub top: f32,
    /// Bottom edge in viewport coordinates.
    pub bottom: f32,
}

impl VisibleItem {
    /// Vertical centre of the item.
    pub fn center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Where a settle ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Item index in `0..count`.
    pub index: usize,
    /// Virtual position that will sit on the centre line.
    pub position: i64,
    /// Scroll offset to move to.
    pub offset: f32,
}

/// Resolves scroll offsets and requested indices to centred items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    geometry: WheelGeometry,
    count: usize,
    circular: bool,
}

impl SnapEngine {
    /// Create an engine for a lane of `count` items.
    pub fn new(geometry: WheelGeometry, count: usize, circular: bool) -> Self {
        Self {
            geometry,
            count,
            circular,
        }
    }

    /// The lane geometry.
    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    /// Normalize an externally supplied index.
    ///
    /// Bounded lanes clamp into `[0, count-1]`; circular lanes wrap modulo
    /// `count`. Empty lanes resolve to `None`.
    pub fn resolve_index(&self, index: i64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as i64;
        let resolved = if self.circular {
            index.rem_euclid(count)
        } else {
            index.clamp(0, count - 1)
        };
        Some(resolved as usize)
    }

    /// Item index shown at virtual `position`, if any.
    pub fn index_at_position(&self, position: i64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        if self.circular {
            Some(position.rem_euclid(self.count as i64) as usize)
        } else if (0..self.count as i64).contains(&position) {
            Some(position as usize)
        } else {
            None
        }
    }

    /// Snap a free scroll offset onto the nearest valid item.
    pub fn settle(&self, offset: f32) -> Option<SnapTarget> {
        if self.count == 0 {
            return None;
        }
        let mut position = self.geometry.position_at(offset);
        if !self.circular {
            position = position.clamp(0, self.count as i64 - 1);
        }
        let index = self.index_at_position(position)?;
        Some(SnapTarget {
            index,
            position,
            offset: self.geometry.offset_of(position),
        })
    }

    /// Snap target for a programmatic selection of `index`.
    ///
    /// On circular lanes the returned position is the copy of the item that
    /// is closest to `current_offset`, so the wheel takes the short way round.
    pub fn target_for_index(&self, index: i64, current_offset: f32) -> Option<SnapTarget> {
        let resolved = self.resolve_index(index)?;
        let position = if self.circular {
            let count = self.count as i64;
            let base = self.geometry.position_at(current_offset);
            let mut delta = resolved as i64 - base.rem_euclid(count);
            if delta > count / 2 {
                delta -= count;
            } else if delta < -((count - 1) / 2) {
                delta += count;
            }
            base + delta
        } else {
            resolved as i64
        };
        Some(SnapTarget {
            index: resolved,
            position,
            offset: self.geometry.offset_of(position),
        })
    }

    /// Project an inertial fling and snap where it would come to rest.
    ///
    /// `velocity` is in pixels per second (positive scrolls towards higher
    /// indices); `deceleration` in pixels per second squared.
    pub fn fling_target(
        &self,
        offset: f32,
        velocity: f32,
        deceleration: f32,
    ) -> Option<SnapTarget> {
        let distance = if deceleration > 0.0 && velocity.is_finite() {
            velocity * velocity.abs() / (2.0 * deceleration)
        } else {
            0.0
        };
        tracing::trace!(target: targets::SNAP, offset, velocity, distance, "projecting fling");
        self.settle(offset + distance)
    }

    /// Whether `offset` already centres an item (within half a pixel).
    pub fn is_aligned(&self, offset: f32) -> bool {
        match self.settle(offset) {
            Some(target) => (target.offset - offset).abs() < 0.5,
            None => true,
        }
    }

    /// Geometry of the items intersecting the viewport at `offset`.
    pub fn visible_items(&self, offset: f32) -> Vec<VisibleItem> {
        if self.count == 0 {
            return Vec::new();
        }
        let h = self.geometry.item_height;
        let center = self.geometry.half_viewport();
        let reach = (center / h).ceil() as i64 + 1;
        let middle = self.geometry.position_at(offset);

        ((middle - reach)..=(middle + reach))
            .filter(|&p| self.index_at_position(p).is_some())
            .map(|p| {
                let item_center = center + self.geometry.distance_from_center(p, offset);
                VisibleItem {
                    position: p,
                    top: item_center - h / 2.0,
                    bottom: item_center + h / 2.0,
                }
            })
            .filter(|item| item.bottom > 0.0 && item.top < self.geometry.viewport_height)
            .collect()
    }

    /// Position of the first rendered item whose span contains the viewport centre.
    pub fn centered_item(items: &[VisibleItem], viewport_height: f32) -> Option<i64> {
        let center = viewport_height / 2.0;
        items
            .iter()
            .find(|item| item.top <= center && item.bottom >= center)
            .map(|item| item.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(count: usize, circular: bool) -> SnapEngine {
        SnapEngine::new(WheelGeometry::with_visible_items(40.0, 5), count, circular)
    }

    #[test]
    fn test_geometry_sanitizes() {
        let g = WheelGeometry::new(0.0, f32::NAN);
        assert_eq!(g.item_height(), 1.0);
        assert_eq!(g.viewport_height(), 1.0);
        assert_eq!(WheelGeometry::with_visible_items(40.0, 5).half_viewport(), 100.0);
    }

    #[test]
    fn test_empty_lane() {
        let e = engine(0, false);
        assert_eq!(e.resolve_index(3), None);
        assert_eq!(e.settle(120.0), None);
        assert!(e.visible_items(0.0).is_empty());
        assert!(e.is_aligned(13.0));
    }

    #[test]
    fn test_single_item_lane() {
        let e = engine(1, false);
        let target = e.settle(300.0).unwrap();
        assert_eq!(target.index, 0);
        assert_eq!(target.offset, 0.0);
        assert_eq!(engine(1, true).resolve_index(-7), Some(0));
    }

    #[test]
    fn test_bounded_clamps() {
        let e = engine(5, false);
        assert_eq!(e.resolve_index(-1), Some(0));
        assert_eq!(e.resolve_index(99), Some(4));
        assert_eq!(e.settle(-200.0).unwrap().index, 0);
        assert_eq!(e.settle(10_000.0).unwrap().offset, 160.0);
    }

    #[test]
    fn test_circular_wraps() {
        let e = engine(5, true);
        assert_eq!(e.resolve_index(-1), Some(4));
        assert_eq!(e.resolve_index(12), Some(2));

        let target = e.settle(-45.0).unwrap();
        assert_eq!(target.position, -1);
        assert_eq!(target.index, 4);
    }

    #[test]
    fn test_settle_rounds_to_nearest() {
        let e = engine(10, false);
        assert_eq!(e.settle(59.0).unwrap().index, 1);
        assert_eq!(e.settle(61.0).unwrap().index, 2);
        assert!(e.is_aligned(80.2));
        assert!(!e.is_aligned(90.0));
    }

    #[test]
    fn test_circular_target_takes_short_way() {
        let e = engine(10, true);
        // Sitting on item 9 (position 9); item 0 is one step below.
        let target = e.target_for_index(0, 360.0).unwrap();
        assert_eq!(target.position, 10);
        assert_eq!(target.index, 0);

        // Sitting on position 0; item 9 is one step above.
        let target = e.target_for_index(9, 0.0).unwrap();
        assert_eq!(target.position, -1);
    }

    #[test]
    fn test_fling_projects_past_current() {
        let e = engine(100, false);
        // v^2 / 2a = 800^2 / 3000 = 213.3 → offset 213.3 → position 5
        let target = e.fling_target(0.0, 800.0, 1500.0).unwrap();
        assert_eq!(target.index, 5);

        let back = e.fling_target(400.0, -800.0, 1500.0).unwrap();
        assert_eq!(back.index, 5);

        assert_eq!(e.fling_target(80.0, 800.0, 0.0).unwrap().index, 2);
    }

    #[test]
    fn test_visible_items_and_center() {
        let e = engine(10, false);
        let items = e.visible_items(80.0);
        let positions: Vec<i64> = items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
        assert_eq!(SnapEngine::centered_item(&items, 200.0), Some(2));
        assert_eq!(items[2].center(), 100.0);
    }

    #[test]
    fn test_visible_items_wrap_on_circular() {
        let e = engine(3, true);
        let items = e.visible_items(0.0);
        let positions: Vec<i64> = items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![-2, -1, 0, 1, 2]);
        assert_eq!(e.index_at_position(-2), Some(1));
    }
}
