//! Per-item visual transform for the wheel look.
//!
//! Items are treated as if they were printed on a cylinder whose axis runs
//! horizontally through the viewport centre. The cylinder radius is chosen so
//! that a quarter turn spans half the viewport:
//!
//! ```text
//! r = 2 * half_viewport / PI
//! ```
//!
//! An item whose centre sits `offset` pixels from the centre line is rotated
//! by `offset / r` radians about the X axis, pushed back by
//! `r * (1 - cos(offset / r))` along Z, fades with the cube of its normalized
//! distance and shrinks linearly.
//!
//! [`item_transform`] is a pure function and must be evaluated for every
//! visible item on every scroll frame.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use crate::snap::{SnapEngine, WheelGeometry};

/// Alpha falloff per unit of normalized distance (before cubing).
pub const ALPHA_FALLOFF: f32 = 0.7;
/// Scale falloff per unit of normalized distance.
pub const SCALE_FALLOFF: f32 = 0.3;
/// Over-correction applied to the curved vertical position.
pub const CURVE_FACTOR: f32 = 1.3;

/// Visual transform for a single item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Vertical translation applied on top of the flat layout position.
    pub translate_y: f32,
    /// Rotation about the X axis, in radians.
    pub rotation: f32,
    /// Translation away from the viewer along Z.
    pub depth: f32,
}

impl ItemTransform {
    /// The identity transform (item drawn flat at its layout position).
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        alpha: 1.0,
        translate_y: 0.0,
        rotation: 0.0,
        depth: 0.0,
    };

    /// Rotation in degrees.
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }

    /// Whether this transform leaves the item untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Build the pseudo-3D matrix for an item centred at `pivot`.
    ///
    /// The item is moved so its centre is the origin, rotated about X, pushed
    /// back along Z, moved back to the pivot and finally translated by
    /// `translate_y` and scaled around the pivot.
    pub fn to_mat4(&self, pivot: Vec3) -> Mat4 {
        Mat4::from_translation(pivot + Vec3::new(0.0, self.translate_y, 0.0))
            * Mat4::from_scale(Vec3::new(self.scale, self.scale, 1.0))
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -self.depth))
            * Mat4::from_rotation_x(self.rotation)
            * Mat4::from_translation(-pivot)
    }
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Radius of the virtual cylinder for a viewport of the given half height.
#[inline]
pub fn cylinder_radius(half_viewport: f32) -> f32 {
    2.0 * half_viewport / PI
}

/// Compute the transform for an item `offset` pixels from the viewport centre.
///
/// `offset` is negative above the centre line and positive below it.
/// Degenerate viewports (half height not positive) yield the identity.
pub fn item_transform(offset: f32, half_viewport: f32) -> ItemTransform {
    if half_viewport.is_nan() || half_viewport <= 0.0 || offset == 0.0 || !offset.is_finite() {
        return ItemTransform::IDENTITY;
    }

    let normalized = (offset / half_viewport).abs();
    let alpha = (1.0 - ALPHA_FALLOFF * normalized).max(0.0).powi(3);
    let scale = (1.0 - SCALE_FALLOFF * normalized).max(0.0);

    let radius = cylinder_radius(half_viewport);
    let rotation = offset / radius;
    let translate_y = offset - radius * rotation.sin() * CURVE_FACTOR;
    let depth = radius * (1.0 - rotation.cos());

    ItemTransform {
        scale,
        alpha,
        translate_y,
        rotation,
        depth,
    }
}

/// A visible item paired with the transform to draw it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedItem {
    /// Item index in `0..count`.
    pub index: usize,
    /// Virtual position of this copy of the item.
    pub position: i64,
    /// Signed distance of the item centre from the viewport centre.
    pub offset: f32,
    /// Transform to draw the item with.
    pub transform: ItemTransform,
}

/// Transforms for every item intersecting the viewport at `scroll_offset`.
pub fn visible_transforms(
    geometry: WheelGeometry,
    scroll_offset: f32,
    count: usize,
    circular: bool,
) -> Vec<PlacedItem> {
    let engine = SnapEngine::new(geometry, count, circular);
    engine
        .visible_items(scroll_offset)
        .into_iter()
        .filter_map(|item| {
            let index = engine.index_at_position(item.position)?;
            let offset = item.center() - geometry.half_viewport();
            Some(PlacedItem {
                index,
                position: item.position,
                offset,
                transform: item_transform(offset, geometry.half_viewport()),
            })
        })
        .collect()
}
