//! Corner handles.

use kurbo::{Point, Size, Vec2};
use peniko::Color;
use uuid::Uuid;

use crate::corner::Corner;
use crate::style::{OverlayConfig, SerializableColor};
use crate::surface::{ArtistId, RectArtist, ViewLimits};

/// A draggable rectangle marking one corner of the overlay.
///
/// The rectangle's origin is the true corner shifted by `offset`, so the
/// whole rectangle sits inside the view at its corner.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Which corner this handle marks.
    pub corner: Corner,
    /// Stable artist identifier on the surface.
    pub id: ArtistId,
    /// Current rectangle origin in data coordinates.
    pub origin: Point,
    /// Rectangle origin at construction, restored by reset.
    pub initial_origin: Point,
    /// Shift from the true corner to the rectangle origin.
    pub offset: Vec2,
    /// Rectangle size.
    pub size: Size,
    /// Fill color drawn from the surface's color cycle (opaque).
    pub color: Color,
}

impl Handle {
    /// Create the handle for `corner` of `limits`.
    pub fn new(corner: Corner, limits: &ViewLimits, fraction: f64, color: Color) -> Self {
        let span = limits.span();
        let size = Size::new(span.width * fraction, span.height * fraction);
        let offset = corner_offset(corner, limits, size);
        let origin = corner_point(corner, limits) + offset;
        Self {
            corner,
            id: Uuid::new_v4(),
            origin,
            initial_origin: origin,
            offset,
            size,
            color,
        }
    }

    /// Corner position with the visibility offset removed.
    pub fn true_corner(&self) -> Point {
        self.origin - self.offset
    }

    /// Whether the handle has moved away from its initial origin.
    pub fn is_displaced(&self) -> bool {
        self.origin != self.initial_origin
    }

    /// Surface artist describing this handle.
    pub fn to_artist(&self, config: &OverlayConfig) -> RectArtist {
        let fill = SerializableColor::from(self.color).with_opacity(config.handle_opacity);
        RectArtist {
            id: self.id,
            origin: self.origin,
            size: self.size,
            fill: fill.into(),
            edge: config.handle_edge_color.into(),
            edge_width: config.handle_edge_width,
            pick_tolerance: Some(config.pick_tolerance),
        }
    }
}

/// Corner position of the view limits.
pub fn corner_point(corner: Corner, limits: &ViewLimits) -> Point {
    let x = if corner.is_left() { limits.left() } else { limits.right() };
    let y = if corner.is_upper() { limits.top() } else { limits.bottom() };
    Point::new(x, y)
}

/// Shift applied to a corner so a rectangle of `size` stays visible.
///
/// A rectangle grows towards larger coordinates from its origin, so a corner
/// sitting on the larger limit of an axis is shifted back by the size. For an
/// image axis (y inverted) that means right and lower corners.
pub fn corner_offset(corner: Corner, limits: &ViewLimits, size: Size) -> Vec2 {
    let p = corner_point(corner, limits);
    let dx = if p.x < limits.left().max(limits.right()) { 0.0 } else { -size.width };
    let dy = if p.y < limits.bottom().max(limits.top()) { 0.0 } else { -size.height };
    Vec2::new(dx, dy)
}
