//! Host surface abstraction.
//!
//! The overlay never draws or hit-tests by itself. Everything it needs from
//! the host plotting toolkit goes through the [`Surface`] trait: view limits,
//! a color cycle, adding and removing simple artists, a legend, repaint
//! requests and event subscriptions.

mod memory;

pub use memory::{MemoryArtist, MemorySurface};

use kurbo::{BezPath, Point, Rect, Size};
use peniko::Color;
use uuid::Uuid;

use crate::style::StrokeStyle;

/// Stable identifier of an artist placed on a surface.
pub type ArtistId = Uuid;

/// Identifier of a host event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// An active host event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub kind: HostEventKind,
}

/// Current view limits in data coordinates.
///
/// Limits keep the axis' own orientation: an inverted y axis (as used for
/// images) has `y.0 > y.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    /// `(left, right)`.
    pub x: (f64, f64),
    /// `(bottom, top)`.
    pub y: (f64, f64),
}

impl ViewLimits {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self { x, y }
    }

    pub fn left(&self) -> f64 {
        self.x.0
    }

    pub fn right(&self) -> f64 {
        self.x.1
    }

    pub fn bottom(&self) -> f64 {
        self.y.0
    }

    pub fn top(&self) -> f64 {
        self.y.1
    }

    /// Absolute span in each dimension.
    pub fn span(&self) -> Size {
        Size::new((self.right() - self.left()).abs(), (self.top() - self.bottom()).abs())
    }

    /// Grow the limits so `point` is inside, preserving orientation.
    pub fn include(&mut self, point: Point) {
        fn grow(lim: &mut (f64, f64), v: f64) {
            if lim.0 <= lim.1 {
                lim.0 = lim.0.min(v);
                lim.1 = lim.1.max(v);
            } else {
                lim.0 = lim.0.max(v);
                lim.1 = lim.1.min(v);
            }
        }
        grow(&mut self.x, point.x);
        grow(&mut self.y, point.y);
    }
}

/// A filled, pickable rectangle.
#[derive(Debug, Clone)]
pub struct RectArtist {
    pub id: ArtistId,
    /// Origin corner `(x, y)`; the rectangle spans `origin + size`.
    pub origin: Point,
    pub size: Size,
    pub fill: Color,
    pub edge: Color,
    pub edge_width: f64,
    /// Pick radius in screen points; `None` means not pickable.
    pub pick_tolerance: Option<f64>,
}

impl RectArtist {
    /// The rectangle in data coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// An open or closed polyline.
#[derive(Debug, Clone)]
pub struct LineArtist {
    pub id: ArtistId,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f64,
    pub stroke: StrokeStyle,
}

impl LineArtist {
    /// Path through all points in order.
    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}

/// Build a polyline path through `points`.
pub fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
    path
}

/// One legend row: a color swatch and its label.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub artist: ArtistId,
    pub color: Color,
    pub label: String,
}

/// Legend description handed to the host.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub frame: bool,
}

/// Kinds of host notification the overlay listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    Pick,
    PointerMove,
    PointerRelease,
}

/// A host notification. `pointer` is `None` when the pointer is outside the
/// data area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Pick {
        artist: ArtistId,
        pointer: Option<Point>,
    },
    Motion {
        pointer: Option<Point>,
    },
    Release {
        pointer: Option<Point>,
    },
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::Pick { .. } => HostEventKind::Pick,
            HostEvent::Motion { .. } => HostEventKind::PointerMove,
            HostEvent::Release { .. } => HostEventKind::PointerRelease,
        }
    }
}

/// Trait for host plotting surfaces.
///
/// Implementations wrap whatever toolkit owns the figure. The surface is
/// shared: an overlay only touches the artists it added itself.
pub trait Surface {
    /// Current view limits.
    fn view_limits(&self) -> ViewLimits;

    /// Replace the view limits.
    fn set_view_limits(&mut self, limits: ViewLimits);

    /// Next color from the surface's color cycle.
    fn next_cycle_color(&mut self) -> Color;

    /// Add a rectangle artist.
    fn add_rect(&mut self, rect: RectArtist);

    /// Move an existing rectangle artist.
    fn set_rect_origin(&mut self, id: ArtistId, origin: Point);

    /// Add a line artist.
    fn add_line(&mut self, line: LineArtist);

    /// Remove an artist. Returns false if it was not present.
    fn remove_artist(&mut self, id: ArtistId) -> bool;

    /// Install or replace the legend.
    fn set_legend(&mut self, legend: Legend);

    /// Remove the legend.
    fn clear_legend(&mut self);

    /// Ask the host to repaint at its next opportunity.
    fn request_redraw(&mut self);

    /// Start routing a kind of host notification to the overlay.
    fn subscribe(&mut self, kind: HostEventKind) -> SubscriptionId;

    /// Stop routing a subscription.
    fn unsubscribe(&mut self, id: SubscriptionId);
}
