//! In-memory surface implementation.

use super::{
    ArtistId, HostEventKind, Legend, LineArtist, RectArtist, Subscription, Surface,
    SubscriptionId, ViewLimits,
};
use kurbo::Point;
use peniko::Color;

/// Default ten-color plotting cycle.
const DEFAULT_CYCLE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// An artist held by a [`MemorySurface`].
#[derive(Debug, Clone)]
pub enum MemoryArtist {
    Rect(RectArtist),
    Line(LineArtist),
}

impl MemoryArtist {
    pub fn id(&self) -> ArtistId {
        match self {
            MemoryArtist::Rect(r) => r.id,
            MemoryArtist::Line(l) => l.id,
        }
    }
}

/// In-memory surface for testing and headless use.
///
/// Artists are kept in insertion order. With autoscale enabled every added
/// line grows the view limits to fit it, like an interactive plotting axis
/// does.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    limits: ViewLimits,
    autoscale: bool,
    artists: Vec<MemoryArtist>,
    legend: Option<Legend>,
    cycle_index: usize,
    redraws: usize,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl MemorySurface {
    /// Create a surface with the given view limits.
    pub fn new(limits: ViewLimits) -> Self {
        Self {
            limits,
            autoscale: false,
            artists: Vec::new(),
            legend: None,
            cycle_index: 0,
            redraws: 0,
            subscriptions: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Enable or disable autoscaling on line insertion.
    pub fn with_autoscale(mut self, autoscale: bool) -> Self {
        self.autoscale = autoscale;
        self
    }

    /// All artists in insertion order.
    pub fn artists(&self) -> &[MemoryArtist] {
        &self.artists
    }

    /// Look up an artist.
    pub fn artist(&self, id: ArtistId) -> Option<&MemoryArtist> {
        self.artists.iter().find(|a| a.id() == id)
    }

    /// Look up a rectangle artist.
    pub fn rect(&self, id: ArtistId) -> Option<&RectArtist> {
        match self.artist(id) {
            Some(MemoryArtist::Rect(r)) => Some(r),
            _ => None,
        }
    }

    /// Look up a line artist.
    pub fn line(&self, id: ArtistId) -> Option<&LineArtist> {
        match self.artist(id) {
            Some(MemoryArtist::Line(l)) => Some(l),
            _ => None,
        }
    }

    /// All line artists in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &LineArtist> {
        self.artists.iter().filter_map(|a| match a {
            MemoryArtist::Line(l) => Some(l),
            MemoryArtist::Rect(_) => None,
        })
    }

    /// The installed legend, if any.
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Number of repaint requests received so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Active subscriptions.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Whether any subscription for `kind` is active.
    pub fn is_subscribed(&self, kind: HostEventKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind == kind)
    }
}

impl Surface for MemorySurface {
    fn view_limits(&self) -> ViewLimits {
        self.limits
    }

    fn set_view_limits(&mut self, limits: ViewLimits) {
        self.limits = limits;
    }

    fn next_cycle_color(&mut self) -> Color {
        let (r, g, b) = DEFAULT_CYCLE[self.cycle_index % DEFAULT_CYCLE.len()];
        self.cycle_index += 1;
        Color::from_rgba8(r, g, b, 255)
    }

    fn add_rect(&mut self, rect: RectArtist) {
        self.artists.push(MemoryArtist::Rect(rect));
    }

    fn set_rect_origin(&mut self, id: ArtistId, origin: Point) {
        for artist in &mut self.artists {
            if let MemoryArtist::Rect(r) = artist {
                if r.id == id {
                    r.origin = origin;
                    return;
                }
            }
        }
    }

    fn add_line(&mut self, line: LineArtist) {
        if self.autoscale {
            for p in &line.points {
                self.limits.include(*p);
            }
        }
        self.artists.push(MemoryArtist::Line(line));
    }

    fn remove_artist(&mut self, id: ArtistId) -> bool {
        let before = self.artists.len();
        self.artists.retain(|a| a.id() != id);
        self.artists.len() != before
    }

    fn set_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    fn clear_legend(&mut self) {
        self.legend = None;
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn subscribe(&mut self, kind: HostEventKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription { id, kind });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != id);
    }
}
