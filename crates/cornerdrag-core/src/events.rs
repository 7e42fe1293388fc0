//! Handle events and the callback registry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use kurbo::Point;
use thiserror::Error;

use crate::corner::Corner;
use crate::surface::ArtistId;

/// Kind of handle event a callback can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A handle changed position.
    HandleMoved,
    /// A drag ended (or a reset moved the handle).
    HandleReleased,
}

impl EventKind {
    /// Canonical name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::HandleMoved => "handle_moved",
            EventKind::HandleReleased => "handle_released",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name an [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind: {0:?}")]
pub struct ParseEventKindError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "handle_moved" | "box_move_event" => Ok(EventKind::HandleMoved),
            "handle_released" | "box_release_event" => Ok(EventKind::HandleReleased),
            other => Err(ParseEventKindError(other.to_string())),
        }
    }
}

/// Payload delivered to callbacks.
///
/// Positions are handle rectangle origins, except for a release at the end
/// of a drag, which reports the pointer position. Origins include the
/// visibility offset, which depends on the axis orientation: on an upright
/// y axis the upper corners are shifted down by the handle height, on an
/// inverted (image) axis the lower ones are. Use
/// [`CornerOverlay::points`](crate::CornerOverlay::points) for true corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleEvent {
    Moved {
        corner: Corner,
        artist: ArtistId,
        from: Point,
        to: Point,
    },
    Released {
        corner: Corner,
        artist: ArtistId,
        position: Point,
    },
}

impl HandleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HandleEvent::Moved { .. } => EventKind::HandleMoved,
            HandleEvent::Released { .. } => EventKind::HandleReleased,
        }
    }

    pub fn corner(&self) -> Corner {
        match self {
            HandleEvent::Moved { corner, .. } | HandleEvent::Released { corner, .. } => *corner,
        }
    }

    pub fn artist(&self) -> ArtistId {
        match self {
            HandleEvent::Moved { artist, .. } | HandleEvent::Released { artist, .. } => *artist,
        }
    }
}

/// Identifier returned by `connect`. Never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boxed user callback.
pub type Callback = Box<dyn FnMut(&HandleEvent)>;

/// A registered listener.
pub(crate) enum Listener {
    /// Internal listener that redraws the outline on every move.
    RedrawOutline,
    /// User callback.
    Callback(Callback),
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::RedrawOutline => f.write_str("RedrawOutline"),
            Listener::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Ordered registry of listeners keyed by [`HandlerId`].
///
/// Ids are handed out in registration order and iteration follows them, so
/// callbacks for the same kind run in the order they were connected.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    next_id: u64,
    handlers: BTreeMap<HandlerId, (EventKind, Listener)>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, kind: EventKind, listener: Listener) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, (kind, listener));
        id
    }

    /// Register a callback for `kind`.
    pub fn connect(&mut self, kind: EventKind, callback: impl FnMut(&HandleEvent) + 'static) -> HandlerId {
        self.insert(kind, Listener::Callback(Box::new(callback)))
    }

    /// Remove a listener. Returns false if `id` was not registered.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    /// Registered ids for `kind`, in registration order.
    pub fn ids(&self, kind: EventKind) -> Vec<HandlerId> {
        self.handlers
            .iter()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every listener registered for the event's kind, in id order.
    ///
    /// `on_redraw` runs in place of the internal outline listener.
    pub(crate) fn emit(&mut self, event: &HandleEvent, mut on_redraw: impl FnMut()) {
        let kind = event.kind();
        for (k, listener) in self.handlers.values_mut() {
            if *k != kind {
                continue;
            }
            match listener {
                Listener::RedrawOutline => on_redraw(),
                Listener::Callback(cb) => cb(event),
            }
        }
    }
}
