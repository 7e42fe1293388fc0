//! cornerdrag core library
//!
//! A four-corner drag overlay for 2-D plotting surfaces. The host toolkit is
//! reached through the [`Surface`] trait; [`MemorySurface`] is an in-memory
//! implementation for tests and headless use.

pub mod corner;
pub mod events;
pub mod handle;
pub mod overlay;
pub mod style;
pub mod surface;

pub use corner::{Corner, Corners, ParseCornerError, OUTLINE_ORDER};
pub use events::{Callback, EventKind, HandleEvent, HandlerId, HandlerRegistry, ParseEventKindError};
pub use handle::Handle;
pub use overlay::CornerOverlay;
pub use style::{parse_color, ConfigError, OverlayConfig, SerializableColor, StrokeStyle};
pub use surface::{
    ArtistId, HostEvent, HostEventKind, Legend, LegendEntry, LineArtist, MemoryArtist,
    MemorySurface, RectArtist, Subscription, SubscriptionId, Surface, ViewLimits,
};
