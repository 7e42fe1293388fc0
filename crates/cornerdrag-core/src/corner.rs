//! Corner labels and corner-indexed storage.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

/// One of the four fixed corners of the overlay.
///
/// The declaration order is the label order used for iteration, reset and
/// the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpperLeft,
    LowerLeft,
    UpperRight,
    LowerRight,
}

/// Order in which the outline visits the corners (closed loop).
pub const OUTLINE_ORDER: [Corner; 5] = [
    Corner::UpperLeft,
    Corner::LowerLeft,
    Corner::LowerRight,
    Corner::UpperRight,
    Corner::UpperLeft,
];

impl Corner {
    /// All corners in label order.
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::LowerLeft,
        Corner::UpperRight,
        Corner::LowerRight,
    ];

    /// Position of this corner in label order.
    pub const fn index(self) -> usize {
        match self {
            Corner::UpperLeft => 0,
            Corner::LowerLeft => 1,
            Corner::UpperRight => 2,
            Corner::LowerRight => 3,
        }
    }

    /// Human readable label, also used as the legend text.
    pub const fn label(self) -> &'static str {
        match self {
            Corner::UpperLeft => "upper left",
            Corner::LowerLeft => "lower left",
            Corner::UpperRight => "upper right",
            Corner::LowerRight => "lower right",
        }
    }

    /// Whether the corner lies on the left edge.
    pub const fn is_left(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::LowerLeft)
    }

    /// Whether the corner lies on the upper edge.
    pub const fn is_upper(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::UpperRight)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a corner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown corner label: {0:?}")]
pub struct ParseCornerError(pub String);

impl FromStr for Corner {
    type Err = ParseCornerError;

    /// Accepts the display label ("upper left") as well as the
    /// underscore/hyphen spellings ("upper_left", "upper-left").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Corner::ALL
            .into_iter()
            .find(|c| c.label() == normalized)
            .ok_or_else(|| ParseCornerError(s.to_string()))
    }
}

/// Fixed-size storage with one value per corner, indexed by [`Corner`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners<T>([T; 4]);

impl<T> Corners<T> {
    /// Build from values given in label order.
    pub const fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    /// Build by evaluating `f` for each corner in label order.
    pub fn from_fn(mut f: impl FnMut(Corner) -> T) -> Self {
        Self(Corner::ALL.map(&mut f))
    }

    /// Iterate `(corner, value)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Corner, &T)> {
        Corner::ALL.into_iter().zip(self.0.iter())
    }

    /// Map each value, keeping the corner association.
    pub fn map<U>(&self, mut f: impl FnMut(Corner, &T) -> U) -> Corners<U> {
        Corners::from_fn(|c| f(c, &self.0[c.index()]))
    }

    /// Values in label order.
    pub fn values(&self) -> &[T; 4] {
        &self.0
    }
}

impl<T> Index<Corner> for Corners<T> {
    type Output = T;

    fn index(&self, corner: Corner) -> &T {
        &self.0[corner.index()]
    }
}

impl<T> IndexMut<Corner> for Corners<T> {
    fn index_mut(&mut self, corner: Corner) -> &mut T {
        &mut self.0[corner.index()]
    }
}

/// Serialized as a map keyed by corner label, in label order.
impl<T: Serialize> Serialize for Corners<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (corner, value) in self.iter() {
            map.serialize_entry(corner.label(), value)?;
        }
        map.end()
    }
}
