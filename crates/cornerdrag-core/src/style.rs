//! Colors, stroke styles and overlay configuration.

use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn grey() -> Self {
        Self::new(128, 128, 128, 255)
    }

    /// Same color with its alpha scaled by `opacity` (0.0 - 1.0).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    /// Format as `#rrggbbaa`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_color(&s).ok_or_else(|| serde::de::Error::custom(ConfigError::InvalidColor(s)))
    }
}

/// Named colors accepted by [`parse_color`].
const NAMED_COLORS: &[(&str, SerializableColor)] = &[
    ("black", SerializableColor::new(0, 0, 0, 255)),
    ("white", SerializableColor::new(255, 255, 255, 255)),
    ("grey", SerializableColor::new(128, 128, 128, 255)),
    ("gray", SerializableColor::new(128, 128, 128, 255)),
    ("red", SerializableColor::new(255, 0, 0, 255)),
    ("green", SerializableColor::new(0, 128, 0, 255)),
    ("blue", SerializableColor::new(0, 0, 255, 255)),
    ("yellow", SerializableColor::new(255, 255, 0, 255)),
    ("cyan", SerializableColor::new(0, 255, 255, 255)),
    ("magenta", SerializableColor::new(255, 0, 255, 255)),
    ("orange", SerializableColor::new(255, 165, 0, 255)),
];

/// Parse a CSS-style color: a basic color name, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(color: &str) -> Option<SerializableColor> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        return Some(SerializableColor::new(channel(0)?, channel(2)?, channel(4)?, a));
    }
    let lower = color.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
}

/// Stroke style for the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    Solid,
    #[default]
    Dashed,
    Dotted,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Offset fraction must be in (0, 0.5), got {0}")]
    InvalidFraction(f64),
}

/// Appearance and behavior of a [`CornerOverlay`](crate::CornerOverlay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Install a legend mapping handle colors to corner labels.
    pub show_legend: bool,
    /// Outline color.
    pub outline_color: SerializableColor,
    /// Outline stroke style.
    pub outline_stroke: StrokeStyle,
    /// Outline opacity (0.0 - 1.0).
    pub outline_opacity: f64,
    /// Outline width.
    pub outline_width: f64,
    /// Handle fill opacity (0.0 - 1.0).
    pub handle_opacity: f64,
    /// Handle edge color.
    pub handle_edge_color: SerializableColor,
    /// Handle edge width.
    pub handle_edge_width: f64,
    /// Pick tolerance handed to the host, in screen points.
    pub pick_tolerance: f64,
    /// Handle size as a fraction of the axis span in each dimension.
    pub offset_fraction: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            outline_color: SerializableColor::grey(),
            outline_stroke: StrokeStyle::Dashed,
            outline_opacity: 0.8,
            outline_width: 1.5,
            handle_opacity: 0.4,
            handle_edge_color: SerializableColor::black(),
            handle_edge_width: 2.0,
            pick_tolerance: 5.0,
            offset_fraction: 0.05,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.offset_fraction > 0.0 && self.offset_fraction < 0.5) {
            return Err(ConfigError::InvalidFraction(self.offset_fraction));
        }
        Ok(())
    }

    /// Set whether the legend is shown.
    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Set the outline color.
    pub fn with_outline_color(mut self, color: SerializableColor) -> Self {
        self.outline_color = color;
        self
    }
}
