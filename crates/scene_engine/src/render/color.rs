//! Object color parsing
//!
//! Scene descriptions carry colors either as `#rrggbb` hex strings or as a
//! small set of named colors. Anything unrecognized falls back to gray so a
//! bad color never fails a load.

/// RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Default object color
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    /// Opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color string: `#rrggbb` hex or a known color name
    ///
    /// Unrecognized input yields [`Color::GRAY`].
    pub fn parse(input: &str) -> Self {
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex).unwrap_or(Self::GRAY);
        }
        Self::from_name(&input.to_ascii_lowercase()).unwrap_or(Self::GRAY)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "pink" => Self::rgb(255, 192, 203),
            "white" => Self::rgb(255, 255, 255),
            "black" => Self::rgb(0, 0, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "brown" => Self::rgb(165, 42, 42),
            "golden" => Self::rgb(255, 215, 0),
            "silver" => Self::rgb(192, 192, 192),
            "metal" => Self::rgb(169, 169, 169),
            "glass" => Self::rgba(173, 216, 230, 100),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GRAY
    }
}
