//! Colour type used by highlighters
//!
//! Colours are stored as 8-bit RGBA and persisted as `#AARRGGBB` strings.
//! Brightness adjustments go through HSV so that hue and saturation are
//! preserved while the value channel is scaled.

use std::fmt;

/// An RGBA colour
///
/// The default colour is fully transparent black. It doubles as the
/// "invalid" colour produced when a stored colour string cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque colour from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Colour from RGBA components
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether this is anything other than the invalid/default colour
    pub fn is_valid(&self) -> bool {
        *self != Self::default()
    }

    /// Parse `#RGB`, `#RRGGBB` or `#AARRGGBB`
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }

    /// Parse a stored colour, falling back to the invalid colour
    pub fn parse_or_default(text: &str) -> Self {
        Self::parse(text).unwrap_or_default()
    }

    /// Format as `#aarrggbb`
    pub fn to_hex_argb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }

    /// Darken by `factor` percent
    ///
    /// 100 returns the colour unchanged, 200 halves the value channel.
    /// Factors below 100 lighten instead. Non-positive factors are ignored.
    pub fn darker(&self, factor: i32) -> Self {
        if factor <= 0 {
            return *self;
        }
        if factor < 100 {
            return self.lighter(10_000 / factor);
        }

        let (h, s, v) = self.to_hsv();
        Self::from_hsv(h, s, v * 100.0 / f64::from(factor), self.a)
    }

    /// Lighten by `factor` percent
    ///
    /// A value channel pushed past the maximum bleeds into the saturation so
    /// very light colours still move towards white.
    pub fn lighter(&self, factor: i32) -> Self {
        if factor <= 0 {
            return *self;
        }
        if factor < 100 {
            return self.darker(10_000 / factor);
        }

        let (h, mut s, mut v) = self.to_hsv();
        v = v * f64::from(factor) / 100.0;
        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }
        Self::from_hsv(h, s, v, self.a)
    }

    /// Hue in degrees, saturation and value in `0.0..=1.0`
    fn to_hsv(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta / max } else { 0.0 };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        (h, s, max)
    }

    fn from_hsv(h: f64, s: f64, v: f64, a: u8) -> Self {
        let v = v.clamp(0.0, 1.0);
        let s = s.clamp(0.0, 1.0);
        let c = v * s;
        let hp = (h.rem_euclid(360.0)) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgba(channel(r), channel(g), channel(b), a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_argb())
    }
}

/// Foreground/background pair applied to a highlighted range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPair {
    pub fore: Color,
    pub back: Color,
}

impl ColorPair {
    pub const fn new(fore: Color, back: Color) -> Self {
        Self { fore, back }
    }
}
