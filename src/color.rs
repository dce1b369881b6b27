//! CSS-style color value type used for series palettes and fill resolution.
//!
//! Parsing is deliberately tolerant: unknown strings fall back to opaque
//! black rather than failing, matching the engine's policy of never aborting
//! a render over bad presentation input.

use serde::{Deserialize, Serialize};

/// RGBA color with `r`/`g`/`b` in `0..=255` and `a` in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Small named-color table; enough for the palette strings hosts actually use.
const NAMED_COLORS: &[(&str, [f64; 3])] = &[
    ("aqua", [0.0, 255.0, 255.0]),
    ("black", [0.0, 0.0, 0.0]),
    ("blue", [0.0, 0.0, 255.0]),
    ("brown", [165.0, 42.0, 42.0]),
    ("cyan", [0.0, 255.0, 255.0]),
    ("darkblue", [0.0, 0.0, 139.0]),
    ("darkgreen", [0.0, 100.0, 0.0]),
    ("darkgrey", [169.0, 169.0, 169.0]),
    ("darkorange", [255.0, 140.0, 0.0]),
    ("darkred", [139.0, 0.0, 0.0]),
    ("fuchsia", [255.0, 0.0, 255.0]),
    ("gold", [255.0, 215.0, 0.0]),
    ("green", [0.0, 128.0, 0.0]),
    ("lightblue", [173.0, 216.0, 230.0]),
    ("lightgreen", [144.0, 238.0, 144.0]),
    ("lightgrey", [211.0, 211.0, 211.0]),
    ("lime", [0.0, 255.0, 0.0]),
    ("magenta", [255.0, 0.0, 255.0]),
    ("maroon", [128.0, 0.0, 0.0]),
    ("navy", [0.0, 0.0, 128.0]),
    ("olive", [128.0, 128.0, 0.0]),
    ("orange", [255.0, 165.0, 0.0]),
    ("pink", [255.0, 192.0, 203.0]),
    ("purple", [128.0, 0.0, 128.0]),
    ("red", [255.0, 0.0, 0.0]),
    ("silver", [192.0, 192.0, 192.0]),
    ("violet", [128.0, 0.0, 128.0]),
    ("white", [255.0, 255.0, 255.0]),
    ("yellow", [255.0, 255.0, 0.0]),
];

impl Rgba {
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }.normalize()
    }

    #[must_use]
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parses a CSS color string.
    ///
    /// Supported forms: `#rrggbb`, `#rgb`, `rgb(r,g,b)`, `rgba(r,g,b,a)`,
    /// `rgb(r%,g%,b%)`, a named color, or `transparent`. Anything else
    /// parses as opaque black.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if let Some(color) = parse_hex(hex) {
                return color;
            }
        }

        if let Some(body) = strip_call(trimmed, "rgba") {
            if let Some(color) = parse_rgba_body(body) {
                return color;
            }
        }

        if let Some(body) = strip_call(trimmed, "rgb") {
            if let Some(color) = parse_rgb_body(body) {
                return color;
            }
        }

        let name = trimmed.to_ascii_lowercase();
        if name == "transparent" {
            return Self::new(255.0, 255.0, 255.0, 0.0);
        }
        for (candidate, [r, g, b]) in NAMED_COLORS {
            if *candidate == name {
                return Self::opaque(*r, *g, *b);
            }
        }

        Self::opaque(0.0, 0.0, 0.0)
    }

    /// Adds `value` to each channel named in `channels` (`r`, `g`, `b`, `a`).
    #[must_use]
    pub fn add(mut self, channels: &str, value: f64) -> Self {
        for channel in channels.chars() {
            *self.channel_mut(channel) += value;
        }
        self.normalize()
    }

    /// Multiplies each channel named in `channels` by `value`.
    #[must_use]
    pub fn scale(mut self, channels: &str, value: f64) -> Self {
        for channel in channels.chars() {
            *self.channel_mut(channel) *= value;
        }
        self.normalize()
    }

    /// Returns a copy with the alpha channel replaced (then normalized).
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.a = alpha;
        self.normalize()
    }

    /// Clamps `r`/`g`/`b` to integral `0..=255` and `a` to `0..=1`.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.r = clamp_channel(self.r);
        self.g = clamp_channel(self.g);
        self.b = clamp_channel(self.b);
        self.a = if self.a.is_nan() {
            1.0
        } else {
            self.a.clamp(0.0, 1.0)
        };
        self
    }

    /// Serializes back to a CSS color string.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }

    fn channel_mut(&mut self, channel: char) -> &mut f64 {
        match channel {
            'r' => &mut self.r,
            'g' => &mut self.g,
            'b' => &mut self.b,
            _ => &mut self.a,
        }
    }
}

fn clamp_channel(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.trunc().clamp(0.0, 255.0)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let digits: Vec<u32> = hex.chars().map_while(|c| c.to_digit(16)).collect();
    match digits.len() {
        6 => Some(Rgba::opaque(
            f64::from(digits[0] * 16 + digits[1]),
            f64::from(digits[2] * 16 + digits[3]),
            f64::from(digits[4] * 16 + digits[5]),
        )),
        3 => Some(Rgba::opaque(
            f64::from(digits[0] * 17),
            f64::from(digits[1] * 17),
            f64::from(digits[2] * 17),
        )),
        _ => None,
    }
}

fn strip_call<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(name)?.trim_start();
    rest.strip_prefix('(')?.trim_end().strip_suffix(')')
}

fn parse_components(body: &str) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    for part in body.split(',') {
        let part = part.trim();
        if let Some(percent) = part.strip_suffix('%') {
            values.push(percent.trim().parse::<f64>().ok()? * 2.55);
        } else {
            values.push(part.parse::<f64>().ok()?);
        }
    }
    Some(values)
}

fn parse_rgb_body(body: &str) -> Option<Rgba> {
    let values = parse_components(body)?;
    if values.len() != 3 {
        return None;
    }
    Some(Rgba::opaque(values[0], values[1], values[2]))
}

fn parse_rgba_body(body: &str) -> Option<Rgba> {
    let values = parse_components(body)?;
    if values.len() != 4 {
        return None;
    }
    Some(Rgba::new(values[0], values[1], values[2], values[3]))
}
