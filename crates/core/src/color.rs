// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! xterm-256 color values.
//!
//! A [`Color`] is either a palette index 0-255 or the `-1` sentinel
//! meaning "inherit/none". Config files may also name a color from the
//! palette below instead of spelling out the index.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An xterm-256 color index, or `-1` for "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(pub i16);

impl Color {
    pub const NONE: Color = Color(-1);
    pub const WHITE: Color = Color(231);
    pub const BLACK: Color = Color(16);

    pub fn is_none(self) -> bool {
        self.0 < 0
    }

    /// Resolve a color from a config value: a named palette entry, a
    /// decimal integer, or the `-1`/"none" fallback. Unknown names and
    /// unparseable integers both fall back to "none" rather than erroring,
    /// since a bad color in a style block shouldn't be fatal.
    pub fn resolve(name: &str) -> Color {
        if let Some(code) = named_color(name) {
            return Color(code);
        }
        match name.trim().parse::<i16>() {
            Ok(n) => Color(n),
            Err(_) => Color::NONE,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::NONE
    }
}

/// Config values may spell a color either as a bare xterm index
/// (`-1`, `231`) or as a palette name (`"green3"`, `"none"`); both
/// forms go through [`Color::resolve`] so the two are interchangeable.
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an xterm color index or a palette name")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Color, E> {
                Ok(Color(v as i16))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Color, E> {
                Ok(Color(v as i16))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                Ok(Color::resolve(v))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

/// Look up one of the named palette colors accepted in config files.
fn named_color(name: &str) -> Option<i16> {
    if name == "white" {
        return Some(231);
    }
    if name == "black" || name == "grey0" {
        return Some(16);
    }
    if name == "none" {
        return Some(-1);
    }
    if let Some(rest) = name.strip_prefix("grey") {
        let n: i16 = rest.parse().ok()?;
        if (1..=24).contains(&n) {
            return Some(231 + n);
        }
        return None;
    }
    for (prefix, ramp) in [
        ("red", RED_RAMP),
        ("yellow", YELLOW_RAMP),
        ("green", GREEN_RAMP),
        ("cyan", CYAN_RAMP),
        ("blue", BLUE_RAMP),
        ("magenta", MAGENTA_RAMP),
    ] {
        if let Some(rest) = name.strip_prefix(prefix) {
            let n: usize = rest.parse().ok()?;
            if (1..=9).contains(&n) {
                return Some(ramp[n - 1]);
            }
        }
    }
    None
}

const RED_RAMP: [i16; 9] = [
    16 + 1 * 36,
    16 + 2 * 36,
    16 + 3 * 36,
    16 + 4 * 36,
    16 + 5 * 36,
    16 + 5 * 36 + 1 * 6 + 1,
    16 + 5 * 36 + 2 * 6 + 2,
    16 + 5 * 36 + 3 * 6 + 3,
    16 + 5 * 36 + 4 * 6 + 4,
];
const YELLOW_RAMP: [i16; 9] = [
    16 + 1 * 36 + 1 * 6,
    16 + 2 * 36 + 2 * 6,
    16 + 3 * 36 + 3 * 6,
    16 + 4 * 36 + 4 * 6,
    16 + 5 * 36 + 5 * 6,
    16 + 5 * 36 + 5 * 6 + 1,
    16 + 5 * 36 + 5 * 6 + 2,
    16 + 5 * 36 + 5 * 6 + 3,
    16 + 5 * 36 + 5 * 6 + 4,
];
const GREEN_RAMP: [i16; 9] = [
    16 + 1 * 6,
    16 + 2 * 6,
    16 + 3 * 6,
    16 + 4 * 6,
    16 + 5 * 6,
    16 + 1 * 36 + 5 * 6 + 1,
    16 + 2 * 36 + 5 * 6 + 2,
    16 + 3 * 36 + 5 * 6 + 3,
    16 + 4 * 36 + 5 * 6 + 4,
];
const CYAN_RAMP: [i16; 9] = [
    16 + 1 * 6 + 1,
    16 + 2 * 6 + 2,
    16 + 3 * 6 + 3,
    16 + 4 * 6 + 4,
    16 + 5 * 6 + 5,
    16 + 1 * 36 + 5 * 6 + 5,
    16 + 2 * 36 + 5 * 6 + 5,
    16 + 3 * 36 + 5 * 6 + 5,
    16 + 4 * 36 + 5 * 6 + 5,
];
const BLUE_RAMP: [i16; 9] = [
    16 + 1,
    16 + 2,
    16 + 3,
    16 + 4,
    16 + 5,
    16 + 1 * 36 + 1 * 6 + 5,
    16 + 2 * 36 + 2 * 6 + 5,
    16 + 3 * 36 + 3 * 6 + 5,
    16 + 4 * 36 + 4 * 6 + 5,
];
const MAGENTA_RAMP: [i16; 9] = [
    16 + 1 * 36 + 1,
    16 + 2 * 36 + 2,
    16 + 3 * 36 + 3,
    16 + 4 * 36 + 4,
    16 + 5 * 36 + 5,
    16 + 5 * 36 + 1 * 6 + 5,
    16 + 5 * 36 + 2 * 6 + 5,
    16 + 5 * 36 + 3 * 6 + 5,
    16 + 5 * 36 + 4 * 6 + 5,
];

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
