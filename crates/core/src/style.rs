// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Per-stream-tag color styling with explicit fallback.
//!
//! Modeled as an explicit two-level map with one fallback function
//! (`Style::get`) rather than relying on missing-key dict lookups
//! scattered across every call site.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TAG: &str = "default";

/// A `(background, foreground)` color pair for one logical stream tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: Color,
    pub foreground: Color,
}

impl ColorPair {
    pub const RESET: ColorPair = ColorPair { background: Color::NONE, foreground: Color::WHITE };

    pub fn new(background: Color, foreground: Color) -> Self {
        Self { background, foreground }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        ColorPair::RESET
    }
}

/// A mapping from logical stream tag (`default`, `stdout`, `stderr`,
/// `stdin`, or any user tag) to a color pair, falling back to `default`
/// when a tag has no entry of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(flatten)]
    tags: HashMap<String, ColorPair>,
}

impl Style {
    pub fn new() -> Self {
        Self { tags: HashMap::new() }
    }

    pub fn set(&mut self, tag: impl Into<String>, pair: ColorPair) {
        self.tags.insert(tag.into(), pair);
    }

    /// Resolve the color pair for `tag`, falling back to the `default`
    /// entry, and finally to [`ColorPair::RESET`] if neither is present.
    pub fn get(&self, tag: &str) -> ColorPair {
        if let Some(pair) = self.tags.get(tag) {
            return *pair;
        }
        if let Some(pair) = self.tags.get(DEFAULT_TAG) {
            return *pair;
        }
        ColorPair::RESET
    }
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod tests;
