// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Compiled line format templates: `{format:endpoint|watch|default|reset[,plain]}`
//! style tags and `{fieldName:flags+width}` field tags, rendered against
//! a record's field map with xterm-256 ANSI escapes.

use crate::error::ViewerError;
use logwatch_core::{Color, ColorPair, Register, Style};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    Endpoint,
    Watch,
    Default,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct FieldFlags {
    pub superscript: bool,
    pub subscript: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub align: Option<Align>,
    pub zero_pad: bool,
    pub width: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum TemplateItem {
    Literal(String),
    Style { mode: StyleMode, plain: bool },
    Field { name: String, flags: FieldFlags },
}

#[derive(Debug, Clone, Default)]
pub struct Template {
    items: Vec<TemplateItem>,
}

fn parse_field_flags(spec: &str) -> FieldFlags {
    let mut flags = FieldFlags::default();
    let mut chars = spec.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '^' => flags.superscript = true,
            '_' => flags.subscript = true,
            'A' => flags.uppercase = true,
            'a' => flags.lowercase = true,
            '<' => flags.align = Some(Align::Left),
            '>' => flags.align = Some(Align::Right),
            '0' if flags.width.is_none() => flags.zero_pad = true,
            _ => break,
        }
        chars.next();
    }
    let rest: String = chars.collect();
    if !rest.is_empty() {
        flags.width = rest.parse().ok();
    }
    flags
}

fn parse_tag(tag: &str) -> Result<TemplateItem, ViewerError> {
    let (name, spec) = match tag.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (tag, None),
    };
    if name == "format" {
        let spec = spec.ok_or_else(|| ViewerError::Template(format!("{{format}} tag requires a parameter: {tag}")))?;
        let mut parts = spec.split(',');
        let mode = match parts.next() {
            Some("endpoint") => StyleMode::Endpoint,
            Some("watch") => StyleMode::Watch,
            Some("default") => StyleMode::Default,
            Some("reset") => StyleMode::Reset,
            other => return Err(ViewerError::Template(format!("unknown format mode: {other:?}"))),
        };
        let plain = parts.next() == Some("plain");
        return Ok(TemplateItem::Style { mode, plain });
    }
    let flags = spec.map(parse_field_flags).unwrap_or_default();
    Ok(TemplateItem::Field { name: name.to_string(), flags })
}

impl Template {
    /// A minimal template that just prints the `data` field, used as a
    /// fallback when a configured format string fails to compile.
    pub fn passthrough() -> Self {
        Self { items: vec![TemplateItem::Field { name: "data".to_string(), flags: FieldFlags::default() }] }
    }

    pub fn compile(source: &str) -> Result<Self, ViewerError> {
        let mut items = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                if !literal.is_empty() {
                    items.push(TemplateItem::Literal(std::mem::take(&mut literal)));
                }
                let mut tag = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    tag.push(c);
                }
                if !closed {
                    return Err(ViewerError::Template(format!("unterminated tag in template: {source}")));
                }
                items.push(parse_tag(&tag)?);
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            items.push(TemplateItem::Literal(literal));
        }
        Ok(Self { items })
    }
}

/// Per-endpoint and per-watch color styles, used to resolve a `{format:...}`
/// tag to a concrete [`ColorPair`].
#[derive(Debug, Clone, Default)]
pub struct StyleBook {
    pub endpoints: HashMap<String, Style>,
    pub watches: HashMap<Register, ColorPair>,
}

/// Everything the renderer needs to know about the record currently
/// being drawn beyond its raw field map.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub endpoint: Option<String>,
    pub fd: Option<String>,
    pub matched_watch: Option<Register>,
}

impl StyleBook {
    fn resolve(&self, mode: StyleMode, ctx: &RenderContext) -> ColorPair {
        match mode {
            StyleMode::Watch => ctx
                .matched_watch
                .and_then(|register| self.watches.get(&register).copied())
                .unwrap_or(ColorPair::RESET),
            StyleMode::Endpoint => {
                let (Some(endpoint), Some(fd)) = (&ctx.endpoint, &ctx.fd) else { return ColorPair::RESET };
                self.endpoints.get(endpoint).map(|style| style.get(fd)).unwrap_or(ColorPair::RESET)
            }
            StyleMode::Default => {
                if let Some(register) = ctx.matched_watch {
                    if let Some(pair) = self.watches.get(&register) {
                        return *pair;
                    }
                }
                self.resolve(StyleMode::Endpoint, ctx)
            }
            StyleMode::Reset => ColorPair::RESET,
        }
    }
}

fn ansi_for(pair: ColorPair) -> String {
    let fg = pair.foreground.0;
    match pair.background.0 {
        bg if bg < 0 => format!("\x1b[0;38;5;{fg}m"),
        bg => format!("\x1b[48;5;{bg};38;5;{fg}m"),
    }
}

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

fn transform_char(c: char, flags: &FieldFlags) -> char {
    if let Some(digit) = c.to_digit(10) {
        if flags.superscript {
            return SUPERSCRIPT_DIGITS[digit as usize];
        }
        if flags.subscript {
            return SUBSCRIPT_DIGITS[digit as usize];
        }
    }
    if flags.uppercase {
        return c.to_ascii_uppercase();
    }
    if flags.lowercase {
        return c.to_ascii_lowercase();
    }
    c
}

/// Strip `ESC[...m` sequences to measure the printable width of a field.
fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// After an embedded `ESC[0m`/`ESC[...;0m` reset inside field text,
/// re-emit `active` so the surrounding background/foreground continues.
fn reapply_style_after_resets(value: &str, active: &str) -> String {
    let reset_variants = ["\x1b[0m"];
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    'outer: loop {
        for marker in reset_variants {
            if let Some(pos) = rest.find(marker) {
                out.push_str(&rest[..pos + marker.len()]);
                out.push_str(active);
                rest = &rest[pos + marker.len()..];
                continue 'outer;
            }
        }
        out.push_str(rest);
        break;
    }
    out
}

fn pad(value: &str, flags: &FieldFlags) -> String {
    let Some(width) = flags.width else { return value.to_string() };
    let visible = visible_width(value);
    if visible >= width {
        return value.to_string();
    }
    let pad_len = width - visible;
    let align = flags.align.unwrap_or(Align::Right);
    let pad_char = if flags.zero_pad && align == Align::Right { '0' } else { ' ' };
    let padding: String = std::iter::repeat(pad_char).take(pad_len).collect();
    match align {
        Align::Left => format!("{value}{padding}"),
        Align::Right => format!("{padding}{value}"),
    }
}

/// Render one line against the compiled template, a flat field map, the
/// styles in effect, and per-record context (endpoint/fd/matched watch).
pub fn render(template: &Template, fields: &HashMap<String, String>, styles: &StyleBook, ctx: &RenderContext) -> String {
    let mut out = String::from("\x1b[0m");
    let mut active_pair = ColorPair::RESET;
    let mut active_code = ansi_for(active_pair);
    let mut plain = false;

    for item in &template.items {
        match item {
            TemplateItem::Literal(text) => out.push_str(text),
            TemplateItem::Style { mode, plain: is_plain } => {
                active_pair = styles.resolve(*mode, ctx);
                active_code = ansi_for(active_pair);
                plain = *is_plain;
                out.push_str(&active_code);
            }
            TemplateItem::Field { name, flags } => {
                let raw = fields.get(name).cloned().unwrap_or_default();
                let transformed: String = raw.chars().map(|c| transform_char(c, flags)).collect();
                let padded = pad(&transformed, flags);
                let value = if plain { strip_ansi(&padded) } else { reapply_style_after_resets(&padded, &active_code) };
                out.push_str(&value);
            }
        }
    }

    out.push_str("\x1b[K\x1b[0m");
    out
}

pub fn color_code(color: Color) -> String {
    color.0.to_string()
}

#[cfg(test)]
#[path = "line_engine_tests.rs"]
mod tests;
