// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Stream-to-event separators.
//!
//! Each separator is per-action, per-fd stateful: partial input is
//! retained across `feed` calls until a boundary is observed. Neither
//! separator ever panics on malformed input — residue at end-of-stream
//! is simply left buffered rather than flushed as a synthetic event.

/// Converts raw byte arrivals into complete event strings.
pub trait EventSeparator: Send {
    /// Feed newly arrived bytes, invoking `emit` once per complete event
    /// boundary observed. Any bytes not yet forming a complete event stay
    /// buffered inside the separator.
    fn feed(&mut self, bytes: &[u8], emit: &mut dyn FnMut(&str));
}

/// Splits on `\n`, optionally trimming surrounding whitespace. EOF does
/// not flush the trailing residue.
#[derive(Debug, Default)]
pub struct ByNewline {
    trim: bool,
    buffer: String,
}

impl ByNewline {
    pub fn new(trim: bool) -> Self {
        Self { trim, buffer: String::new() }
    }
}

impl EventSeparator for ByNewline {
    fn feed(&mut self, bytes: &[u8], emit: &mut dyn FnMut(&str)) {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        loop {
            let Some(pos) = self.buffer.find('\n') else { break };
            let line: String = self.buffer.drain(..=pos).collect();
            let line = &line[..line.len() - 1]; // drop the '\n' itself
            if self.trim {
                emit(line.trim());
            } else {
                emit(line);
            }
        }
    }
}

/// Parses balanced `{ ... }` records, tracking quoting so that braces
/// inside `"`-quoted runs don't count toward nesting.
#[derive(Debug, Default)]
pub struct ByBrackets {
    trim: bool,
    buffer: String,
    nest_level: u32,
    quoting: bool,
    /// Byte offset into `buffer` already scanned without finding a
    /// complete record, so re-scans don't reprocess settled input.
    scanned: usize,
}

impl ByBrackets {
    pub fn new(trim: bool) -> Self {
        Self { trim, buffer: String::new(), nest_level: 0, quoting: false, scanned: 0 }
    }
}

impl EventSeparator for ByBrackets {
    fn feed(&mut self, bytes: &[u8], emit: &mut dyn FnMut(&str)) {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        loop {
            let mut nest = self.nest_level;
            let mut quoting = self.quoting;
            let mut close_at = None;

            for (offset, ch) in self.buffer[self.scanned..].char_indices() {
                let abs = self.scanned + offset;
                match ch {
                    '"' => quoting = !quoting,
                    '{' if !quoting => nest += 1,
                    '}' if !quoting => {
                        if nest > 0 {
                            nest -= 1;
                            if nest == 0 {
                                close_at = Some(abs);
                                break;
                            }
                        }
                    }
                    _ => {}
                }
            }

            match close_at {
                Some(close) => {
                    let record: String = self.buffer.drain(..=close).collect();
                    if self.trim {
                        emit(record.trim());
                    } else {
                        emit(&record);
                    }
                    self.nest_level = 0;
                    self.quoting = false;
                    self.scanned = 0;
                }
                None => {
                    self.nest_level = nest;
                    self.quoting = quoting;
                    self.scanned = self.buffer.len();
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "separator_tests.rs"]
mod tests;
