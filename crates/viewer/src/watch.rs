// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Registered watch patterns: a regex tied to a register, optionally
//! rewriting the matched text before it's held or displayed.

use logwatch_core::Register;
use regex::Regex;

/// One registered watch. The raw pattern source is kept alongside the
/// compiled regex so a bad pattern can be reported without losing the
/// register's slot or panicking the viewer.
#[derive(Debug, Clone)]
pub struct Watch {
    pub register: Register,
    pub pattern: String,
    pub replacement: Option<String>,
    pub enabled: bool,
    compiled: Option<Regex>,
}

impl Watch {
    pub fn new(register: Register, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = Regex::new(&pattern).ok();
        Self { register, pattern, replacement: None, enabled: true, compiled }
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn matches(&self, line: &str) -> bool {
        self.enabled && self.compiled.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Apply `replacement`'s `\1`, `\2`, … backreferences against the
    /// first match in `line`, substituting the whole match if no
    /// replacement is set.
    pub fn apply(&self, line: &str) -> Option<String> {
        let re = self.compiled.as_ref()?;
        let captures = re.captures(line)?;
        let Some(template) = &self.replacement else {
            return Some(captures.get(0)?.as_str().to_string());
        };
        Some(substitute_backreferences(template, &captures))
    }
}

fn substitute_backreferences(template: &str, captures: &regex::Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if let Some(digit) = next.to_digit(10) {
                    chars.next();
                    if let Some(group) = captures.get(digit as usize) {
                        out.push_str(group.as_str());
                    }
                    continue;
                }
            }
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// First-registered, first-enabled-match-wins lookup across all watches.
pub fn first_match<'a>(watches: &'a [Watch], line: &str) -> Option<&'a Watch> {
    watches.iter().find(|watch| watch.matches(line))
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
