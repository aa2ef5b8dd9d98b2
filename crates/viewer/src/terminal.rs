// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Raw-terminal setup and crossterm key-event translation into
//! [`Key`], the alphabet the interactive keymap is driven by.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use logwatch_core::Key;
use std::time::Duration;

/// Enables raw mode on construction, restores the terminal on drop
/// regardless of how the viewer exits (clean quit, error, panic unwind).
pub struct RawTerminalGuard;

impl RawTerminalGuard {
    pub fn enable() -> std::io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawTerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Poll for the next key event without blocking the UI loop longer than
/// `timeout`. `Ok(None)` means no key arrived in time.
pub fn poll_key(timeout: Duration) -> std::io::Result<Option<Key>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => Ok(translate(key_event)),
        _ => Ok(None),
    }
}

fn translate(event: KeyEvent) -> Option<Key> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = event.code {
            return Some(Key::Ctrl(c));
        }
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c) = event.code {
            return Some(Key::Alt(c));
        }
    }
    match event.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::F(n) => Some(Key::Function(n)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
