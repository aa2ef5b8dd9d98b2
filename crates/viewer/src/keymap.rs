// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The interactive-mode command parser: a small prefix tree over key
//! events that accumulates an optional leading digit count, then
//! commits a [`Command`] once a full keystroke sequence is recognized.
//!
//! Multi-field prompts (setting a watch, typing stdin to send) are not
//! part of this tree — they're free-text entry driven separately once
//! a [`Command`] requests one.

use logwatch_core::{Key, Register};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowMode {
    None,
    Filtered,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    AnalysisPause,
    Resume,
    Quit,
    SetMarker,
    CreateWatch,
    EditWatch(Register),
    DisableWatch(Register),
    EnableWatch(Register),
    DeleteWatch(Register),
    SendStdin { stay_in_input_mode: bool },
    SetDefaultEndpoint(Register),
    SetShowMode(Register, ShowMode),
    InjectStdin { register: Register, stay_in_input_mode: bool },
    SetCommandRegister(Register),
    SendStoredCommand { register: Register, interactive: bool },
    ListCommandRegisters,
    ToggleGlobalFiltered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluated {
    pub command: Command,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    PendingA,
    PendingQuote,
    PendingQuoteRegister(Register),
    PendingAmp,
    PendingAmpRegister(Register),
    PendingDquote,
    PendingDquoteRegister(Register),
}

/// Drives one predicate-mode command parse. `<ESC>` or an unrecognized
/// key at the current node resets both the state and the digit buffer.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    state: StateHolder,
    count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StateHolder(State);

impl Default for StateHolder {
    fn default() -> Self {
        StateHolder(State::Root)
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.state = StateHolder::default();
        self.count = None;
    }

    fn commit(&mut self, command: Command) -> Option<Evaluated> {
        let count = self.count.take();
        self.state = StateHolder::default();
        Some(Evaluated { command, count })
    }

    /// Feed one key event. Returns `Some(Evaluated)` once a full command
    /// is recognized; `None` while the parse is still pending (including
    /// after a reset).
    pub fn feed(&mut self, key: Key) -> Option<Evaluated> {
        if matches!(key, Key::Esc) {
            self.reset();
            return None;
        }

        match self.state.0 {
            State::Root => self.feed_root(key),
            State::PendingA => self.feed_a(key),
            State::PendingQuote => self.feed_quote_register(key),
            State::PendingQuoteRegister(register) => self.feed_quote_action(register, key),
            State::PendingAmp => self.feed_amp_register(key),
            State::PendingAmpRegister(register) => self.feed_amp_action(register, key),
            State::PendingDquote => self.feed_dquote_register(key),
            State::PendingDquoteRegister(register) => self.feed_dquote_action(register, key),
        }
    }

    fn feed_root(&mut self, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        if let Some(digit) = c.to_digit(10) {
            if digit != 0 || self.count.is_some() {
                self.count = Some(self.count.unwrap_or(0) * 10 + digit);
                return None;
            }
        }
        match c {
            'p' => self.commit(Command::Pause),
            'a' => {
                self.state = StateHolder(State::PendingA);
                None
            }
            'r' => self.commit(Command::Resume),
            'q' => self.commit(Command::Quit),
            'm' => self.commit(Command::SetMarker),
            'w' => self.commit(Command::CreateWatch),
            'F' => self.commit(Command::ToggleGlobalFiltered),
            'i' => self.commit(Command::SendStdin { stay_in_input_mode: false }),
            'I' => self.commit(Command::SendStdin { stay_in_input_mode: true }),
            '\'' => {
                self.state = StateHolder(State::PendingQuote);
                None
            }
            '&' => {
                self.state = StateHolder(State::PendingAmp);
                None
            }
            '"' => {
                self.state = StateHolder(State::PendingDquote);
                None
            }
            _ => {
                self.reset();
                None
            }
        }
    }

    fn feed_a(&mut self, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        if c == 'p' {
            return self.commit(Command::AnalysisPause);
        }
        self.reset();
        None
    }

    fn feed_quote_register(&mut self, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        self.state = StateHolder(State::PendingQuoteRegister(Register(c)));
        None
    }

    fn feed_quote_action(&mut self, register: Register, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        match c {
            'w' => self.commit(Command::EditWatch(register)),
            'd' => self.commit(Command::DisableWatch(register)),
            'e' => self.commit(Command::EnableWatch(register)),
            'x' => self.commit(Command::DeleteWatch(register)),
            _ => {
                self.reset();
                None
            }
        }
    }

    fn feed_amp_register(&mut self, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        self.state = StateHolder(State::PendingAmpRegister(Register(c)));
        None
    }

    fn feed_amp_action(&mut self, register: Register, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        match c {
            'd' => self.commit(Command::SetDefaultEndpoint(register)),
            'n' => self.commit(Command::SetShowMode(register, ShowMode::None)),
            'f' => self.commit(Command::SetShowMode(register, ShowMode::Filtered)),
            'a' => self.commit(Command::SetShowMode(register, ShowMode::All)),
            'i' => self.commit(Command::InjectStdin { register, stay_in_input_mode: false }),
            'I' => self.commit(Command::InjectStdin { register, stay_in_input_mode: true }),
            _ => {
                self.reset();
                None
            }
        }
    }

    fn feed_dquote_register(&mut self, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        if c == '?' {
            return self.commit(Command::ListCommandRegisters);
        }
        self.state = StateHolder(State::PendingDquoteRegister(Register(c)));
        None
    }

    fn feed_dquote_action(&mut self, register: Register, key: Key) -> Option<Evaluated> {
        let Key::Char(c) = key else {
            self.reset();
            return None;
        };
        match c {
            's' => self.commit(Command::SetCommandRegister(register)),
            'i' => self.commit(Command::SendStoredCommand { register, interactive: true }),
            'r' => self.commit(Command::SendStoredCommand { register, interactive: false }),
            _ => {
                self.reset();
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "keymap_tests.rs"]
mod tests;
