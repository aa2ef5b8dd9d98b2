// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Shared data model for LogWatch: colors, styles, endpoints, action
//! state, the wire record taxonomy, the replay buffer, the two event
//! separators, and YAML configuration schema.
//!
//! This crate is deliberately synchronous and I/O-free. Everything here
//! is a value type or a small, single-threaded state machine; the async
//! orchestration lives in `logwatch-actions` and `logwatch-daemon`.

pub mod action;
pub mod clock;
pub mod color;
pub mod config;
pub mod endpoint;
pub mod key;
pub mod register;
pub mod replay;
pub mod separator;
pub mod style;
pub mod wire;

pub use action::{ActionRecord, ActionState, Precondition};
pub use clock::{Clock, SystemClock};
pub use color::Color;
pub use config::{Config, ConfigError, ServerConfig, ViewConfig};
pub use endpoint::{EndpointDescriptor, EndpointKind, EventSeparationRule, SeparatorMethod};
pub use key::Key;
pub use register::Register;
pub use replay::ReplayBuffer;
pub use separator::{ByBrackets, ByNewline, EventSeparator};
pub use style::{ColorPair, Style};
pub use wire::{ControlMessage, Fd, WireRecord};
