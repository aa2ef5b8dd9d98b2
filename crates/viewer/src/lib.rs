// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The LogWatch viewer: a TCP client, line-format template engine, watch
//! matching, a hold buffer for pause/resume, and the interactive-mode
//! keymap that drives all of it from a raw terminal.

pub mod client;
pub mod error;
pub mod hold_buffer;
pub mod keymap;
pub mod line_engine;
pub mod terminal;
pub mod watch;

pub use client::{connect_with_retry, spawn as spawn_client, ClientWriter};
pub use error::ViewerError;
pub use hold_buffer::{DropPolicy, HoldBuffer};
pub use keymap::{Command, Evaluated, Keymap, ShowMode};
pub use line_engine::{render, RenderContext, StyleBook, Template};
pub use terminal::{poll_key, RawTerminalGuard};
pub use watch::{first_match, Watch};
