// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The action state machine.

use crate::register::Register;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use crate::endpoint::Precondition;

/// `awaiting | running | finished | finished-with-error | terminating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionState {
    Awaiting,
    Running,
    Finished,
    FinishedWithError,
    Terminating,
}

impl ActionState {
    /// An action in this state will never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ActionState::Finished | ActionState::FinishedWithError)
    }

    /// Whether a dependent gated on `AWAIT_COMPLETION` of an action in
    /// this state may start. Only a clean `finished` unblocks a
    /// dependent — `finished-with-error` blocks it for the rest of the
    /// run.
    pub fn satisfies_await_completion(self) -> bool {
        matches!(self, ActionState::Finished)
    }
}

/// Internal bookkeeping record for one managed action. The live process
/// handle and its completion plumbing live alongside it in
/// `logwatch-actions`; this type carries only the state-machine data
/// that needs to be serialized into a keepalive or inspected by tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub endpoint_name: String,
    pub register: Option<Register>,
    pub command_line: String,
    pub preconditions: HashMap<String, Precondition>,
    pub state: ActionState,
    pub pid: Option<u32>,
}

impl ActionRecord {
    pub fn new(endpoint_name: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            register: None,
            command_line: command_line.into(),
            preconditions: HashMap::new(),
            state: ActionState::Awaiting,
            pid: None,
        }
    }
}
