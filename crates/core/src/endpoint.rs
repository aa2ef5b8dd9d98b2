// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Endpoint descriptors: the configuration-time shape of a managed
//! action.

use crate::register::Register;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an endpoint's process is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EndpointKind {
    /// Shell-invoked local subprocess: `sh -c <command>`, not an
    /// argv-split exec, so shell operators in the command string work.
    Subprocess { command: String },
    /// Remote shell session: `ssh [-p port] [options...] user@host -- command`.
    Ssh {
        user: String,
        host: String,
        #[serde(default)]
        port: Option<u16>,
        #[serde(default)]
        options: Vec<String>,
        command: String,
    },
}

/// `AWAIT_COMPLETION` is the only precondition kind the spec defines;
/// modeled as an enum (rather than a bare string) so the gating logic in
/// the Action Manager can exhaustively match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precondition {
    AwaitCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorMethod {
    ByNewline,
    ByBrackets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSeparationRule {
    pub method: SeparatorMethod,
    #[serde(default)]
    pub trim: bool,
}

impl Default for EventSeparationRule {
    fn default() -> Self {
        Self { method: SeparatorMethod::ByNewline, trim: false }
    }
}

/// One entry of an `await:` list: `{completed: action-name}`. The only
/// shape the config format allows today, but modeled as its own type so
/// a second precondition kind doesn't require reshaping the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AwaitEntry {
    completed: String,
}

/// Serde sibling of [`EndpointDescriptor`] matching the document shape
/// on disk: preconditions are written as an `await:` list rather than
/// the `{name: precondition}` map the Action Manager wants, since a
/// list of `completed:` entries reads better alongside a single
/// endpoint than a map would.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEndpointDescriptor {
    #[serde(default)]
    register: Option<Register>,
    name: String,
    #[serde(flatten)]
    kind: EndpointKind,
    #[serde(default, rename = "event-separation")]
    separation: EventSeparationRule,
    #[serde(default)]
    r#await: Vec<AwaitEntry>,
}

/// `{register, name, kind, launch-parameters, event-separation-rule}`.
/// Endpoints without a user-visible register (the `actions:` config
/// list) are represented as descriptors with `register: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawEndpointDescriptor", into = "RawEndpointDescriptor")]
pub struct EndpointDescriptor {
    pub register: Option<Register>,
    pub name: String,
    pub kind: EndpointKind,
    pub separation: EventSeparationRule,
    /// `{action-name: AWAIT_COMPLETION}` preconditions, keyed by the
    /// action whose completion gates this one's start. Flattened in
    /// from the document's `await:` list at load time.
    pub preconditions: HashMap<String, Precondition>,
}

impl EndpointDescriptor {
    pub fn is_endpoint(&self) -> bool {
        self.register.is_some()
    }
}

impl From<RawEndpointDescriptor> for EndpointDescriptor {
    fn from(raw: RawEndpointDescriptor) -> Self {
        let preconditions =
            raw.r#await.into_iter().map(|entry| (entry.completed, Precondition::AwaitCompletion)).collect();
        Self { register: raw.register, name: raw.name, kind: raw.kind, separation: raw.separation, preconditions }
    }
}

impl From<EndpointDescriptor> for RawEndpointDescriptor {
    fn from(desc: EndpointDescriptor) -> Self {
        let r#await =
            desc.preconditions.into_iter().map(|(completed, Precondition::AwaitCompletion)| AwaitEntry { completed }).collect();
        Self { register: desc.register, name: desc.name, kind: desc.kind, separation: desc.separation, r#await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_subprocess_endpoint() {
        let yaml = r#"
register: "0"
name: Shell
type: subprocess
command: "echo hi"
await:
  - completed: setup
"#;
        let desc: EndpointDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert!(desc.is_endpoint());
        assert_eq!(desc.separation.method, SeparatorMethod::ByNewline);
        assert_eq!(desc.preconditions.get("setup"), Some(&Precondition::AwaitCompletion));
    }

    #[test]
    fn endpoint_without_await_has_no_preconditions() {
        let yaml = r#"
register: "0"
name: Shell
type: subprocess
command: "echo hi"
"#;
        let desc: EndpointDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert!(desc.preconditions.is_empty());
    }

    #[test]
    fn action_without_register_is_not_an_endpoint() {
        let desc = EndpointDescriptor {
            register: None,
            name: "setup".into(),
            kind: EndpointKind::Subprocess { command: "true".into() },
            separation: EventSeparationRule::default(),
            preconditions: HashMap::new(),
        };
        assert!(!desc.is_endpoint());
    }
}
