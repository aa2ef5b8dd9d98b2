// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The wire record taxonomy.
//!
//! Every record is NUL-terminated JSON, discriminated by `type`. This
//! module defines the Rust shapes; the NUL-delimited framing itself
//! lives in `logwatch-daemon::codec` since framing is an I/O concern.

use crate::action::ActionState;
use crate::register::Register;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fd {
    Stdout,
    Stderr,
    Stdin,
}

/// One endpoint's entry in a keepalive's `actions` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepaliveAction {
    pub register: Register,
    pub state: ActionState,
}

/// Server → viewer records, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WireRecord {
    Data {
        endpoint: String,
        source: String,
        fd: Fd,
        data: String,
        seq: u64,
        date: String,
        time: String,
    },
    Marker {
        name: String,
        date: String,
        time: String,
    },
    Keepalive {
        seq: u64,
        actions: HashMap<String, KeepaliveAction>,
    },
}

impl WireRecord {
    /// Whether this record belongs in the replay buffer. Keepalives are
    /// ephemeral liveness signals and are never retained.
    pub fn is_retained(&self) -> bool {
        !matches!(self, WireRecord::Keepalive { .. })
    }

    pub fn seq(&self) -> Option<u64> {
        match self {
            WireRecord::Data { seq, .. } | WireRecord::Keepalive { seq, .. } => Some(*seq),
            WireRecord::Marker { .. } => None,
        }
    }
}

/// Viewer → server control messages, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControlMessage {
    SetMarker {
        #[serde(default)]
        name: String,
    },
    GetLateJoinRecords,
    SendStdin {
        #[serde(rename = "endpoint-register")]
        endpoint_register: Register,
        data: String,
    },
    StopAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_record_round_trips_through_json() {
        let record = WireRecord::Data {
            endpoint: "Shell".into(),
            source: "Shell".into(),
            fd: Fd::Stdout,
            data: "hello".into(),
            seq: 42,
            date: "2026-08-01".into(),
            time: "10:00:00".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"data\""));
        let back: WireRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seq(), Some(42));
        assert!(back.is_retained());
    }

    #[test]
    fn keepalive_is_not_retained() {
        let record = WireRecord::Keepalive { seq: 3, actions: HashMap::new() };
        assert!(!record.is_retained());
    }

    #[test]
    fn control_message_send_stdin_parses() {
        let json = r#"{"type":"send-stdin","endpoint-register":"0","data":"ping"}"#;
        let msg: ControlMessage = serde_json::from_str(json).unwrap();
        match msg {
            ControlMessage::SendStdin { endpoint_register, data } => {
                assert_eq!(endpoint_register, Register('0'));
                assert_eq!(data, "ping");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn control_message_set_marker_defaults_empty_name() {
        let json = r#"{"type":"set-marker"}"#;
        let msg: ControlMessage = serde_json::from_str(json).unwrap();
        match msg {
            ControlMessage::SetMarker { name } => assert_eq!(name, ""),
            _ => panic!("wrong variant"),
        }
    }
}
