// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Service Manager: sequencing, marker naming, replay retention, and
//! fan-out to every connected bus client.
//!
//! Owns the single sequence counter, marker counter, and replay buffer
//! as typed [`WireRecord`]s, and fans broadcasts out over per-client
//! channels rather than looping a synchronous send per client.

use crate::codec::encode_frame;
use logwatch_actions::{ActionManager, ActionObservation, EndpointEvent};
use logwatch_core::{ActionState, Clock, KeepaliveAction, Register, ReplayBuffer, WireRecord};
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

pub struct ServiceManager<C: Clock> {
    actions: ActionManager,
    clock: C,
    replay: ReplayBuffer,
    seq: u64,
    keepalive_seq: u64,
    marker_no: u64,
    clients: HashMap<u64, UnboundedSender<Vec<u8>>>,
    registers: HashMap<Register, String>,
}

impl<C: Clock> ServiceManager<C> {
    pub fn new(actions: ActionManager, clock: C, replay_capacity: usize, registers: HashMap<Register, String>) -> Self {
        Self {
            actions,
            clock,
            replay: ReplayBuffer::new(replay_capacity),
            seq: 0,
            keepalive_seq: 0,
            marker_no: 0,
            clients: HashMap::new(),
            registers,
        }
    }

    pub fn register_client(&mut self, client_id: u64, outbound: UnboundedSender<Vec<u8>>) {
        self.clients.insert(client_id, outbound);
    }

    pub fn unregister_client(&mut self, client_id: u64) {
        self.clients.remove(&client_id);
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Keepalives tick on their own counter: they must never steal a
    /// slot from the data-record sequence, or a client observing only
    /// `data` records would see a gap where a keepalive snuck in.
    fn next_keepalive_seq(&mut self) -> u64 {
        let seq = self.keepalive_seq;
        self.keepalive_seq += 1;
        seq
    }

    /// Append `record` to the replay buffer (unless it's a keepalive)
    /// and push its encoded frame to every connected client. A send
    /// failure on one client only drops that client's queue entry; the
    /// channel itself stays registered until the bus notices the reader
    /// side closed and calls `unregister_client`.
    fn broadcast(&mut self, record: WireRecord) {
        if record.is_retained() {
            self.replay.push(record.clone());
        }
        let frame = match encode_frame(&record) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(%err, "failed to encode outgoing record");
                return;
            }
        };
        self.clients.retain(|_, outbound| outbound.send(frame.clone()).is_ok());
    }

    pub fn broadcast_data(&mut self, endpoint: String, fd: logwatch_core::Fd, data: String) {
        let seq = self.next_seq();
        let record = WireRecord::Data {
            source: endpoint.clone(),
            endpoint,
            fd,
            data,
            seq,
            date: self.clock.date(),
            time: self.clock.time(),
        };
        self.broadcast(record);
    }

    pub fn set_marker(&mut self, name: Option<String>) {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                self.marker_no += 1;
                format!("MARKER {}", self.marker_no)
            }
        };
        let record = WireRecord::Marker { name, date: self.clock.date(), time: self.clock.time() };
        self.broadcast(record);
    }

    pub fn broadcast_keepalive(&mut self) {
        let seq = self.next_keepalive_seq();
        let actions = self
            .actions
            .states()
            .into_iter()
            .map(|(name, state)| {
                let register = self.registers.iter().find(|(_, n)| **n == name).map(|(r, _)| *r).unwrap_or(Register('?'));
                (name, KeepaliveAction { register, state })
            })
            .collect();
        let record = WireRecord::Keepalive { seq, actions };
        // Keepalives aren't retained, but they still go out over every
        // client's outbound queue via the same broadcast path.
        self.broadcast(record);
    }

    /// Replay the buffer to one client (late-join request).
    pub fn send_late_join(&self, client_id: u64) {
        let Some(outbound) = self.clients.get(&client_id) else { return };
        for record in self.replay.iter() {
            match encode_frame(record) {
                Ok(frame) => {
                    let _ = outbound.send(frame);
                }
                Err(err) => tracing::error!(%err, "failed to encode replay record"),
            }
        }
    }

    pub fn send_stdin(&self, register: Register, data: String) {
        let Some(name) = self.registers.get(&register) else {
            tracing::debug!(?register, "send-stdin for unknown register, ignoring");
            return;
        };
        let mut payload = data.into_bytes();
        payload.push(b'\n');
        self.actions.send(name, &payload);
    }

    pub fn stop_all(&mut self) {
        self.actions.stop();
    }

    /// One scheduling tick: advance the action state machine and
    /// broadcast whatever stream events it produced. Returns whether
    /// any action is still non-terminal.
    pub async fn tick(&mut self) -> bool {
        let (observations, more_work) = self.actions.tick().await;
        for ActionObservation { endpoint_name, event } in observations {
            if let EndpointEvent::Event { fd, data } = event {
                self.broadcast_data(endpoint_name, fd, data);
            }
        }
        more_work
    }

    pub fn action_states(&self) -> HashMap<String, ActionState> {
        self.actions.states()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
