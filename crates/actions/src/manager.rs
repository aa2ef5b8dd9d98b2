// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The Action Manager: dependency-gated scheduling and the action state
//! machine.

use crate::endpoint::{ActionEndpoint, EndpointEvent, RunningAction};
use logwatch_core::{ActionState, EndpointDescriptor, Precondition};
use std::collections::HashMap;
use tokio::sync::mpsc;

struct ManagedAction {
    descriptor: EndpointDescriptor,
    state: ActionState,
    running: Option<RunningAction>,
}

/// One observation pulled off the events channel, tagged with the
/// action it came from, so callers (the Service Manager) can stamp and
/// broadcast it without the manager needing to know about the wire
/// format.
#[derive(Debug, Clone)]
pub struct ActionObservation {
    pub endpoint_name: String,
    pub event: EndpointEvent,
}

pub struct ActionManager {
    actions: HashMap<String, ManagedAction>,
    events_tx: mpsc::UnboundedSender<(String, EndpointEvent)>,
    events_rx: mpsc::UnboundedReceiver<(String, EndpointEvent)>,
}

impl ActionManager {
    pub fn new(descriptors: Vec<EndpointDescriptor>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let actions = descriptors
            .into_iter()
            .map(|descriptor| {
                (descriptor.name.clone(), ManagedAction { descriptor, state: ActionState::Awaiting, running: None })
            })
            .collect();
        Self { actions, events_tx, events_rx }
    }

    pub fn state_of(&self, name: &str) -> Option<ActionState> {
        self.actions.get(name).map(|a| a.state)
    }

    pub fn pid_of(&self, name: &str) -> Option<u32> {
        self.actions.get(name).and_then(|a| a.running.as_ref()).and_then(|r| r.pid())
    }

    pub fn states(&self) -> HashMap<String, ActionState> {
        self.actions.iter().map(|(name, a)| (name.clone(), a.state)).collect()
    }

    /// Send bytes to the named endpoint's stdin, if it's running.
    pub fn send(&self, name: &str, bytes: &[u8]) {
        if let Some(running) = self.actions.get(name).and_then(|a| a.running.as_ref()) {
            running.send(bytes);
        }
    }

    fn preconditions_met(&self, action: &ManagedAction) -> bool {
        action.descriptor.preconditions.iter().all(|(dep_name, precondition)| match precondition {
            Precondition::AwaitCompletion => {
                self.actions.get(dep_name).map(|dep| dep.state.satisfies_await_completion()).unwrap_or(false)
            }
        })
    }

    /// Drain completion/stream events that arrived since the last tick,
    /// returning them for the caller to stamp and broadcast.
    fn drain_events(&mut self) -> Vec<ActionObservation> {
        let mut observations = Vec::new();
        while let Ok((endpoint_name, event)) = self.events_rx.try_recv() {
            if let EndpointEvent::Completed { exit_code } = &event {
                if let Some(action) = self.actions.get_mut(&endpoint_name) {
                    action.state = if *exit_code == 0 { ActionState::Finished } else { ActionState::FinishedWithError };
                    action.running = None;
                }
            }
            observations.push(ActionObservation { endpoint_name, event });
        }
        observations
    }

    /// One scheduling tick: start any `awaiting` action whose
    /// preconditions are met, and fold in events observed since the
    /// last tick. Returns `(observations, more_work_remaining)`.
    pub async fn tick(&mut self) -> (Vec<ActionObservation>, bool) {
        let observations = self.drain_events();

        let ready: Vec<String> = self
            .actions
            .iter()
            .filter(|(_, action)| action.state == ActionState::Awaiting && self.preconditions_met(action))
            .map(|(name, _)| name.clone())
            .collect();

        for name in ready {
            self.start(&name).await;
        }

        let more_work = self.actions.values().any(|action| !action.state.is_terminal());
        (observations, more_work)
    }

    async fn start(&mut self, name: &str) {
        let Some(action) = self.actions.get_mut(name) else { return };
        let endpoint = ActionEndpoint::new(
            action.descriptor.name.clone(),
            action.descriptor.kind.clone(),
            action.descriptor.separation.clone(),
        );
        match endpoint.run(self.events_tx.clone()).await {
            Ok(running) => {
                action.state = ActionState::Running;
                action.running = Some(running);
            }
            Err(err) => {
                tracing::warn!(endpoint = name, %err, "endpoint launch failed");
                action.state = ActionState::FinishedWithError;
            }
        }
    }

    /// Drive every non-terminal action to terminal. `awaiting` actions
    /// are marked synthetically `finished` (never ran); `running`
    /// actions move to `terminating` and get their process group
    /// signalled.
    pub fn stop(&mut self) {
        for action in self.actions.values_mut() {
            match action.state {
                ActionState::Awaiting => action.state = ActionState::Finished,
                ActionState::Running => {
                    action.state = ActionState::Terminating;
                    if let Some(running) = &action.running {
                        running.stop();
                    }
                }
                ActionState::Finished | ActionState::FinishedWithError | ActionState::Terminating => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
