// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The live, running side of an [`EndpointDescriptor`].
//!
//! Spawns through a `tokio::process::Command` builder with a detached
//! reaper task that waits on the child and logs its exit. The child is
//! placed in its own process group at spawn time so that `stop()` can
//! signal the whole group (`killpg`) rather than a single pid, which
//! would leave a re-exec'd shell's grandchildren running.

use crate::error::EndpointError;
use logwatch_core::{ByBrackets, ByNewline, EndpointKind, EventSeparationRule, EventSeparator, Fd, SeparatorMethod};
use parking_lot::Mutex;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;

/// Emitted by a running endpoint: a parsed stream event, or the
/// terminal exit-code notification fired exactly once.
#[derive(Debug, Clone)]
pub enum EndpointEvent {
    Event { fd: Fd, data: String },
    Completed { exit_code: i32 },
}

fn make_separator(rule: &EventSeparationRule) -> Box<dyn EventSeparator> {
    match rule.method {
        SeparatorMethod::ByNewline => Box::new(ByNewline::new(rule.trim)),
        SeparatorMethod::ByBrackets => Box::new(ByBrackets::new(rule.trim)),
    }
}

fn build_command(kind: &EndpointKind) -> (Command, String) {
    match kind {
        EndpointKind::Subprocess { command } => {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            (cmd, command.clone())
        }
        EndpointKind::Ssh { user, host, port, options, command } => {
            let mut cmd = Command::new("ssh");
            if let Some(port) = port {
                cmd.arg("-p").arg(port.to_string());
            }
            for option in options {
                cmd.arg(option);
            }
            cmd.arg(format!("{user}@{host}")).arg("--").arg(command);
            let line = format!("ssh {user}@{host} -- {command}");
            (cmd, line)
        }
    }
}

struct Shared {
    name: String,
    pid: Mutex<Option<u32>>,
    active: AtomicBool,
    /// `None` once the child has exited and the writer task has been
    /// told to stop; cleared rather than left dangling so the stdin
    /// writer's `rx.recv()` observes the channel closing instead of
    /// blocking forever on a process that will never read again.
    stdin_tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    stdin_separator: Mutex<Box<dyn EventSeparator>>,
    events_tx: mpsc::UnboundedSender<EndpointEvent>,
}

/// Handle to a launched endpoint: everything the Action Manager needs
/// after `run()` succeeds.
#[derive(Clone)]
pub struct RunningAction {
    shared: Arc<Shared>,
}

impl RunningAction {
    pub fn pid(&self) -> Option<u32> {
        *self.shared.pid.lock()
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Enqueue bytes for the child's stdin, and emit a synthetic
    /// `fd=stdin` event through the separator so viewers see their own
    /// injections echoed back.
    pub fn send(&self, bytes: &[u8]) {
        let sent = match self.shared.stdin_tx.lock().as_ref() {
            Some(tx) => tx.send(bytes.to_vec()).is_ok(),
            None => false,
        };
        if !sent {
            tracing::debug!(endpoint = %self.shared.name, "stdin queue has no receiver, dropping injection");
            return;
        }
        let mut separator = self.shared.stdin_separator.lock();
        separator.feed(bytes, &mut |event| {
            let _ = self.shared.events_tx.send(EndpointEvent::Event { fd: Fd::Stdin, data: event.to_string() });
        });
    }

    /// Signal the entire process group, not just the leader, to defeat
    /// shells that re-exec into something untraceable by pid. Errors
    /// (process already gone) are swallowed.
    pub fn stop(&self) {
        let Some(pid) = self.pid() else { return };
        let pgid = nix::unistd::Pid::from_raw(pid as i32);
        if let Err(err) = nix::sys::signal::killpg(pgid, nix::sys::signal::Signal::SIGTERM) {
            tracing::debug!(endpoint = %self.shared.name, %err, "signal delivery race, process already gone");
        }
    }
}

/// The not-yet-launched side of an endpoint: what the config loader
/// hands the Action Manager before `run()`.
pub struct ActionEndpoint {
    pub name: String,
    pub kind: EndpointKind,
    pub separation: EventSeparationRule,
}

impl ActionEndpoint {
    pub fn new(name: impl Into<String>, kind: EndpointKind, separation: EventSeparationRule) -> Self {
        Self { name: name.into(), kind, separation }
    }

    /// Launch the process and spin up its stream workers. Returns once
    /// the child is spawned; stream workers and the completion
    /// notification run in a detached task.
    pub async fn run(self, events_tx: mpsc::UnboundedSender<EndpointEvent>) -> Result<RunningAction, EndpointError> {
        let (mut command, command_line) = build_command(&self.kind);
        command.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|source| EndpointError::Spawn { name: self.name.clone(), source })?;
        let pid = child.id();
        tracing::info!(endpoint = %self.name, command = %command_line, ?pid, "endpoint launched");

        let stdout =
            child.stdout.take().ok_or_else(|| EndpointError::MissingPipe { name: self.name.clone(), stream: "stdout" })?;
        let stderr =
            child.stderr.take().ok_or_else(|| EndpointError::MissingPipe { name: self.name.clone(), stream: "stderr" })?;
        let stdin =
            child.stdin.take().ok_or_else(|| EndpointError::MissingPipe { name: self.name.clone(), stream: "stdin" })?;

        let (stdin_tx, stdin_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let shared = Arc::new(Shared {
            name: self.name.clone(),
            pid: Mutex::new(pid),
            active: AtomicBool::new(true),
            stdin_tx: Mutex::new(Some(stdin_tx)),
            stdin_separator: Mutex::new(make_separator(&self.separation)),
            events_tx: events_tx.clone(),
        });

        let name = self.name.clone();
        let out_rule = self.separation.clone();
        let err_rule = self.separation.clone();
        let active = shared.clone();

        tokio::spawn(async move {
            let out_tx = events_tx.clone();
            let err_tx = events_tx.clone();
            let stdout_task = read_stream(name.clone(), Fd::Stdout, stdout, make_separator(&out_rule), out_tx);
            let stderr_task = read_stream(name.clone(), Fd::Stderr, stderr, make_separator(&err_rule), err_tx);
            let stdin_handle = tokio::spawn(write_stdin(stdin, stdin_rx));
            let (_, _, wait_result) = tokio::join!(stdout_task, stderr_task, child.wait());

            // The child is gone; drop the stdin sender so the writer
            // task's `rx.recv()` sees the channel close instead of
            // waiting forever for an injection that will never come,
            // then join it before the completion callback fires.
            active.stdin_tx.lock().take();
            if let Err(err) = stdin_handle.await {
                tracing::debug!(endpoint = %name, %err, "stdin writer task panicked");
            }

            let exit_code = match wait_result {
                Ok(status) => status.code().unwrap_or(-1),
                Err(err) => {
                    tracing::warn!(endpoint = %name, %err, "failed to observe child exit status");
                    -1
                }
            };
            active.active.store(false, Ordering::SeqCst);
            let _ = events_tx.send(EndpointEvent::Completed { exit_code });
        });

        Ok(RunningAction { shared })
    }
}

async fn read_stream<R>(
    name: String,
    fd: Fd,
    mut reader: R,
    mut separator: Box<dyn EventSeparator>,
    events_tx: mpsc::UnboundedSender<EndpointEvent>,
) where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                separator.feed(&buf[..n], &mut |event| {
                    let _ = events_tx.send(EndpointEvent::Event { fd, data: event.to_string() });
                });
            }
            Err(err) => {
                tracing::debug!(endpoint = %name, ?fd, %err, "stream reader ended");
                break;
            }
        }
    }
}

async fn write_stdin<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Vec<u8>>)
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(bytes) = rx.recv().await {
        if writer.write_all(&bytes).await.is_err() {
            break;
        }
        if writer.flush().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
